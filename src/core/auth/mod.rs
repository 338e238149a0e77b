use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_USERNAME: &str = "Player";
const OFFLINE_ACCESS_TOKEN: &str = "offline";

/// A locally synthesized identity. No remote account service is involved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfflineAccount {
    pub username: String,
    /// Undashed UUID.
    pub uuid: String,
    pub access_token: String,
    pub xuid: String,
    pub user_type: String,
}

impl Default for OfflineAccount {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME)
    }
}

impl OfflineAccount {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            uuid: Uuid::new_v4().simple().to_string(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            xuid: "0".into(),
            user_type: "legacy".into(),
        }
        .sanitized()
    }

    /// Fill blanks left by hand-edited or older account records.
    pub fn sanitized(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = DEFAULT_USERNAME.into();
        }
        if self.uuid.trim().is_empty() {
            self.uuid = Uuid::new_v4().simple().to_string();
        }
        if self.access_token.trim().is_empty() {
            self.access_token = OFFLINE_ACCESS_TOKEN.into();
        }
        if self.xuid.trim().is_empty() {
            self.xuid = "0".into();
        }
        if self.user_type.trim().is_empty() {
            self.user_type = "legacy".into();
        }
        self
    }
}
