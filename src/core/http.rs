use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};

/// Shared client. Compression is disabled so byte counts and digests are
/// computed over the payload exactly as published.
pub fn build_http_client(config: &LauncherConfig) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers)
        .build()
}

/// Where metadata documents (catalog, descriptors, asset indexes) come from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> LauncherResult<String>;
}

#[async_trait]
impl MetadataSource for Client {
    async fn fetch_text(&self, url: &str) -> LauncherResult<String> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
