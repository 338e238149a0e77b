use std::collections::{BTreeMap, HashMap};

/// Canonical platform names used by rule clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Platform {
    /// Maps vendor spellings (`Darwin`, `macos`, `win32`, ...) onto the
    /// canonical set. Anything unrecognized is treated as Linux.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        if lower.starts_with("win") {
            Platform::Windows
        } else if matches!(lower.as_str(), "osx" | "macos" | "mac" | "darwin") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    pub fn host() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
            Platform::Linux => "linux",
        }
    }

    /// Separator between classpath entries on this platform.
    pub fn classpath_separator(&self) -> &'static str {
        match self {
            Platform::Windows => ";",
            Platform::Osx | Platform::Linux => ":",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform, feature flags and substitution variables for one launch
/// attempt. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    platform: Platform,
    cpu_arch: String,
    feature_flags: BTreeMap<String, bool>,
    variables: HashMap<String, String>,
}

impl LaunchContext {
    /// Starts from the running host's platform and architecture.
    pub fn builder() -> LaunchContextBuilder {
        LaunchContextBuilder {
            platform: Platform::host(),
            cpu_arch: std::env::consts::ARCH.to_string(),
            feature_flags: BTreeMap::new(),
            variables: HashMap::new(),
        }
    }

    pub fn for_host() -> Self {
        Self::builder().build()
    }

    /// A builder seeded with this context's values.
    pub fn to_builder(&self) -> LaunchContextBuilder {
        LaunchContextBuilder {
            platform: self.platform,
            cpu_arch: self.cpu_arch.clone(),
            feature_flags: self.feature_flags.clone(),
            variables: self.variables.clone(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn cpu_arch(&self) -> &str {
        &self.cpu_arch
    }

    /// `"64"` or `"32"`, as substituted into native classifiers.
    pub fn arch_bits(&self) -> &'static str {
        if self.cpu_arch.contains("64") {
            "64"
        } else {
            "32"
        }
    }

    pub fn feature(&self, name: &str) -> Option<bool> {
        self.feature_flags.get(name).copied()
    }

    pub fn feature_flags(&self) -> &BTreeMap<String, bool> {
        &self.feature_flags
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

#[derive(Debug, Clone)]
pub struct LaunchContextBuilder {
    platform: Platform,
    cpu_arch: String,
    feature_flags: BTreeMap<String, bool>,
    variables: HashMap<String, String>,
}

impl LaunchContextBuilder {
    pub fn platform(mut self, name: &str) -> Self {
        self.platform = Platform::from_name(name);
        self
    }

    pub fn cpu_arch(mut self, arch: &str) -> Self {
        self.cpu_arch = arch.to_string();
        self
    }

    pub fn feature(mut self, name: &str, enabled: bool) -> Self {
        self.feature_flags.insert(name.to_string(), enabled);
        self
    }

    pub fn features<I, K>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        self.feature_flags
            .extend(flags.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn variable(mut self, name: &str, value: impl Into<String>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    pub fn variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> LaunchContext {
        LaunchContext {
            platform: self.platform,
            cpu_arch: self.cpu_arch,
            feature_flags: self.feature_flags,
            variables: self.variables,
        }
    }
}
