use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Bearer secret for the provider API, read once at startup and handed to the
/// probes. `Debug` and `Display` only ever show a masked preview.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// First 12 and last 4 characters plus the total length.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let len = chars.len();
        if len <= 16 {
            return format!("{}... (length: {})", chars.iter().take(4).collect::<String>(), len);
        }
        let head: String = chars[..12].iter().collect();
        let tail: String = chars[len - 4..].iter().collect();
        format!("{}...{} (length: {})", head, tail, len)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, error: String },
}

/// Load key=value pairs from `path` into the process environment.
///
/// Variables that are already set are left untouched.
pub fn load_env_file(path: &Path) -> EnvFileStatus {
    if !path.is_file() {
        info!(path = %path.display(), "No env file found, using process environment only");
        return EnvFileStatus::Missing(path.to_path_buf());
    }

    match dotenv::from_path(path) {
        Ok(()) => {
            info!(path = %path.display(), "Loaded env file");
            EnvFileStatus::Loaded(path.to_path_buf())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse env file");
            EnvFileStatus::Invalid {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

/// Read `key_name` from the environment. The env file has already been
/// loaded by `Config::load_from`.
pub fn load_credential(key_name: &str) -> Option<Credential> {
    match std::env::var(key_name).ok().and_then(Credential::new) {
        Some(credential) => {
            info!(key = key_name, credential = %credential, "Credential found");
            Some(credential)
        }
        None => {
            warn!(key = key_name, "Credential not set, probes that need it will be skipped");
            None
        }
    }
}
