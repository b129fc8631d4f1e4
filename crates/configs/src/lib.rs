use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const LOCAL_API: &str = "http://127.0.0.1:8000/api";
pub const PROD_API: &str = "https://smart-complaint-portal-server-1.onrender.com/api";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub guard: GuardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Empty means "pick by navigation.hostname".
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub enable_offline_auth_fallback: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_ms: default_timeout_ms(), enable_offline_auth_fallback: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

/// Where the app is "hosted"; drives the base path prefixed to every
/// navigation target.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_pathname")]
    pub pathname: String,
    /// Explicit prefix; skips the computation from hostname/pathname.
    #[serde(default)]
    pub base_path: Option<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { hostname: default_hostname(), pathname: default_pathname(), base_path: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_true")]
    pub logout_on_role_mismatch: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { logout_on_role_mismatch: true }
    }
}

fn default_timeout_ms() -> u64 { 10_000 }
fn default_storage_path() -> PathBuf { PathBuf::from("data/session.json") }
fn default_hostname() -> String { "localhost".into() }
fn default_pathname() -> String { "/".into() }
fn default_true() -> bool { true }

/// Load from `CONFIG_PATH` (default `portal.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "portal.toml".to_string());
    if std::fs::metadata(&path).is_err() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.navigation.normalize();
        self.api.normalize_from_env(&self.navigation);
        self.api.validate()?;
        if self.storage.path.as_os_str().is_empty() {
            self.storage.path = default_storage_path();
        }
        Ok(())
    }
}

impl NavigationConfig {
    fn normalize(&mut self) {
        if self.hostname.trim().is_empty() {
            self.hostname = default_hostname();
        }
        if !self.pathname.starts_with('/') {
            self.pathname = format!("/{}", self.pathname);
        }
        if let Some(base) = &self.base_path {
            let trimmed = base.trim().trim_end_matches('/');
            self.base_path = Some(if trimmed.is_empty() || trimmed.starts_with('/') {
                trimmed.to_string()
            } else {
                format!("/{trimmed}")
            });
        }
    }

    pub fn is_local_host(&self) -> bool {
        self.hostname == "localhost" || self.hostname == "127.0.0.1"
    }
}

impl ApiConfig {
    /// `PORTAL_API_URL` wins over the file; an empty URL falls back by host.
    pub fn normalize_from_env(&mut self, navigation: &NavigationConfig) {
        if let Ok(url) = std::env::var("PORTAL_API_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        if self.base_url.trim().is_empty() {
            self.base_url = if navigation.is_local_host() { LOCAL_API } else { PROD_API }.to_string();
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        if self.timeout_ms == 0 {
            return Err(anyhow!("api.timeout_ms must be a positive number of milliseconds"));
        }
        Ok(())
    }
}
