use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cdx::MimeFilter;
use crate::retry::RetryPolicy;

/// Mimetypes mirrored by default: pages, stylesheets, scripts and common images.
pub const DEFAULT_ELIGIBLE_MIMETYPES: [&str; 8] = [
    "text/html",
    "text/css",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
    "application/javascript",
];

pub const DEFAULT_CDX_API_URL: &str = "https://web.archive.org/cdx/search/xd";
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://web.archive.org/web";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// HTTP transport settings (`[http]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout; snapshots can be large images.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Follow 3xx responses. The archive redirects `id_` requests to the nearest capture.
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
            user_agent: concat!("wbm/", env!("CARGO_PKG_VERSION")).to_string(),
            follow_redirects: true,
        }
    }
}

/// What to do when two selected URLs of one domain map to the same file
/// (e.g. `/a/` and `/a/index.html`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fetch only the URL with the newest capture; skip the rest.
    #[default]
    PreferLatest,
    /// Fetch all of them; whichever write lands last is kept.
    LastWriteWins,
}

/// Global configuration loaded from `~/.config/wbm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WbmConfig {
    /// Directory that receives one subdirectory per mirrored host.
    pub output_root: PathBuf,
    /// CDX index endpoint queried once per domain.
    pub cdx_api_url: String,
    /// Raw snapshot endpoint; requests go to `{base}/{timestamp}id_/{url}`.
    pub archive_base_url: String,
    /// Captures with any other mimetype are ignored.
    pub eligible_mimetypes: Vec<String>,
    /// Domains processed at the same time.
    pub max_concurrent_domains: usize,
    /// Snapshot retrievals in flight across all domains.
    pub max_concurrent_fetches: usize,
    /// Write through a temp file and rename into place.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    #[serde(default)]
    pub http: HttpConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for WbmConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("downloaded"),
            cdx_api_url: DEFAULT_CDX_API_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            eligible_mimetypes: DEFAULT_ELIGIBLE_MIMETYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            max_concurrent_domains: 4,
            max_concurrent_fetches: 16,
            atomic_writes: true,
            collision_policy: CollisionPolicy::default(),
            http: HttpConfig::default(),
            retry: None,
        }
    }
}

impl WbmConfig {
    pub fn mime_filter(&self) -> MimeFilter {
        MimeFilter::new(self.eligible_mimetypes.iter().cloned())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wbm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WbmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WbmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WbmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
