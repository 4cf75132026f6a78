//! Configuration for pleadingd

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store configuration
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Saved document configuration
    #[serde(default)]
    pub documents: DocumentConfig,

    /// Local drive configuration
    #[serde(default)]
    pub drive: DriveConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inactivity after which a session is discarded
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// How often expired sessions are swept
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Session id used when the request carries no session cookie
    #[serde(default = "default_fallback_session")]
    pub fallback_session_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            fallback_session_id: default_fallback_session(),
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX))
    }

    /// Sweep period, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Saved document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Directory holding rendered complaints
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Canonical stamps probed before the newest file
    #[serde(default = "default_legacy_stamps")]
    pub legacy_stamps: Vec<String>,

    /// Client used when a request names none
    #[serde(default = "default_client")]
    pub default_client: String,

    /// Document type used when a save request names none
    #[serde(default = "default_document_type")]
    pub default_document_type: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            legacy_stamps: default_legacy_stamps(),
            default_client: default_client(),
            default_document_type: default_document_type(),
        }
    }
}

/// Local drive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Directory served as the drive root
    #[serde(default = "default_drive_root")]
    pub root: PathBuf,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root: default_drive_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval() -> u64 {
    default_ttl() / 10
}

fn default_fallback_session() -> String {
    "temp_session".to_string()
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("./saved_documents")
}

fn default_legacy_stamps() -> Vec<String> {
    vec!["20250605_010420".to_string()]
}

fn default_client() -> String {
    "Eman Youssef".to_string()
}

fn default_document_type() -> String {
    "complaint".to_string()
}

fn default_drive_root() -> PathBuf {
    PathBuf::from("./drive")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file and `PLEADING_*`
    /// environment variables, in that order of precedence.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // PLEADING_SERVER__LISTEN_ADDR, PLEADING_DOCUMENTS__LEGACY_STAMPS=a,b
        builder = builder.add_source(
            config::Environment::with_prefix("PLEADING")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("documents.legacy_stamps")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
