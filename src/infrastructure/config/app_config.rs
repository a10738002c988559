//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::BookSource;

const APP_NAME: &str = "imgfetch";
const APP_QUALIFIER: &str = "io";
const APP_ORGANIZATION: &str = "imgfetch";

/// Default user agent for image requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// How the wifi-only policy learns the network type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    /// Probe network interfaces.
    #[default]
    Auto,
    /// Always report wifi.
    On,
    /// Never report wifi.
    Off,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,

    /// Fetch policy configuration.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Known sources.
    #[serde(default)]
    pub sources: Vec<BookSource>,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent when a source does not set one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout for covers, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whole-request timeout for manga pages, in seconds.
    #[serde(default = "default_manga_timeout_secs")]
    pub manga_timeout_secs: u64,

    /// Connect timeout, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            manga_timeout_secs: default_manga_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Fetch policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of remembered failed URLs.
    #[serde(default = "default_failed_url_capacity")]
    pub failed_url_capacity: usize,

    /// Network type detection.
    #[serde(default)]
    pub wifi: WifiMode,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            failed_url_capacity: default_failed_url_capacity(),
            wifi: WifiMode::default(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_manga_timeout_secs() -> u64 {
    60
}

const fn default_connect_timeout_secs() -> u64 {
    15
}

const fn default_failed_url_capacity() -> usize {
    crate::infrastructure::cache::failed_urls::DEFAULT_CAPACITY
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(wifi) = args.wifi {
            self.fetch.wifi = wifi;
        }
        if let Some(user_agent) = &args.user_agent {
            self.http.user_agent.clone_from(user_agent);
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("imgfetch.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            http: HttpConfig::default(),
            fetch: FetchConfig::default(),
            sources: Vec::new(),
        }
    }
}
