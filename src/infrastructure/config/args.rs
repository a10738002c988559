use super::app_config::{LogLevel, WifiMode};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "imgfetch",
    version,
    about = "Fetch a remote image through source headers, denylist and decode rules",
    long_about = None
)]
pub struct CliArgs {
    /// Image URL, optionally followed by `,{"headers":{...}}`.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Logical URL used for manga page decoding (defaults to URL).
    #[arg(long, value_name = "URL")]
    pub old_url: Option<String>,

    /// Source origin whose headers and decode rules apply.
    #[arg(long, value_name = "ORIGIN")]
    pub origin: Option<String>,

    /// Treat the image as a manga page.
    #[arg(long)]
    pub manga: bool,

    /// Only load when connected to wifi.
    #[arg(long)]
    pub wifi_only: bool,

    /// Pass the body through without decoding.
    #[arg(long)]
    pub skip_decode: bool,

    /// Output file (defaults to `<key>.img` in the current directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Network type detection override.
    #[arg(long, value_enum)]
    pub wifi: Option<WifiMode>,

    /// User agent override.
    #[arg(long, env = "IMGFETCH_USER_AGENT")]
    pub user_agent: Option<String>,
}
