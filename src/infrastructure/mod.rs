//! Infrastructure layer with adapters for external collaborators.

/// Shared failed-URL denylist.
pub mod cache;
/// Application configuration.
pub mod config;
/// Network type detection.
pub mod connectivity;
/// Image decode adapters.
pub mod decode;
/// HTTP transport.
pub mod http;
/// Reading context.
pub mod reading_context;
/// Source metadata.
pub mod source;

pub use cache::FailedUrlCache;
pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel, WifiMode};
pub use connectivity::{FixedConnectivity, SysfsConnectivity, connectivity_for};
pub use decode::RuleDecoder;
pub use http::ReqwestHttpClient;
pub use reading_context::CurrentBook;
pub use source::SourceRegistry;
