//! Port definition for network connectivity checks.

/// Reports the current network type.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectivityPort: Send + Sync {
    /// Returns true when the active connection is wifi.
    fn is_wifi(&self) -> bool;
}
