//! Network type detection.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::trace;

use crate::domain::ports::ConnectivityPort;
use crate::infrastructure::config::WifiMode;

const SYSFS_NET: &str = "/sys/class/net";

/// Detects wifi from Linux sysfs: any wireless interface whose link is up.
#[derive(Debug, Clone)]
pub struct SysfsConnectivity {
    root: PathBuf,
}

impl SysfsConnectivity {
    /// Probes the system network class directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(SYSFS_NET)
    }

    /// Probes an alternative directory laid out like `/sys/class/net`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityPort for SysfsConnectivity {
    fn is_wifi(&self) -> bool {
        let Ok(entries) = fs::read_dir(&self.root) else {
            trace!(root = %self.root.display(), "No network class directory");
            return false;
        };

        entries.flatten().any(|entry| {
            let path = entry.path();
            path.join("wireless").exists()
                && fs::read_to_string(path.join("operstate")).is_ok_and(|s| s.trim() == "up")
        })
    }
}

/// Reports a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedConnectivity(pub bool);

impl ConnectivityPort for FixedConnectivity {
    fn is_wifi(&self) -> bool {
        self.0
    }
}

/// Builds the connectivity check for a configured mode.
#[must_use]
pub fn connectivity_for(mode: WifiMode) -> Arc<dyn ConnectivityPort> {
    match mode {
        WifiMode::Auto => Arc::new(SysfsConnectivity::new()),
        WifiMode::On => Arc::new(FixedConnectivity(true)),
        WifiMode::Off => Arc::new(FixedConnectivity(false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn interface(root: &TempDir, name: &str, wireless: bool, state: &str) -> std::io::Result<()> {
        let dir = root.path().join(name);
        fs::create_dir_all(&dir)?;
        if wireless {
            fs::create_dir_all(dir.join("wireless"))?;
        }
        fs::write(dir.join("operstate"), format!("{state}\n"))
    }

    #[test]
    fn test_wireless_up() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        interface(&root, "eth0", false, "up")?;
        interface(&root, "wlan0", true, "up")?;

        assert!(SysfsConnectivity::with_root(root.path()).is_wifi());
        Ok(())
    }

    #[test]
    fn test_wireless_down() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        interface(&root, "eth0", false, "up")?;
        interface(&root, "wlan0", true, "down")?;

        assert!(!SysfsConnectivity::with_root(root.path()).is_wifi());
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        assert!(!SysfsConnectivity::with_root("/nonexistent/net").is_wifi());
    }

    #[test]
    fn test_fixed_modes() {
        assert!(connectivity_for(WifiMode::On).is_wifi());
        assert!(!connectivity_for(WifiMode::Off).is_wifi());
    }
}
