use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PanelError, PanelResult};

/// Panel settings.
///
/// The defaults are the panel's stock behavior. A JSON file at
/// [`PanelConfig::config_path`] may override individual fields; the panel
/// only ever reads it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    /// Hard limit for a single command line.
    pub command_timeout_secs: u64,
    /// "What is my IP" endpoint, must answer `{"ip": "..."}`.
    pub ip_echo_url: String,
    pub http_timeout_secs: u64,
    pub resolve_timeout_secs: u64,
    /// Point size of the monospace command input/output.
    pub monospace_size: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            window_title: "CyberPanel by 4yzz".to_string(),
            window_size: [800.0, 600.0],
            command_timeout_secs: 10,
            ip_echo_url: "https://api.ipify.org?format=json".to_string(),
            http_timeout_secs: 5,
            resolve_timeout_secs: 5,
            monospace_size: 13.0,
        }
    }
}

impl PanelConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cyber-panel")
            .join("config.json")
    }

    /// Load the override file if there is one, otherwise defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> PanelResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PanelError::Config(format!("{}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| PanelError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.window_title, "CyberPanel by 4yzz");
        assert_eq!(config.command_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "command_timeout_secs": 3, "servers": [{"code": "NL", "display_name": "Netherlands"}] }"#).unwrap();

        // The server list is fixed; a `servers` key is not a setting.
        let config = PanelConfig::load_from(&path).unwrap();
        assert_eq!(config.command_timeout_secs, 3);
        assert_eq!(config.ip_echo_url, PanelConfig::default().ip_echo_url);
        assert_eq!(config, PanelConfig { command_timeout_secs: 3, ..PanelConfig::default() });
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(PanelConfig::load_from(&path), Err(PanelError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        assert!(matches!(PanelConfig::load_from(&path), Err(PanelError::Config(_))));
    }
}
