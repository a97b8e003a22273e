//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
/// Serializes to TOML; fields are optional in the file via
/// `#[serde(default)]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoxConfig {
    /// Enable debug mode (verbose logging).
    pub debug: bool,

    /// Default locale for utterances and intent file lookup.
    pub lang: String,

    /// Out-of-process worker engine configuration.
    pub worker: WorkerSection,

    /// RPC timeout configuration.
    pub timeouts: TimeoutsConfig,

    /// Path configuration.
    pub paths: PathsSection,
}

impl Default for VoxConfig {
    fn default() -> Self {
        Self {
            debug: false,
            lang: vox_types::DEFAULT_LANG.to_string(),
            worker: WorkerSection::default(),
            timeouts: TimeoutsConfig::default(),
            paths: PathsSection::default(),
        }
    }
}

impl VoxConfig {
    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Out-of-process worker engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerSection {
    /// Whether to start the worker engine at all.
    pub enabled: bool,

    /// Interface the adapter listens on for the worker connection.
    pub host: String,

    /// Listen port; `0` picks an ephemeral port.
    pub port: u16,

    /// Explicit worker executable; derived from the worker directory
    /// when unset.
    pub exe: Option<PathBuf>,

    /// Repository cloned by the one-time build step.
    pub repo_url: String,

    /// Branch used by the build step.
    pub branch: String,

    /// Build script run inside the checkout.
    pub build_script: String,
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8014,
            exe: None,
            repo_url: "https://github.com/vox-assistant/vox-worker.git".to_string(),
            branch: "main".to_string(),
            build_script: "build.sh".to_string(),
        }
    }
}

/// RPC timeout settings, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Bound on the worker's connect-back handshake.
    pub startup_secs: u64,

    /// Bound on each response-bearing RPC call.
    pub call_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            startup_secs: 4,
            call_secs: 4,
        }
    }
}

impl TimeoutsConfig {
    #[must_use]
    pub fn startup(&self) -> Duration {
        Duration::from_secs(self.startup_secs)
    }

    #[must_use]
    pub fn call(&self) -> Duration {
        Duration::from_secs(self.call_secs)
    }
}

/// Path settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsSection {
    /// Base data directory; defaults to `~/.vox` when unset.
    pub base_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VoxConfig::default();
        assert!(!config.debug);
        assert_eq!(config.lang, "en-us");
        assert!(config.worker.enabled);
        assert_eq!(config.worker.port, 8014);
        assert_eq!(config.timeouts.startup(), Duration::from_secs(4));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = VoxConfig::default();
        config.debug = true;
        config.worker.port = 9000;

        let text = config.to_toml().unwrap();
        let parsed: VoxConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: VoxConfig = toml::from_str("[worker]\nport = 9100\n").unwrap();
        assert_eq!(parsed.worker.port, 9100);
        assert_eq!(parsed.worker.host, "127.0.0.1");
        assert_eq!(parsed.timeouts.call_secs, 4);
    }
}
