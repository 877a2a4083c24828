//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hgclient/hgclient.toml`
//! 3. Local config: `<dir>/.hgclient.toml`
//! 4. Environment variables: `HGCLIENT_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::DEFAULT_BINARY_PATH;
use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub binary_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Unified configuration for hgclient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path to the hybridguard executable
    pub binary_path: PathBuf,
    /// Upper bound for one run in seconds (None or 0: wait indefinitely)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from(DEFAULT_BINARY_PATH),
            timeout_secs: None,
        }
    }
}

/// Get the XDG config directory for hgclient.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hgclient").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hgclient.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".hgclient.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Effective per-run timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Expand shell variables and tilde in `binary_path`.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.binary_path.to_string_lossy().as_ref());
        self.binary_path = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            binary_path: overlay
                .binary_path
                .clone()
                .unwrap_or_else(|| self.binary_path.clone()),
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.hgclient.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply HGCLIENT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("HGCLIENT").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("binary_path") {
            settings.binary_path = PathBuf::from(val);
        }
        match config.get::<u64>("timeout_secs") {
            Ok(val) => settings.timeout_secs = Some(val),
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Load a single config file on top of defaults, without other layers.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let mut settings = Self::default().merge_with(&raw);
        settings.expand_paths();
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# hgclient configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/hgclient/hgclient.toml
#   Local:  ./.hgclient.toml
#   Env:    HGCLIENT_BINARY_PATH, HGCLIENT_TIMEOUT_SECS
#   Flags:  --binary, --timeout

# Path to the hybridguard executable (~ and $VAR are expanded)
# binary_path = "./target/release/hybridguard"

# Kill a run that takes longer than this many seconds (0 or unset: no limit)
# timeout_secs = 300
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_points_at_release_build() {
        let settings = Settings::default();
        assert_eq!(settings.binary_path, PathBuf::from(DEFAULT_BINARY_PATH));
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn given_zero_timeout_when_resolving_then_no_limit() {
        let settings = Settings {
            timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn given_tilde_in_binary_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            binary_path: PathBuf::from("~/bin/hybridguard"),
            timeout_secs: None,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.binary_path.to_string_lossy();
        assert!(
            path.starts_with(&home),
            "binary_path should start with home dir: {}",
            path
        );
        assert!(!path.contains('~'));
    }

    #[test]
    fn given_overlay_with_timeout_when_merging_then_keeps_base_path() {
        let base = Settings::default();
        let overlay = RawSettings {
            binary_path: None,
            timeout_secs: Some(30),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.binary_path, base.binary_path);
        assert_eq!(merged.timeout_secs, Some(30));
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips_binary_path() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert!(text.contains("binary_path"));
        assert!(!text.contains("timeout_secs"));
    }
}
