use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::session::SessionPolicy;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LOREMASTER_DATA_DIR";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Session timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes without interaction before a forced sign-out.
    pub inactivity_timeout_minutes: i64,
    /// Lifetime of a standard session, in hours.
    pub session_hours: i64,
    /// Lifetime of a "remember me" session, in days.
    pub remember_me_days: i64,
    /// Minutes before either deadline at which a warning is shown.
    pub warning_minutes: i64,
    /// Seconds between session checks.
    pub check_interval_secs: u64,
    /// Minimum seconds between persisted activity updates.
    pub activity_throttle_secs: i64,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Also log to stdout (disable when embedding in a UI that owns the terminal).
    pub stdout: bool,
    /// Override the log directory (defaults to `<data_dir>/logs`).
    pub log_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: 30,
            session_hours: 24,
            remember_me_days: 30,
            warning_minutes: 5,
            check_interval_secs: 30,
            activity_throttle_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: true,
            log_dir: None,
        }
    }
}

impl SessionConfig {
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            inactivity_window: Duration::minutes(self.inactivity_timeout_minutes),
            standard_duration: Duration::hours(self.session_hours),
            remember_me_duration: Duration::days(self.remember_me_days),
            warning_threshold: Duration::minutes(self.warning_minutes),
            check_interval: std::time::Duration::from_secs(self.check_interval_secs.max(1)),
            activity_throttle: Duration::seconds(self.activity_throttle_secs),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/loremaster/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to parse config at {}: {e}; using defaults",
                    config_path.display()
                );
                Self::default()
            }),
            Err(_) => {
                tracing::debug!("No config file at {}; using defaults", config_path.display());
                Self::default()
            }
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data.data_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("loremaster"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Resolved log directory.
    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("loremaster").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.session.inactivity_timeout_minutes, 30);
        assert_eq!(config.session.check_interval_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.stdout);
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_default_policy_matches_session_defaults() {
        assert_eq!(SessionConfig::default().policy(), SessionPolicy::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [session]
            inactivity_timeout_minutes = 10

            [logging]
            stdout = false
            "#,
        )
        .unwrap();
        assert_eq!(config.session.inactivity_timeout_minutes, 10);
        assert_eq!(config.session.session_hours, 24);
        assert!(!config.logging.stdout);
        assert_eq!(config.session.policy().inactivity_window, Duration::minutes(10));
    }

    #[test]
    fn test_data_and_log_dir_override() {
        let mut config = AppConfig::default();
        config.data.data_dir = Some(PathBuf::from("/tmp/custom"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/custom"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/custom/logs"));

        config.logging.log_dir = Some(PathBuf::from("/var/log/loremaster"));
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/loremaster"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();
        assert_eq!(
            deserialized.session.remember_me_days,
            config.session.remember_me_days
        );
    }
}
