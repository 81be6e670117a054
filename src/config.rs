/// Service configuration: secrets from the environment, everything else
/// from an optional `wrnmon.toml` settings file.
///
/// Keeps the webhook URL and API key out of the source tree and makes
/// schedule or feed tweaks possible without recompiling. Every settings
/// key has a default, so the file may be absent or partial.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_SETTINGS_PATH: &str = "wrnmon.toml";

/// Environment variable holding the Slack incoming-webhook URL (required).
pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";

/// Environment variable holding the KMA API Hub key.
pub const AUTH_KEY_VAR: &str = "KMA_AUTH_KEY";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set. Export it or add it to .env; it is never read from the settings file.")]
    MissingSecret(&'static str),
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid setting in {path}: {key} must be greater than zero")]
    NotPositive { path: PathBuf, key: &'static str },
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// `[feed]` - the KMA warning feed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedSettings {
    pub base_url: String,
    /// `wrn` filter; "A" requests every warning type.
    pub warning_type: String,
    /// `disp` parameter.
    pub display_level: u8,
    /// Length of the trailing query window.
    pub window_minutes: u32,
    pub timeout_secs: u64,
    /// The API hub has served incomplete certificate chains in the past.
    pub accept_invalid_certs: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://apihub.kma.go.kr/api/typ01/url/wrn_met_data.php".to_string(),
            warning_type: "A".to_string(),
            display_level: 0,
            window_minutes: 60,
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

/// `[schedule]` - recurring mode timing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleSettings {
    pub primary_minutes: u32,
    /// Redundant backup cadence.
    pub backup_minutes: u32,
    /// How often due times are checked.
    pub poll_seconds: u64,
    /// Run one tick immediately instead of waiting a full interval.
    pub run_on_start: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            primary_minutes: 5,
            backup_minutes: 60,
            poll_seconds: 60,
            run_on_start: false,
        }
    }
}

/// `[delivery]` - the chat webhook.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeliverySettings {
    pub timeout_secs: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Also append log lines to this file.
    pub file: Option<PathBuf>,
}

/// Root of the settings file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedSettings,
    pub schedule: ScheduleSettings,
    pub delivery: DeliverySettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parses and validates settings from TOML text.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Rejects schedule values that would turn recurring mode into a busy
    /// loop against the feed.
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let schedule = &self.schedule;
        let checks = [
            ("schedule.primary_minutes", u64::from(schedule.primary_minutes)),
            ("schedule.backup_minutes", u64::from(schedule.backup_minutes)),
            ("schedule.poll_seconds", schedule.poll_seconds),
        ];

        match checks.into_iter().find(|&(_, value)| value == 0) {
            Some((key, _)) => Err(ConfigError::NotPositive {
                path: path.to_path_buf(),
                key,
            }),
            None => Ok(()),
        }
    }

    /// Loads the settings file at `path`.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// is an error: running with half-applied settings is worse than not
    /// running.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Full service configuration
// ---------------------------------------------------------------------------

/// Everything the service needs to run.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub settings: Settings,
    pub webhook_url: String,
    /// `None` when `KMA_AUTH_KEY` is unset; the feed will reject requests.
    pub auth_key: Option<String>,
}

impl ServiceConfig {
    /// Combines settings with secrets obtained from `lookup`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let webhook_url = secret(WEBHOOK_URL_VAR).ok_or(ConfigError::MissingSecret(WEBHOOK_URL_VAR))?;
        let auth_key = secret(AUTH_KEY_VAR);

        Ok(ServiceConfig {
            settings,
            webhook_url,
            auth_key,
        })
    }

    /// Loads `.env` (if present), the settings file and the process
    /// environment.
    pub fn load(settings_path: &Path) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let settings = Settings::load(settings_path)?;
        Self::from_lookup(settings, |name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_documented_cadence() {
        let settings = Settings::default();
        assert_eq!(settings.schedule.primary_minutes, 5);
        assert_eq!(settings.schedule.backup_minutes, 60);
        assert_eq!(settings.schedule.poll_seconds, 60);
        assert_eq!(settings.feed.timeout_secs, 30);
        assert_eq!(settings.delivery.timeout_secs, 10);
        assert_eq!(settings.feed.window_minutes, 60);
        assert_eq!(settings.feed.warning_type, "A");
        assert!(!settings.schedule.run_on_start);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let toml = r#"
            [schedule]
            primary_minutes = 10

            [feed]
            accept_invalid_certs = true
        "#;
        let settings = Settings::from_toml(toml, Path::new("test.toml")).expect("valid TOML");
        assert_eq!(settings.schedule.primary_minutes, 10);
        assert_eq!(settings.schedule.backup_minutes, 60, "unset keys keep defaults");
        assert!(settings.feed.accept_invalid_certs);
        assert_eq!(settings.feed.timeout_secs, 30);
        assert_eq!(settings.logging.file, None);
    }

    #[test]
    fn test_logging_file_setting() {
        let toml = "[logging]\nfile = \"weather_monitor.log\"\n";
        let settings = Settings::from_toml(toml, Path::new("test.toml")).unwrap();
        assert_eq!(settings.logging.file, Some(PathBuf::from("weather_monitor.log")));
    }

    #[test]
    fn test_malformed_file_is_an_error_naming_the_path() {
        let result = Settings::from_toml("[schedule\nprimary_minutes = ", Path::new("broken.toml"));
        let err = result.expect_err("malformed TOML must not fall back to defaults");
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let result = Settings::from_toml("[schedule]\nprimary_minutes = \"five\"\n", Path::new("t.toml"));
        assert!(result.is_err(), "string where a number is expected must be rejected");
    }

    #[test]
    fn test_zero_schedule_values_are_rejected() {
        for (toml, key) in [
            ("[schedule]\npoll_seconds = 0\n", "schedule.poll_seconds"),
            ("[schedule]\nprimary_minutes = 0\n", "schedule.primary_minutes"),
            ("[schedule]\nbackup_minutes = 0\n", "schedule.backup_minutes"),
        ] {
            let err = Settings::from_toml(toml, Path::new("wrnmon.toml"))
                .expect_err("a zero interval would poll the feed continuously");
            assert!(
                matches!(err, ConfigError::NotPositive { key: k, .. } if k == key),
                "expected {} to be rejected, got: {}",
                key,
                err
            );
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn test_defaults_pass_validation() {
        let settings = Settings::default();
        assert!(settings.validate(Path::new("wrnmon.toml")).is_ok());
    }

    #[test]
    fn test_missing_settings_file_yields_defaults() {
        let settings = Settings::load(Path::new("definitely/not/here/wrnmon.toml"))
            .expect("missing file is not an error");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_webhook_url_fails_fast() {
        let result = ServiceConfig::from_lookup(Settings::default(), env(&[("KMA_AUTH_KEY", "k")]));
        let err = result.expect_err("webhook URL is required");
        assert!(matches!(err, ConfigError::MissingSecret(WEBHOOK_URL_VAR)));
        assert!(err.to_string().contains("SLACK_WEBHOOK_URL"));
    }

    #[test]
    fn test_blank_webhook_url_counts_as_missing() {
        let result = ServiceConfig::from_lookup(Settings::default(), env(&[("SLACK_WEBHOOK_URL", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_secrets_are_read_from_lookup() {
        let config = ServiceConfig::from_lookup(
            Settings::default(),
            env(&[
                ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X"),
                ("KMA_AUTH_KEY", "key123"),
            ]),
        )
        .expect("both secrets present");
        assert_eq!(config.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(config.auth_key.as_deref(), Some("key123"));
    }

    #[test]
    fn test_auth_key_is_optional() {
        let config = ServiceConfig::from_lookup(
            Settings::default(),
            env(&[("SLACK_WEBHOOK_URL", "https://example.invalid/hook")]),
        )
        .expect("auth key may be absent");
        assert!(config.auth_key.is_none());
    }
}
