//! Configuration types for the walkthrough.
//!
//! Every field has a serde default, so an empty JSON object (or no file at
//! all) yields the stock timings and limits. Environment variables with
//! the `PIPEFOLIO_` prefix override file values.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a non-build stage decides that navigation may unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockPolicy {
    /// Unlock a fixed settle delay after entering the stage.
    #[default]
    FixedDelay,
    /// Unlock when the stage view reports its content animation finished.
    ContentFinished,
}

/// Timing of the stage choreography.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay before a non-build stage unlocks navigation, in milliseconds.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Interval between build progress ticks, in milliseconds.
    #[serde(default = "default_build_tick")]
    pub build_tick_ms: u64,
    /// Value at which the build counts as complete, at most 100.
    #[serde(default = "default_build_target")]
    pub build_target: u8,
    /// How non-build stages unlock.
    #[serde(default)]
    pub unlock_policy: UnlockPolicy,
    /// How long the "sent" acknowledgement stays up, in milliseconds.
    #[serde(default = "default_sent_ack")]
    pub sent_ack_ms: u64,
    /// Delay before the first-visit welcome notice appears, in milliseconds.
    #[serde(default = "default_welcome_delay")]
    pub welcome_delay_ms: u64,
}

fn default_settle_delay() -> u64 {
    500
}

fn default_build_tick() -> u64 {
    50
}

/// Build progress is a percentage.
const MAX_BUILD_TARGET: u8 = 100;

fn default_build_target() -> u8 {
    100
}

fn default_sent_ack() -> u64 {
    5000
}

fn default_welcome_delay() -> u64 {
    500
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            build_tick_ms: default_build_tick(),
            build_target: default_build_target(),
            unlock_policy: UnlockPolicy::default(),
            sent_ack_ms: default_sent_ack(),
            welcome_delay_ms: default_welcome_delay(),
        }
    }
}

impl TimingConfig {
    /// Creates a timing configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the settle delay.
    #[must_use]
    pub const fn with_settle_delay_ms(mut self, millis: u64) -> Self {
        self.settle_delay_ms = millis;
        self
    }

    /// Sets the build tick interval.
    #[must_use]
    pub const fn with_build_tick_ms(mut self, millis: u64) -> Self {
        self.build_tick_ms = millis;
        self
    }

    /// Sets the unlock policy.
    #[must_use]
    pub const fn with_unlock_policy(mut self, policy: UnlockPolicy) -> Self {
        self.unlock_policy = policy;
        self
    }

    /// Gets the settle delay as Duration.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Gets the build tick as Duration.
    #[must_use]
    pub const fn build_tick(&self) -> Duration {
        Duration::from_millis(self.build_tick_ms)
    }

    /// Gets the acknowledgement window as Duration.
    #[must_use]
    pub const fn sent_ack(&self) -> Duration {
        Duration::from_millis(self.sent_ack_ms)
    }

    /// Gets the welcome delay as Duration.
    #[must_use]
    pub const fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }
}

/// Contact form and outbound email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Successful sends allowed per calendar day.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    /// Local store key of the rate-limit record.
    #[serde(default = "default_limit_key")]
    pub storage_key: String,
    /// Email service REST endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Email service identifier.
    #[serde(default)]
    pub service_id: Option<String>,
    /// Email template identifier.
    #[serde(default)]
    pub template_id: Option<String>,
    /// Public API key.
    #[serde(default)]
    pub public_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_daily_limit() -> u32 {
    5
}

fn default_limit_key() -> String {
    "portfolio_contact_limit".to_string()
}

fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            storage_key: default_limit_key(),
            endpoint: default_endpoint(),
            service_id: None,
            template_id: None,
            public_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl ContactConfig {
    /// Sets the daily limit.
    #[must_use]
    pub const fn with_daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = limit;
        self
    }

    /// Sets the email service credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        self.service_id = Some(service_id.into());
        self.template_id = Some(template_id.into());
        self.public_key = Some(public_key.into());
        self
    }

    /// Gets the timeout as Duration. Fails unless it is a positive, finite
    /// number of seconds.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let out_of_range = |reason: String| ConfigError::OutOfRange {
            field: "contact.timeout_seconds",
            reason,
        };
        let timeout = Duration::try_from_secs_f64(self.timeout_seconds)
            .map_err(|err| out_of_range(format!("{}: {err}", self.timeout_seconds)))?;
        if timeout.is_zero() {
            return Err(out_of_range("must be greater than zero".to_string()));
        }
        Ok(timeout)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Choreography timing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Contact form settings.
    #[serde(default)]
    pub contact: ContactConfig,
    /// File backing the local key-value store.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Downloadable CV offered on the monitor stage.
    #[serde(default = "default_cv_path")]
    pub cv_path: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".pipefolio/local-storage.json")
}

fn default_cv_path() -> String {
    crate::content::CV_PATH.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            contact: ContactConfig::default(),
            storage_path: default_storage_path(),
            cv_path: default_cv_path(),
        }
    }
}

impl SiteConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that parse but cannot be honored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.build_target > MAX_BUILD_TARGET {
            return Err(ConfigError::OutOfRange {
                field: "timing.build_target",
                reason: format!("{} exceeds {MAX_BUILD_TARGET}", self.timing.build_target),
            });
        }
        self.contact.timeout()?;
        Ok(())
    }

    /// Loads from `path` if given, otherwise defaults, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `PIPEFOLIO_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PIPEFOLIO_SETTLE_DELAY_MS") {
            self.timing.settle_delay_ms = parse_env("PIPEFOLIO_SETTLE_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("PIPEFOLIO_BUILD_TICK_MS") {
            self.timing.build_tick_ms = parse_env("PIPEFOLIO_BUILD_TICK_MS", &value)?;
        }
        if let Some(value) = lookup("PIPEFOLIO_UNLOCK_POLICY") {
            self.timing.unlock_policy = match value.as_str() {
                "fixed_delay" => UnlockPolicy::FixedDelay,
                "content_finished" => UnlockPolicy::ContentFinished,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        key: "PIPEFOLIO_UNLOCK_POLICY".to_string(),
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("PIPEFOLIO_DAILY_LIMIT") {
            self.contact.daily_limit = parse_env("PIPEFOLIO_DAILY_LIMIT", &value)?;
        }
        if let Some(value) = lookup("PIPEFOLIO_STORAGE_PATH") {
            self.storage_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("PIPEFOLIO_EMAIL_SERVICE_ID") {
            self.contact.service_id = Some(value);
        }
        if let Some(value) = lookup("PIPEFOLIO_EMAIL_TEMPLATE_ID") {
            self.contact.template_id = Some(value);
        }
        if let Some(value) = lookup("PIPEFOLIO_EMAIL_PUBLIC_KEY") {
            self.contact.public_key = Some(value);
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_match_site() {
        let config = SiteConfig::default();
        assert_eq!(config.timing.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.timing.build_tick(), Duration::from_millis(50));
        assert_eq!(config.timing.build_target, 100);
        assert_eq!(config.timing.sent_ack(), Duration::from_secs(5));
        assert_eq!(config.timing.unlock_policy, UnlockPolicy::FixedDelay);
        assert_eq!(config.contact.daily_limit, 5);
        assert_eq!(config.contact.storage_key, "portfolio_contact_limit");
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timing.settle_delay_ms, 500);
        assert_eq!(config.contact.daily_limit, 5);
    }

    #[test]
    fn test_partial_json() {
        let config: SiteConfig = serde_json::from_str(
            r#"{"timing": {"unlock_policy": "content_finished"}, "contact": {"daily_limit": 2}}"#,
        )
        .unwrap();
        assert_eq!(config.timing.unlock_policy, UnlockPolicy::ContentFinished);
        assert_eq!(config.timing.build_tick_ms, 50);
        assert_eq!(config.contact.daily_limit, 2);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PIPEFOLIO_SETTLE_DELAY_MS", "1200"),
            ("PIPEFOLIO_UNLOCK_POLICY", "content_finished"),
            ("PIPEFOLIO_EMAIL_SERVICE_ID", "service_x"),
        ]
        .into_iter()
        .collect();

        let mut config = SiteConfig::default();
        config
            .apply_env(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.timing.settle_delay_ms, 1200);
        assert_eq!(config.timing.unlock_policy, UnlockPolicy::ContentFinished);
        assert_eq!(config.contact.service_id.as_deref(), Some("service_x"));
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = SiteConfig::default();
        let err = config
            .apply_env(|key| (key == "PIPEFOLIO_DAILY_LIMIT").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"storage_path": "/tmp/pf.json"}}"#).unwrap();

        let config = SiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/pf.json"));
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = SiteConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file_rejects_build_target_over_100() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timing": {{"build_target": 150}}}}"#).unwrap();

        let err = SiteConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "timing.build_target", .. }
        ));
        assert_eq!(err.to_string(), "Invalid timing.build_target: 150 exceeds 100");
    }

    #[test]
    fn test_build_target_of_100_is_accepted() {
        let mut config = SiteConfig::default();
        config.timing.build_target = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_rejects_negative_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"contact": {{"timeout_seconds": -1.5}}}}"#).unwrap();

        let err = SiteConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "contact.timeout_seconds", .. }
        ));
    }

    #[test]
    fn test_timeout_rejects_nan_and_zero() {
        for seconds in [f64::NAN, f64::INFINITY, 0.0, -0.25] {
            let config = ContactConfig {
                timeout_seconds: seconds,
                ..ContactConfig::default()
            };
            assert!(config.timeout().is_err(), "{seconds}");
        }
        assert_eq!(
            ContactConfig::default().timeout().unwrap(),
            Duration::from_secs(30)
        );
    }
}
