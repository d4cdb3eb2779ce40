//! Configuration system (layered: code > env > config file > defaults).
//!
//! Every simulated delay and the token lifetime can be tuned. Environment
//! variables use the `OAUTH_ACADEMY_` prefix (for example
//! `OAUTH_ACADEMY_EXCHANGE_DELAY_MS=500`); the TOML file uses the same keys
//! in lowercase without the prefix (`exchange_delay_ms = 500`).

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{AcademyError, Result};

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "OAUTH_ACADEMY_";

/// Longest accepted action delay, after scaling by `speed`.
pub const MAX_DELAY: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime, initial token age or countdown tick.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Timing configuration for every screen.
///
/// ```
/// use std::time::Duration;
/// use oauth_academy::config::AcademyConfig;
///
/// let config = AcademyConfig::builder()
///     .exchange_delay(Duration::from_millis(500))
///     .build();
/// assert_eq!(config.exchange_delay(), Duration::from_millis(500));
/// assert_eq!(config.token_lifetime(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct AcademyConfig {
    /// Landing: login click to provider redirect.
    #[builder(default = Duration::from_millis(1000))]
    login_redirect_delay: Duration,
    /// Callback: simulated code-for-token exchange.
    #[builder(default = Duration::from_millis(2000))]
    exchange_delay: Duration,
    /// Callback: success message shown before moving to the dashboard.
    #[builder(default = Duration::from_millis(1500))]
    success_redirect_delay: Duration,
    #[builder(default = Duration::from_millis(1000))]
    refresh_delay: Duration,
    #[builder(default = Duration::from_millis(1500))]
    api_test_delay: Duration,
    #[builder(default = Duration::from_secs(1))]
    countdown_tick: Duration,
    #[builder(default = Duration::from_secs(300))]
    token_lifetime: Duration,
    /// How long before the dashboard opened its initial token was acquired.
    #[builder(default = Duration::from_secs(60))]
    initial_token_age: Duration,
    /// Divides the fixed action delays. Does not affect the countdown or lifetimes.
    #[builder(default = 1.0)]
    speed: f64,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AcademyConfig {
    /// Defaults, then the config file (explicit `path`, or the default path
    /// if it exists), then `.env` and process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        match path {
            Some(path) => config = config.apply(&ConfigOverrides::from_file(path)?),
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    config = config.apply(&ConfigOverrides::from_file(&default_path)?);
                }
            }
        }

        config = config.apply(&ConfigOverrides::from_env()?);
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let config = Self::default().apply(&ConfigOverrides::from_env()?);
        config.validate()?;
        Ok(config)
    }

    /// `~/.oauth-academy/config.toml`.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".oauth-academy"))
            .unwrap_or_else(|| PathBuf::from(".oauth-academy"))
            .join("config.toml")
    }

    /// Overlay every value present in `overrides`.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        let ms = Duration::from_millis;
        if let Some(v) = overrides.login_redirect_ms {
            self.login_redirect_delay = ms(v);
        }
        if let Some(v) = overrides.exchange_delay_ms {
            self.exchange_delay = ms(v);
        }
        if let Some(v) = overrides.success_redirect_ms {
            self.success_redirect_delay = ms(v);
        }
        if let Some(v) = overrides.refresh_delay_ms {
            self.refresh_delay = ms(v);
        }
        if let Some(v) = overrides.api_test_delay_ms {
            self.api_test_delay = ms(v);
        }
        if let Some(v) = overrides.countdown_tick_ms {
            self.countdown_tick = ms(v);
        }
        if let Some(v) = overrides.token_lifetime_ms {
            self.token_lifetime = ms(v);
        }
        if let Some(v) = overrides.initial_token_age_ms {
            self.initial_token_age = ms(v);
        }
        if let Some(v) = overrides.speed {
            self.speed = v;
        }
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Reject values the screens cannot schedule: a non-positive speed, a
    /// zero tick or lifetime, and anything past [`MAX_DELAY`] or
    /// [`MAX_TOKEN_LIFETIME`].
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(AcademyError::Configuration(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }

        let delays = [
            ("login_redirect_ms", self.login_redirect_delay),
            ("exchange_delay_ms", self.exchange_delay),
            ("success_redirect_ms", self.success_redirect_delay),
            ("refresh_delay_ms", self.refresh_delay),
            ("api_test_delay_ms", self.api_test_delay),
        ];
        for (key, delay) in delays {
            match scale(delay, self.speed) {
                Some(scaled) if scaled <= MAX_DELAY => {}
                _ => {
                    return Err(AcademyError::Configuration(format!(
                        "{key} at speed {} must not exceed {}s",
                        self.speed,
                        MAX_DELAY.as_secs()
                    )))
                }
            }
        }

        let lifetimes = [
            ("countdown_tick_ms", self.countdown_tick, false),
            ("token_lifetime_ms", self.token_lifetime, false),
            ("initial_token_age_ms", self.initial_token_age, true),
        ];
        for (key, value, zero_ok) in lifetimes {
            if value.is_zero() && !zero_ok {
                return Err(AcademyError::Configuration(format!(
                    "{key} must be greater than zero"
                )));
            }
            if value > MAX_TOKEN_LIFETIME {
                return Err(AcademyError::Configuration(format!(
                    "{key} must not exceed {}s",
                    MAX_TOKEN_LIFETIME.as_secs()
                )));
            }
        }
        Ok(())
    }

    pub fn login_redirect_delay(&self) -> Duration {
        self.scaled(self.login_redirect_delay)
    }

    pub fn exchange_delay(&self) -> Duration {
        self.scaled(self.exchange_delay)
    }

    pub fn success_redirect_delay(&self) -> Duration {
        self.scaled(self.success_redirect_delay)
    }

    pub fn refresh_delay(&self) -> Duration {
        self.scaled(self.refresh_delay)
    }

    pub fn api_test_delay(&self) -> Duration {
        self.scaled(self.api_test_delay)
    }

    pub fn countdown_tick(&self) -> Duration {
        self.countdown_tick.min(MAX_TOKEN_LIFETIME)
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime.min(MAX_TOKEN_LIFETIME)
    }

    pub fn initial_token_age(&self) -> Duration {
        self.initial_token_age.min(MAX_TOKEN_LIFETIME)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Unvalidated configs are clamped to [`MAX_DELAY`] rather than overflow timers.
    fn scaled(&self, delay: Duration) -> Duration {
        scale(delay, self.speed).unwrap_or(delay).min(MAX_DELAY)
    }
}

fn scale(delay: Duration, speed: f64) -> Option<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(delay.as_secs_f64() / speed).unwrap_or(Duration::MAX))
}

/// Partial configuration read from a file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub login_redirect_ms: Option<u64>,
    pub exchange_delay_ms: Option<u64>,
    pub success_redirect_ms: Option<u64>,
    pub refresh_delay_ms: Option<u64>,
    pub api_test_delay_ms: Option<u64>,
    pub countdown_tick_ms: Option<u64>,
    pub token_lifetime_ms: Option<u64>,
    pub initial_token_age_ms: Option<u64>,
    pub speed: Option<f64>,
}

impl ConfigOverrides {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw).map_err(|err| {
            AcademyError::Configuration(format!("{}: {err}", path.display()))
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `OAUTH_ACADEMY_*` keys through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            login_redirect_ms: parse_var(&lookup, "LOGIN_REDIRECT_MS")?,
            exchange_delay_ms: parse_var(&lookup, "EXCHANGE_DELAY_MS")?,
            success_redirect_ms: parse_var(&lookup, "SUCCESS_REDIRECT_MS")?,
            refresh_delay_ms: parse_var(&lookup, "REFRESH_DELAY_MS")?,
            api_test_delay_ms: parse_var(&lookup, "API_TEST_DELAY_MS")?,
            countdown_tick_ms: parse_var(&lookup, "COUNTDOWN_TICK_MS")?,
            token_lifetime_ms: parse_var(&lookup, "TOKEN_LIFETIME_MS")?,
            initial_token_age_ms: parse_var(&lookup, "INITIAL_TOKEN_AGE_MS")?,
            speed: parse_var(&lookup, "SPEED")?,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, suffix: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let key = format!("{ENV_PREFIX}{suffix}");
    match lookup(&key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| AcademyError::Configuration(format!("{key}={raw}: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_demo_timings() {
        let config = AcademyConfig::default();
        assert_eq!(config.login_redirect_delay(), Duration::from_millis(1000));
        assert_eq!(config.exchange_delay(), Duration::from_millis(2000));
        assert_eq!(config.success_redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.refresh_delay(), Duration::from_millis(1000));
        assert_eq!(config.api_test_delay(), Duration::from_millis(1500));
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.token_lifetime(), Duration::from_secs(300));
        assert_eq!(config.initial_token_age(), Duration::from_secs(60));
    }

    #[test]
    fn speed_scales_action_delays_only() {
        let config = AcademyConfig::default().with_speed(4.0);
        assert_eq!(config.exchange_delay(), Duration::from_millis(500));
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.token_lifetime(), Duration::from_secs(300));
    }

    #[test]
    fn env_lookup_overrides_values() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("OAUTH_ACADEMY_EXCHANGE_DELAY_MS", "250"),
            ("OAUTH_ACADEMY_SPEED", " 2 "),
            ("OAUTH_ACADEMY_REFRESH_DELAY_MS", ""),
        ]))
        .unwrap();
        let config = AcademyConfig::default().apply(&overrides);
        assert_eq!(config.exchange_delay(), Duration::from_millis(125));
        assert_eq!(config.refresh_delay(), Duration::from_millis(500));
    }

    #[test]
    fn env_lookup_rejects_garbage() {
        let err = ConfigOverrides::from_lookup(lookup(&[("OAUTH_ACADEMY_TOKEN_LIFETIME_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("OAUTH_ACADEMY_TOKEN_LIFETIME_MS"));
    }

    #[test]
    fn validate_rejects_non_positive_speed() {
        assert!(AcademyConfig::default().with_speed(0.0).validate().is_err());
        assert!(AcademyConfig::default().with_speed(f64::NAN).validate().is_err());
        assert!(AcademyConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_token_lifetime() {
        let overrides = ConfigOverrides::from_toml_str("token_lifetime_ms = 0").unwrap();
        let err = AcademyConfig::default().apply(&overrides).validate().unwrap_err();
        assert!(matches!(err, AcademyError::Configuration(ref msg) if msg.contains("token_lifetime_ms")));
    }

    #[test]
    fn validate_rejects_tiny_speed_without_panicking() {
        let overrides =
            ConfigOverrides::from_lookup(lookup(&[("OAUTH_ACADEMY_SPEED", "1e-300")])).unwrap();
        let config = AcademyConfig::default().apply(&overrides);
        assert!(matches!(config.validate(), Err(AcademyError::Configuration(_))));
        assert_eq!(config.exchange_delay(), MAX_DELAY);
    }

    #[test]
    fn validate_rejects_huge_values() {
        let huge = AcademyConfig::builder()
            .refresh_delay(Duration::from_millis(u64::MAX))
            .build();
        assert!(huge.validate().is_err());
        assert_eq!(huge.refresh_delay(), MAX_DELAY);

        let long_lived = AcademyConfig::builder()
            .token_lifetime(MAX_TOKEN_LIFETIME + Duration::from_secs(1))
            .build();
        assert!(long_lived.validate().is_err());

        let at_limit = AcademyConfig::builder()
            .api_test_delay(Duration::from_secs(2 * 60 * 60))
            .speed(2.0)
            .build();
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(ConfigOverrides::from_toml_str("exchange_delay = 5").is_err());
        let parsed = ConfigOverrides::from_toml_str("exchange_delay_ms = 5").unwrap();
        assert_eq!(parsed.exchange_delay_ms, Some(5));
    }
}
