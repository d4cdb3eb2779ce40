//! Tests for configuration loading.

use std::io::Write;
use std::time::Duration;

use pretty_assertions::assert_eq;

use oauth_academy::config::{AcademyConfig, ConfigOverrides};
use oauth_academy::error::AcademyError;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn config_file_overrides_defaults() {
    let file = write_config("exchange_delay_ms = 250\nspeed = 2.0\n");
    let overrides = ConfigOverrides::from_file(file.path()).unwrap();
    let config = AcademyConfig::default().apply(&overrides);

    assert_eq!(config.exchange_delay(), Duration::from_millis(125));
    assert_eq!(config.login_redirect_delay(), Duration::from_millis(500));
    assert_eq!(config.token_lifetime(), Duration::from_secs(300));
}

#[test]
fn bad_config_file_names_the_path() {
    let file = write_config("exchange_delay = 250\n");
    let err = ConfigOverrides::from_file(file.path()).unwrap_err();
    match err {
        AcademyError::Configuration(msg) => {
            assert!(msg.contains(&file.path().display().to_string()))
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(AcademyConfig::load(Some(&path)).is_err());
}

#[test]
fn later_layers_win() {
    let file = ConfigOverrides::from_toml_str("refresh_delay_ms = 300\napi_test_delay_ms = 400\n")
        .unwrap();
    let env = ConfigOverrides::from_lookup(|key| {
        (key == "OAUTH_ACADEMY_REFRESH_DELAY_MS").then(|| "50".to_string())
    })
    .unwrap();
    let config = AcademyConfig::default().apply(&file).apply(&env);

    assert_eq!(config.refresh_delay(), Duration::from_millis(50));
    assert_eq!(config.api_test_delay(), Duration::from_millis(400));
}

#[test]
fn zero_tick_fails_validation() {
    let config = AcademyConfig::builder()
        .countdown_tick(Duration::ZERO)
        .build();
    assert!(matches!(
        config.validate(),
        Err(AcademyError::Configuration(_))
    ));
}

#[test]
fn zero_token_lifetime_in_file_is_rejected() {
    let file = write_config("token_lifetime_ms = 0\n");
    assert!(matches!(
        AcademyConfig::load(Some(file.path())),
        Err(AcademyError::Configuration(_))
    ));
}

#[test]
fn speed_too_small_for_any_delay_is_rejected() {
    let overrides = ConfigOverrides::from_lookup(|key| {
        (key == "OAUTH_ACADEMY_SPEED").then(|| "1e-300".to_string())
    })
    .unwrap();
    let config = AcademyConfig::default().apply(&overrides);
    assert!(config.validate().is_err());
    assert_eq!(config.exchange_delay(), oauth_academy::config::MAX_DELAY);
}
