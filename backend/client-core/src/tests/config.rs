use crate::DEFAULT_API_BASE_URL;
use crate::config::{API_URL_ENV, GatewayConfig, REFRESH_PATH_ENV, REFRESH_TIMEOUT_ENV};
use crate::error::ConfigError;
use crate::gateway::Gateway;
use crate::GatewayError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies that relative paths resolve under the API prefix.
///
/// **WHY THIS MATTERS**: `Url::join` replaces the last segment of a base without a trailing
/// slash, so `http://host/api` + `events/all` would hit `http://host/events/all`.
#[test]
fn given_base_without_trailing_slash_when_normalized_then_joins_under_prefix() {
    // GIVEN: The default base URL (no trailing slash)
    let config = GatewayConfig::default();
    assert_eq!(config.base_url, DEFAULT_API_BASE_URL);

    // WHEN: Normalizing and joining a relative path
    let base = config.normalized_base_url().unwrap();
    let joined = base.join("events/all").unwrap();

    // THEN: The API prefix is preserved
    assert_eq!(joined.as_str(), "http://localhost:5000/api/events/all");
}

#[test]
fn given_invalid_values_when_validating_then_returns_validation_error() {
    let cases = vec![
        GatewayConfig::new("ftp://example.com/api"),
        GatewayConfig {
            refresh_path: String::from("/"),
            ..GatewayConfig::default()
        },
        GatewayConfig {
            request_timeout_ms: 0,
            ..GatewayConfig::default()
        },
        GatewayConfig::default()
            .with_refresh_timeout(Duration::from_secs(30))
            .with_queue_timeout(Duration::from_secs(5)),
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "Should reject {:?}",
            config
        );
    }
}

/// **VALUE**: Verifies that a partial TOML file is merged with defaults.
#[test]
fn given_partial_toml_when_loading_then_missing_fields_use_defaults() {
    // GIVEN: A config file that only sets the base URL and refresh timeout
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");
    std::fs::write(
        &path,
        "base_url = \"https://api.example.com/api\"\nrefresh_timeout_ms = 5000\n",
    )
    .unwrap();

    // WHEN: Loading
    let config = GatewayConfig::load(&path).unwrap();

    // THEN: Explicit values kept, the rest defaulted
    assert_eq!(config.base_url, "https://api.example.com/api");
    assert_eq!(config.refresh_timeout(), Duration::from_secs(5));
    assert_eq!(config.refresh_path, "auth/refresh");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn given_missing_file_when_loading_then_returns_defaults() {
    let dir = TempDir::new().unwrap();

    let config = GatewayConfig::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, GatewayConfig::default());
}

/// **VALUE**: Verifies that a corrupt config file is an error, not silently ignored.
///
/// **BUG THIS CATCHES**: Would catch the loader falling back to defaults on parse errors,
/// which would quietly point the client at localhost in production.
#[test]
fn given_corrupt_toml_when_loading_then_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");
    std::fs::write(&path, "base_url = [not toml").unwrap();

    let result = GatewayConfig::load(&path);

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies environment overrides for URL, refresh path and refresh timeout.
#[test]
#[serial]
fn given_env_overrides_when_building_from_env_then_values_applied() {
    // GIVEN: Environment overrides
    // SAFETY: serialized with other env-mutating tests
    unsafe {
        std::env::set_var(API_URL_ENV, "https://events.example.com/api/");
        std::env::set_var(REFRESH_PATH_ENV, "session/refresh");
        std::env::set_var(REFRESH_TIMEOUT_ENV, "1500");
    }

    // WHEN: Building from env
    let result = GatewayConfig::from_env();

    // SAFETY: serialized with other env-mutating tests
    unsafe {
        std::env::remove_var(API_URL_ENV);
        std::env::remove_var(REFRESH_PATH_ENV);
        std::env::remove_var(REFRESH_TIMEOUT_ENV);
    }

    // THEN: Overrides applied
    let config = result.unwrap();
    assert_eq!(config.base_url, "https://events.example.com/api/");
    assert_eq!(config.refresh_path, "session/refresh");
    assert_eq!(config.refresh_timeout(), Duration::from_millis(1500));
}

#[test]
#[serial]
fn given_non_numeric_timeout_env_when_building_from_env_then_env_error() {
    // SAFETY: serialized with other env-mutating tests
    unsafe {
        std::env::set_var(REFRESH_TIMEOUT_ENV, "ten seconds");
    }

    let result = GatewayConfig::from_env();

    // SAFETY: serialized with other env-mutating tests
    unsafe {
        std::env::remove_var(REFRESH_TIMEOUT_ENV);
    }

    match result {
        Err(ConfigError::EnvError { name, .. }) => assert_eq!(name, REFRESH_TIMEOUT_ENV),
        other => panic!("Expected EnvError, got {:?}", other),
    }
}

/// **VALUE**: Verifies that a gateway cannot be built from a config that fails validation.
///
/// **WHY THIS MATTERS**: With a queue bound shorter than the refresh bound, queued requests
/// give up and report an ended session while the refresh is still on its way to succeeding.
///
/// **BUG THIS CATCHES**: Would catch `Gateway::new` skipping `validate()` for configs
/// assembled in code rather than loaded from env or TOML.
#[test]
fn given_queue_shorter_than_refresh_when_building_gateway_then_config_error() {
    let cases = vec![
        GatewayConfig::default()
            .with_refresh_timeout(Duration::from_secs(10))
            .with_queue_timeout(Duration::from_secs(1)),
        GatewayConfig::default().with_queue_timeout(Duration::ZERO),
    ];

    for config in cases {
        match Gateway::new(&config) {
            Err(GatewayError::Config(ConfigError::ValidationError { .. })) => {}
            Err(other) => panic!("Expected config validation error, got {other}"),
            Ok(_) => panic!("Gateway should reject {config:?}"),
        }
    }
}

#[test]
fn given_valid_config_when_building_gateway_then_refresh_bounds_applied() {
    let config = GatewayConfig::default()
        .with_refresh_timeout(Duration::from_millis(200))
        .with_queue_timeout(Duration::from_millis(200));

    let gateway = Gateway::new(&config).unwrap();

    assert!(!gateway.is_refreshing());
    assert_eq!(gateway.base_url().as_str(), "http://localhost:5000/api/");
}

/// **VALUE**: Verifies that oversized durations clamp instead of wrapping to a tiny value.
///
/// **BUG THIS CATCHES**: Would catch an `as u64` cast on `as_millis()`, which turns
/// `Duration::MAX` into a bound of a few milliseconds.
#[test]
fn given_oversized_duration_when_setting_timeouts_then_clamped_to_max() {
    let config = GatewayConfig::default()
        .with_refresh_timeout(Duration::MAX)
        .with_queue_timeout(Duration::MAX);

    assert_eq!(config.refresh_timeout_ms, u64::MAX);
    assert_eq!(config.queue_timeout_ms, u64::MAX);
    assert!(config.validate().is_ok());
}
