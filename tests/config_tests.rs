use std::env;

use pretty_assertions::assert_eq;
use serial_test::serial;
use timekeeping::config::Config;

mod common;

const KEYS: [&str; 10] = [
    "DATABASE_URL",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "BASE_URL",
    "TIME_ZONE",
    "REGULAR_HOURS_CAP",
    "OVERTIME_LIMIT_HOURS",
    "OVERTIME_MIN_HOURS",
    "SCHEDULE_CACHE_TTL_SECS",
];

/// Runs `test` with the config variables cleared, then restores them.
fn with_clean_env(test: impl FnOnce()) {
    common::setup_test_env();

    let original: Vec<(&str, Option<String>)> =
        KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();
    for key in KEYS {
        unsafe { env::remove_var(key) };
    }

    test();

    unsafe {
        for (key, value) in original {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_from_env_with_defaults() {
    with_clean_env(|| {
        let config = Config::from_env_only().unwrap();

        assert_eq!(
            config.database_url,
            "postgres://@localhost:5432/timekeeping"
        );
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.client_base_url, "http://localhost:3000");
        assert_eq!(config.time_zone, chrono_tz::Asia::Manila);
        assert_eq!(config.regular_hours_cap, 8.0);
        assert_eq!(config.overtime_limit_hours, 4.0);
        assert_eq!(config.overtime_min_hours, 0.5);
        assert_eq!(config.schedule_cache_ttl_secs, 60);
    });
}

#[test]
#[serial]
fn test_config_from_env_with_custom_values() {
    with_clean_env(|| {
        unsafe {
            env::set_var("DATABASE_URL", "postgres://db:5432/attendance");
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "3000");
            env::set_var("ENVIRONMENT", "production");
            env::set_var("TIME_ZONE", "America/New_York");
            env::set_var("REGULAR_HOURS_CAP", "7.5");
            env::set_var("SCHEDULE_CACHE_TTL_SECS", "5");
        }

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://db:5432/attendance");
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.environment, "production");
        assert_eq!(config.time_zone, chrono_tz::America::New_York);
        assert_eq!(config.regular_hours_cap, 7.5);
        assert_eq!(config.schedule_cache_ttl_secs, 5);
    });
}

#[test]
#[serial]
fn test_unparsable_numbers_fall_back_to_defaults() {
    with_clean_env(|| {
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("OVERTIME_LIMIT_HOURS", "lots");
        }

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.overtime_limit_hours, 4.0);
    });
}

#[test]
#[serial]
fn test_unknown_time_zone_is_an_error() {
    with_clean_env(|| {
        unsafe { env::set_var("TIME_ZONE", "Mars/Olympus_Mons") };

        let err = Config::from_env_only().unwrap_err();

        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    });
}

#[test]
fn test_config_is_deterministic() {
    let config = Config::test_config();

    assert_eq!(config.environment, "test");
    assert_eq!(config.port, 0);
    assert_eq!(config.time_zone, chrono_tz::Asia::Manila);
}
