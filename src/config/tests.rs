use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_ensemble_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("ENSEMBLE_PORT");
        env::remove_var("ENSEMBLE_BIND_ADDR");
        env::remove_var("ENSEMBLE_CATALOG_PATH");
        env::remove_var("ENSEMBLE_IMAGE_ROOT");
        env::remove_var("ENSEMBLE_STATIC_DIR");
        env::remove_var("ENSEMBLE_STORE_PATH");
        env::remove_var("ENSEMBLE_API_BASE");
        env::remove_var("ENSEMBLE_API_KEY");
        env::remove_var("OPENAI_API_KEY");
        env::remove_var("ENSEMBLE_EMBED_MODEL");
        env::remove_var("ENSEMBLE_VISION_MODEL");
        env::remove_var("ENSEMBLE_THRESHOLD");
        env::remove_var("ENSEMBLE_TOP_K");
        env::remove_var("ENSEMBLE_MAX_RETRIES");
        env::remove_var("ENSEMBLE_REQUEST_TIMEOUT_SECS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.catalog_path, PathBuf::from("./data/catalog.jsonl"));
    assert_eq!(config.image_root, PathBuf::from("./data/images"));
    assert_eq!(config.api_base, "https://api.openai.com/v1");
    assert!(config.api_key.is_empty());
    assert_eq!(config.embed_model, "text-embedding-3-large");
    assert_eq!(config.vision_model, "gpt-4o");
    assert!((config.threshold - 0.5).abs() < f32::EPSILON);
    assert_eq!(config.top_k, 2);
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.request_timeout_secs, 60);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_ensemble_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_custom_bind_addr() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_BIND_ADDR", "0.0.0.0")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
        );
    });
}

#[test]
#[serial]
fn test_from_env_custom_paths() {
    clear_ensemble_env();

    with_env_vars(
        &[
            ("ENSEMBLE_CATALOG_PATH", "/data/catalog.jsonl"),
            ("ENSEMBLE_IMAGE_ROOT", "/data/images"),
            ("ENSEMBLE_STORE_PATH", "/data/history.jsonl"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.jsonl"));
            assert_eq!(config.image_root, PathBuf::from("/data/images"));
            assert_eq!(config.store_path, PathBuf::from("/data/history.jsonl"));
        },
    );
}

#[test]
#[serial]
fn test_api_key_prefers_ensemble_var() {
    clear_ensemble_env();

    with_env_vars(
        &[
            ("ENSEMBLE_API_KEY", "sk-ensemble"),
            ("OPENAI_API_KEY", "sk-openai"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.api_key, "sk-ensemble");
        },
    );
}

#[test]
#[serial]
fn test_api_key_falls_back_to_openai_var() {
    clear_ensemble_env();

    with_env_vars(&[("OPENAI_API_KEY", "sk-openai")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.api_key, "sk-openai");
    });
}

#[test]
#[serial]
fn test_from_env_tuning_overrides() {
    clear_ensemble_env();

    with_env_vars(
        &[
            ("ENSEMBLE_THRESHOLD", "0.75"),
            ("ENSEMBLE_TOP_K", "5"),
            ("ENSEMBLE_MAX_RETRIES", "4"),
            ("ENSEMBLE_REQUEST_TIMEOUT_SECS", "30"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert!((config.threshold - 0.75).abs() < f32::EPSILON);
            assert_eq!(config.top_k, 5);
            assert_eq!(config.max_retries, 4);
            assert_eq!(config.request_timeout_secs, 30);
        },
    );
}

#[test]
#[serial]
fn test_invalid_threshold_uses_default() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_THRESHOLD", "not_a_number")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert!((config.threshold - 0.5).abs() < f32::EPSILON);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_PORT", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("failed to parse port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_ensemble_env();

    with_env_vars(&[("ENSEMBLE_BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("failed to parse bind address"));
    });
}

#[test]
fn test_validate_nonexistent_catalog_path() {
    let config = Config {
        catalog_path: PathBuf::from("/nonexistent/catalog.jsonl"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_catalog_path_is_directory() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("src"),
        image_root: manifest_dir.join("src"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_image_root_is_file() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("Cargo.toml"),
        image_root: manifest_dir.join("Cargo.toml"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_threshold_above_one() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("Cargo.toml"),
        image_root: manifest_dir.join("src"),
        threshold: 1.5,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidThreshold { .. }));
}

#[test]
fn test_validate_negative_threshold_is_allowed() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("Cargo.toml"),
        image_root: manifest_dir.join("src"),
        static_dir: manifest_dir.join("src"),
        store_path: manifest_dir.join("target").join("history.jsonl"),
        threshold: -1.0,
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_zero_top_k() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("Cargo.toml"),
        image_root: manifest_dir.join("src"),
        top_k: 0,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTopK));
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        catalog_path: manifest_dir.join("Cargo.toml"),
        image_root: manifest_dir.join("src"),
        // static_dir and store_path may not exist yet
        static_dir: manifest_dir.join("no-such-static"),
        store_path: manifest_dir.join("no-such-store.jsonl"),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_ensemble_env();

    with_env_vars(
        &[
            ("ENSEMBLE_PORT", "8080"),
            ("ENSEMBLE_BIND_ADDR", "0.0.0.0"),
            ("ENSEMBLE_CATALOG_PATH", "/data/catalog.jsonl"),
            ("ENSEMBLE_IMAGE_ROOT", "/data/images"),
            ("ENSEMBLE_API_BASE", "http://localhost:4000/v1"),
            ("ENSEMBLE_EMBED_MODEL", "text-embedding-3-small"),
            ("ENSEMBLE_VISION_MODEL", "gpt-4o-mini"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.port, 8080);
            assert_eq!(
                config.bind_addr,
                IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
            );
            assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.jsonl"));
            assert_eq!(config.image_root, PathBuf::from("/data/images"));
            assert_eq!(config.api_base, "http://localhost:4000/v1");
            assert_eq!(config.embed_model, "text-embedding-3-small");
            assert_eq!(config.vision_model, "gpt-4o-mini");
            assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        },
    );
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("invalid port"));
    assert!(err.to_string().contains("0"));
    assert!(err.to_string().contains("1 and 65535"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));

    let err = ConfigError::InvalidThreshold { value: 2.0 };
    assert!(err.to_string().contains("2"));
}
