use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys use a double underscore, e.g. `RESSIPY_REMOTE__BASE_URL`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("RESSIPY_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[cache]
stale_after_hours = "a day"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    // Env-reading tests run inside a Jail so overrides never leak between them

    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ressipy.toml",
                r#"
[server]
host = "127.0.0.1"
port = 3000

[remote]
base_url = "http://localhost:4000/api"
"#,
            )?;

            let config = load_config(Path::new("ressipy.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            assert_eq!(config.remote.base_url, "http://localhost:4000/api");
            assert_eq!(config.cache.stale_after_hours, 24);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_cache_policy() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ressipy.toml",
                r#"
[cache]
stale_after_hours = 48
cascade_concurrency = 8
"#,
            )?;
            jail.set_env("RESSIPY_CACHE__STALE_AFTER_HOURS", "6");
            jail.set_env("RESSIPY_CACHE__BOOTSTRAP_ON_EMPTY", "false");

            let config = load_config(Path::new("ressipy.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.cache.stale_after_hours, 6);
            assert!(!config.cache.bootstrap_on_empty);
            // Untouched by the environment
            assert_eq!(config.cache.cascade_concurrency, 8);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_remote_and_database() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ressipy.toml",
                r#"
[remote]
base_url = "https://ressipy.com/api"
"#,
            )?;
            jail.set_env("RESSIPY_REMOTE__BASE_URL", "http://mirror.local/api");
            jail.set_env("RESSIPY_REMOTE__TIMEOUT_SECS", "5");
            jail.set_env("RESSIPY_DATABASE__PATH", "/var/lib/ressipy/cache.db");

            let config = load_config(Path::new("ressipy.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.remote.base_url, "http://mirror.local/api");
            assert_eq!(config.remote.timeout_secs, 5);
            assert_eq!(
                config.database.path,
                std::path::PathBuf::from("/var/lib/ressipy/cache.db")
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_override_with_wrong_type_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("ressipy.toml", "")?;
            jail.set_env("RESSIPY_CACHE__STALE_AFTER_HOURS", "a day");

            let result = load_config(Path::new("ressipy.toml"));
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }
}
