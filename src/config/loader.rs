//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[listener]
bind_address = "127.0.0.1:9000"

[routing]
compress = false

[[routes]]
name = "user"
path = "/users/:id"
method = "GET"

[[routes]]
name = "files"
path = "/files/*path"
"#;

    #[test]
    fn test_parse_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert!(!config.routing.compress);
        assert!(config.routing.synthesize_methods);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].method.as_deref(), Some("GET"));
        assert_eq!(config.routes[1].method, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("[[routes]]\nname = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_error() {
        let err = parse_config("[[routes]]\nname = \"x\"\npath = \"nope\"").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("url-router-{}.toml", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.routes[0].name, "user");

        fs::remove_file(&path).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
