//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route patterns are well formed
//! - Check methods and the bind address parse
//! - Detect duplicate routes before the registry does
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{parse_method, RouterConfig};
use crate::trie::validate_pattern;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index}: name must not be empty")]
    EmptyName { index: usize },

    #[error("route {name}: path `{path}` must start with '/'")]
    RelativePath { name: String, path: String },

    #[error("route {name}: wildcard in `{path}` must be the last segment")]
    WildcardNotLast { name: String, path: String },

    #[error("route {name}: invalid method `{method}`")]
    InvalidMethod { name: String, method: String },

    #[error("route {name}: {method} {path} is already declared")]
    DuplicateRoute {
        name: String,
        method: String,
        path: String,
    },

    #[error("routing.known_methods: invalid method `{0}`")]
    InvalidKnownMethod(String),

    #[error("listener.bind_address: invalid socket address `{0}`")]
    InvalidBindAddress(String),
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for method in &config.routing.known_methods {
        if parse_method(method).is_err() {
            errors.push(ValidationError::InvalidKnownMethod(method.clone()));
        }
    }

    let mut seen = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        }
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                name: route.name.clone(),
                path: route.path.clone(),
            });
        }
        if validate_pattern(&route.path).is_err() {
            errors.push(ValidationError::WildcardNotLast {
                name: route.name.clone(),
                path: route.path.clone(),
            });
        }

        let method = match route.method.as_deref().map(parse_method).transpose() {
            Ok(method) => method,
            Err(_) => {
                errors.push(ValidationError::InvalidMethod {
                    name: route.name.clone(),
                    method: route.method.clone().unwrap_or_default(),
                });
                continue;
            }
        };
        if !seen.insert((method.clone(), route.path.as_str())) {
            errors.push(ValidationError::DuplicateRoute {
                name: route.name.clone(),
                method: method.map_or_else(|| "ANY".to_string(), |m| m.to_string()),
                path: route.path.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn config(routes: &[(&str, &str, Option<&str>)]) -> RouterConfig {
        RouterConfig {
            routes: routes
                .iter()
                .map(|(name, path, method)| RouteConfig {
                    name: name.to_string(),
                    path: path.to_string(),
                    method: method.map(String::from),
                })
                .collect(),
            ..RouterConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = config(&[
            ("root", "/", None),
            ("user", "/users/:id", Some("GET")),
            ("user_update", "/users/:id", Some("PUT")),
            ("files", "/files/*path", None),
        ]);
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = config(&[
            ("", "/a", None),
            ("rel", "a", None),
            ("splat", "/files/*path/x", None),
            ("bad", "/b", Some("GE T")),
            ("first", "/c", Some("get")),
            ("second", "/c", Some("GET")),
        ]);
        config.listener.bind_address = "nowhere".into();
        config.routing.known_methods.push("N O".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("nowhere".into()),
                ValidationError::InvalidKnownMethod("N O".into()),
                ValidationError::EmptyName { index: 0 },
                ValidationError::RelativePath {
                    name: "rel".into(),
                    path: "a".into()
                },
                ValidationError::WildcardNotLast {
                    name: "splat".into(),
                    path: "/files/*path/x".into()
                },
                ValidationError::InvalidMethod {
                    name: "bad".into(),
                    method: "GE T".into()
                },
                ValidationError::DuplicateRoute {
                    name: "second".into(),
                    method: "GET".into(),
                    path: "/c".into()
                },
            ]
        );
    }

    #[test]
    fn test_wildcard_suffix_is_rejected() {
        let config = config(&[("json", "/files/*path.json", None)]);
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::WildcardNotLast {
                name: "json".into(),
                path: "/files/*path.json".into()
            }])
        );
    }

    #[test]
    fn test_any_and_specific_method_do_not_collide() {
        let config = config(&[("any", "/x", None), ("get", "/x", Some("GET"))]);
        assert!(validate_config(&config).is_ok());
    }
}
