//! Configuration schema definitions.
//!
//! This module defines the route table file structure.
//! All types derive Serde traits for deserialization from config files.

use axum::http::method::InvalidMethod;
use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::routing::{Router, RouterError, RouterOptions};

/// Root configuration for the route table service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Build options for the route registry.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions, in declaration order.
    pub routes: Vec<RouteConfig>,
}

impl RouterConfig {
    /// Registry options described by the `routing` section.
    pub fn router_options(&self) -> Result<RouterOptions, InvalidMethod> {
        let known_methods = if self.routing.synthesize_methods {
            let methods = self
                .routing
                .known_methods
                .iter()
                .map(|m| parse_method(m))
                .collect::<Result<Vec<_>, _>>()?;
            Some(methods)
        } else {
            None
        };
        Ok(RouterOptions {
            compress: self.routing.compress,
            known_methods,
        })
    }

    /// Register every route in file order and build the registry.
    ///
    /// Destinations are the route names.
    pub fn build_router(&self) -> Result<Router<String>, BuildError> {
        let mut router = Router::with_options(self.router_options()?);
        for route in &self.routes {
            let method = route.method.as_deref().map(parse_method).transpose()?;
            router.register(route.path.clone(), method, route.name.clone())?;
        }
        router.build()?;
        Ok(router)
    }
}

/// Error type for turning a config into a router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Method(#[from] InvalidMethod),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Parse a method name; lowercase names are accepted.
pub fn parse_method(raw: &str) -> Result<Method, InvalidMethod> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Registry build options.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Compress the trie after all routes are inserted.
    pub compress: bool,

    /// Synthesize OPTIONS and 405 routes for explicitly registered methods.
    pub synthesize_methods: bool,

    /// Methods considered for 405 synthesis.
    pub known_methods: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            compress: true,
            synthesize_methods: true,
            known_methods: ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A single route: pattern, optional method, destination name.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Destination reported when this route wins.
    pub name: String,

    /// Pattern, e.g. "/users/:id" or "/files/*path".
    pub path: String,

    /// HTTP method; omitted means any method.
    #[serde(default)]
    pub method: Option<String>,
}
