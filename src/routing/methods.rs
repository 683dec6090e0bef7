//! Method-completeness synthesis.
//!
//! # Responsibilities
//! - Collect the explicitly registered methods of every pattern
//! - Add an `OPTIONS` route echoing them
//! - Add a "method not allowed" route for each known method left out
//!
//! # Design Decisions
//! - The known method set is injected, never a global
//! - Patterns registered only with "any" method get nothing synthesized
//! - The advertised set always includes `OPTIONS`

use axum::http::Method;

use crate::routing::route::{AllowedMethods, Route, Target};

/// Methods injected by `RouterOptions::with_standard_methods`.
pub const STANDARD_METHODS: [Method; 7] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// A route to append after the user routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Synthesized<D> {
    pub pattern: String,
    pub method: Method,
    pub target: Target<D>,
}

/// Build the OPTIONS / 405 routes for `routes`, in pattern declaration order.
pub(crate) fn synthesize<D>(routes: &[Route<D>], known: &[Method]) -> Vec<Synthesized<D>> {
    let mut patterns: Vec<(&str, Vec<&Method>)> = Vec::new();
    for route in routes {
        let Some(method) = route.method() else {
            continue;
        };
        match patterns.iter_mut().find(|(p, _)| *p == route.pattern()) {
            Some((_, methods)) => {
                if !methods.contains(&method) {
                    methods.push(method);
                }
            }
            None => patterns.push((route.pattern(), vec![method])),
        }
    }

    let mut synthesized = Vec::new();
    for (pattern, explicit) in patterns {
        let mut allowed: Vec<Method> = explicit.iter().map(|m| (*m).clone()).collect();
        if !allowed.contains(&Method::OPTIONS) {
            allowed.push(Method::OPTIONS);
            synthesized.push(Synthesized {
                pattern: pattern.to_string(),
                method: Method::OPTIONS,
                target: Target::Options(AllowedMethods::new(allowed.clone())),
            });
        }

        for method in known {
            if allowed.contains(method) {
                continue;
            }
            synthesized.push(Synthesized {
                pattern: pattern.to_string(),
                method: method.clone(),
                target: Target::MethodNotAllowed(AllowedMethods::new(allowed.clone())),
            });
        }
    }
    synthesized
}
