//! Route definitions and match results.

use std::fmt;

use axum::http::Method;

use crate::trie::Params;

/// The set of methods a pattern answers to, as advertised in `Allow`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowedMethods(Vec<Method>);

impl AllowedMethods {
    pub fn new(methods: Vec<Method>) -> Self {
        Self(methods)
    }

    pub fn methods(&self) -> &[Method] {
        &self.0
    }
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", method)?;
        }
        Ok(())
    }
}

/// What a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<D> {
    /// A registered destination.
    Dest(D),
    /// Synthesized `OPTIONS` answer for a pattern.
    Options(AllowedMethods),
    /// Synthesized answer for a method the pattern does not register.
    MethodNotAllowed(AllowedMethods),
}

/// A registered (or synthesized) route.
#[derive(Debug, Clone)]
pub struct Route<D> {
    pattern: String,
    method: Option<Method>,
    target: Target<D>,
    index: usize,
}

impl<D> Route<D> {
    pub(crate) fn new(
        pattern: String,
        method: Option<Method>,
        target: Target<D>,
        index: usize,
    ) -> Self {
        Self {
            pattern,
            method,
            target,
            index,
        }
    }

    /// The pattern exactly as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `None` means the route accepts any method.
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn target(&self) -> &Target<D> {
        &self.target
    }

    /// Declaration index; lower wins.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The registered destination, `None` for synthesized routes.
    pub fn dest(&self) -> Option<&D> {
        match &self.target {
            Target::Dest(dest) => Some(dest),
            _ => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        !matches!(self.target, Target::Dest(_))
    }

    /// Whether this route is eligible for a request with `method`.
    /// An omitted request method makes every route eligible.
    pub fn accepts(&self, method: Option<&Method>) -> bool {
        match (&self.method, method) {
            (None, _) | (_, None) => true,
            (Some(own), Some(requested)) => own == requested,
        }
    }
}

/// The winning route for a path, with its captured parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r, D> {
    pub route: &'r Route<D>,
    pub params: Params,
}

impl<'r, D> RouteMatch<'r, D> {
    pub fn dest(&self) -> Option<&'r D> {
        self.route.dest()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Log/display label for an optional method.
pub fn method_label(method: Option<&Method>) -> &str {
    method.map(Method::as_str).unwrap_or("ANY")
}
