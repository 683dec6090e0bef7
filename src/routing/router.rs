//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store routes in declaration order
//! - Build the matching engine once, then serve lookups
//! - Return the earliest declared route among all structural matches
//!
//! # Design Decisions
//! - Immutable after `build` (thread-safe without locks)
//! - Duplicates are detected on the exact `(method, pattern)` strings
//! - Routes sharing a pattern share one trie node holding all their indices
//! - Synthesized routes are indexed after every user route

use std::collections::{HashMap, HashSet};

use axum::http::Method;

use crate::routing::methods::{self, STANDARD_METHODS};
use crate::routing::path::request_path;
use crate::routing::route::{method_label, Route, RouteMatch, Target};
use crate::routing::types::RouterError;
use crate::trie::{validate_pattern, Trie, TrieError, TrieMatch};

/// Build-time options.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Compress the trie after insertion.
    pub compress: bool,

    /// Methods used for OPTIONS / 405 synthesis; `None` disables it.
    pub known_methods: Option<Vec<Method>>,
}

impl RouterOptions {
    /// Defaults plus synthesis over [`STANDARD_METHODS`].
    pub fn with_standard_methods() -> Self {
        Self {
            known_methods: Some(STANDARD_METHODS.to_vec()),
            ..Self::default()
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            compress: true,
            known_methods: None,
        }
    }
}

/// Ordered route registry backed by a [`Trie`].
///
/// ```
/// use url_router::Router;
///
/// let mut router = Router::new();
/// router.register("/resources/:id", None, "one_resource").unwrap();
/// router.register("/resources", None, "all_resources").unwrap();
/// router.build().unwrap();
///
/// let found = router.resolve("/resources/123", None).unwrap().unwrap();
/// assert_eq!(found.dest(), Some(&"one_resource"));
/// assert_eq!(found.param("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct Router<D> {
    options: RouterOptions,
    routes: Vec<Route<D>>,
    registered: HashSet<(Option<Method>, String)>,
    trie: Option<Trie<Vec<usize>>>,
}

impl<D> Router<D> {
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            routes: Vec::new(),
            registered: HashSet::new(),
            trie: None,
        }
    }

    /// Register every tuple in order, then build.
    pub fn from_routes<S, I>(options: RouterOptions, routes: I) -> Result<Self, RouterError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Option<Method>, D)>,
    {
        let mut router = Self::with_options(options);
        for (pattern, method, dest) in routes {
            router.register(pattern, method, dest)?;
        }
        router.build()?;
        Ok(router)
    }

    /// Append a route. Returns its declaration index.
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        method: Option<Method>,
        dest: D,
    ) -> Result<usize, RouterError> {
        if self.trie.is_some() {
            return Err(RouterError::AlreadyBuilt);
        }
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        let key = (method, pattern);
        if self.registered.contains(&key) {
            let (method, pattern) = key;
            return Err(RouterError::DuplicateRoute {
                method: method_label(method.as_ref()).to_string(),
                pattern,
            });
        }
        self.registered.insert(key.clone());

        let (method, pattern) = key;
        let index = self.routes.len();
        tracing::debug!(
            index,
            method = method_label(method.as_ref()),
            pattern = %pattern,
            "Route registered"
        );
        self.routes
            .push(Route::new(pattern, method, Target::Dest(dest), index));
        Ok(index)
    }

    /// Synthesize method routes (if configured), build and compress the trie.
    pub fn build(&mut self) -> Result<(), RouterError> {
        if self.trie.is_some() {
            return Err(RouterError::AlreadyBuilt);
        }

        let user_routes = self.routes.len();
        if let Some(known) = &self.options.known_methods {
            for synthesized in methods::synthesize(&self.routes, known) {
                let index = self.routes.len();
                self.routes.push(Route::new(
                    synthesized.pattern,
                    Some(synthesized.method),
                    synthesized.target,
                    index,
                ));
            }
        }

        let trie = match build_trie(&self.routes, self.options.compress) {
            Ok(trie) => trie,
            Err(e) => {
                self.routes.truncate(user_routes);
                return Err(e.into());
            }
        };

        tracing::info!(
            routes = user_routes,
            synthesized = self.routes.len() - user_routes,
            patterns = trie.len(),
            compressed = trie.is_compressed(),
            "Router built"
        );
        self.trie = Some(trie);
        Ok(())
    }

    /// Resolve `path` to the earliest declared route accepting `method`.
    ///
    /// `Ok(None)` means nothing matched.
    pub fn resolve(
        &self,
        path: &str,
        method: Option<&Method>,
    ) -> Result<Option<RouteMatch<'_, D>>, RouterError> {
        let trie = self.trie.as_ref().ok_or(RouterError::NotBuilt)?;

        let mut best: Option<RouteMatch<'_, D>> = None;
        for found in trie.find_all(path) {
            let candidate = found
                .route
                .iter()
                .map(|&index| &self.routes[index])
                .find(|route| route.accepts(method));
            let Some(route) = candidate else {
                continue;
            };
            if best.as_ref().is_some_and(|b| b.route.index() <= route.index()) {
                continue;
            }
            best = Some(RouteMatch {
                route,
                params: found.params,
            });
        }

        tracing::trace!(
            path,
            method = method_label(method),
            matched = ?best.as_ref().map(|m| m.route.index()),
            "Route resolved"
        );
        Ok(best)
    }

    /// Resolve a full URL (`http://host/p?q`) or a bare path.
    /// Only the percent-decoded path component takes part in matching.
    pub fn resolve_url(
        &self,
        url: &str,
        method: Option<&Method>,
    ) -> Result<Option<RouteMatch<'_, D>>, RouterError> {
        let path = request_path(url)?;
        self.resolve(&path, method)
    }

    /// Every structural match for `path`, ignoring methods, by declaration index.
    pub fn find_all(&self, path: &str) -> Result<Vec<RouteMatch<'_, D>>, RouterError> {
        let trie = self.trie.as_ref().ok_or(RouterError::NotBuilt)?;

        let mut all: Vec<RouteMatch<'_, D>> = trie
            .find_all(path)
            .into_iter()
            .flat_map(|found| {
                let TrieMatch { route: indices, params } = found;
                indices.iter().map(move |&index| RouteMatch {
                    route: &self.routes[index],
                    params: params.clone(),
                })
            })
            .collect();
        all.sort_by_key(|m| m.route.index());
        Ok(all)
    }

    /// User and synthesized routes, in declaration order.
    pub fn routes(&self) -> &[Route<D>] {
        &self.routes
    }

    pub fn is_built(&self) -> bool {
        self.trie.is_some()
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }
}

/// One trie entry per distinct pattern, holding indices in declaration order.
fn build_trie<D>(routes: &[Route<D>], compress: bool) -> Result<Trie<Vec<usize>>, TrieError> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut patterns: Vec<(&str, Vec<usize>)> = Vec::new();
    for route in routes {
        match slots.get(route.pattern()) {
            Some(&slot) => patterns[slot].1.push(route.index()),
            None => {
                slots.insert(route.pattern(), patterns.len());
                patterns.push((route.pattern(), vec![route.index()]));
            }
        }
    }

    let mut trie = Trie::new();
    for (pattern, indices) in patterns {
        trie.insert(pattern, indices)?;
    }
    if compress {
        trie.compress();
    }
    Ok(trie)
}

impl<D> Default for Router<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_order() {
        let mut router = Router::new();
        router.register("/r/:id", None, "first").unwrap();
        router.register("/r/*rest", None, "second").unwrap();
        router.build().unwrap();

        let found = router.resolve("/r/123", None).unwrap().unwrap();
        assert_eq!(found.dest(), Some(&"first"));
        assert_eq!(found.param("id"), Some("123"));
        assert_eq!(found.params.len(), 1);
    }

    #[test]
    fn test_duplicated_route() {
        let mut router = Router::new();
        router.register("/", None, "root").unwrap();

        let err = router.register("/", None, "the_same").unwrap_err();
        assert!(matches!(
            err,
            RouterError::DuplicateRoute { ref method, ref pattern } if method == "ANY" && pattern == "/"
        ));

        router.build().unwrap();
        let found = router.resolve("/", None).unwrap().unwrap();
        assert_eq!(found.dest(), Some(&"root"));
    }

    #[test]
    fn test_same_pattern_different_methods() {
        let mut router = Router::new();
        router.register("/users", Some(Method::GET), "list").unwrap();
        router.register("/users", Some(Method::POST), "create").unwrap();
        router.build().unwrap();

        let get = router.resolve("/users", Some(&Method::GET)).unwrap().unwrap();
        assert_eq!(get.dest(), Some(&"list"));
        let post = router.resolve("/users", Some(&Method::POST)).unwrap().unwrap();
        assert_eq!(post.dest(), Some(&"create"));
        assert!(router.resolve("/users", Some(&Method::PUT)).unwrap().is_none());
        // No method: every route is eligible, the first one wins.
        let any = router.resolve("/users", None).unwrap().unwrap();
        assert_eq!(any.dest(), Some(&"list"));
    }

    #[test]
    fn test_usage_order() {
        let mut router: Router<&str> = Router::new();
        assert!(matches!(router.resolve("/", None), Err(RouterError::NotBuilt)));
        assert!(matches!(router.find_all("/"), Err(RouterError::NotBuilt)));

        router.build().unwrap();
        assert!(matches!(
            router.register("/", None, "late"),
            Err(RouterError::AlreadyBuilt)
        ));
        assert!(matches!(router.build(), Err(RouterError::AlreadyBuilt)));
    }

    #[test]
    fn test_param_name_conflict_fails_build() {
        let mut router = Router::new();
        router.register("/users/:id", None, "a").unwrap();
        router.register("/users/:name/x", None, "b").unwrap();
        assert!(matches!(router.build(), Err(RouterError::Pattern(_))));
        assert!(!router.is_built());
        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    fn test_resolve_url() {
        let router = Router::from_routes(
            RouterOptions::default(),
            vec![("/resources/:id", None, "one"), ("/", None, "root")],
        )
        .unwrap();

        let found = router
            .resolve_url("http://example.org/resources/123?x=1#top", None)
            .unwrap()
            .unwrap();
        assert_eq!(found.dest(), Some(&"one"));
        assert_eq!(found.param("id"), Some("123"));

        let found = router.resolve_url("http://example.org/", None).unwrap().unwrap();
        assert_eq!(found.dest(), Some(&"root"));
        let found = router.resolve_url("/", None).unwrap().unwrap();
        assert_eq!(found.dest(), Some(&"root"));

        assert!(router
            .resolve_url("http://example.org/notfound", None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_synthesized_routes_come_last() {
        let router = Router::from_routes(
            RouterOptions::with_standard_methods(),
            vec![
                ("/r/:id", Some(Method::GET), "get"),
                ("/r/*rest", Some(Method::POST), "post"),
            ],
        )
        .unwrap();

        let user = router.routes().iter().filter(|r| !r.is_synthesized()).count();
        assert_eq!(user, 2);
        assert!(router.routes()[2..].iter().all(Route::is_synthesized));

        // The user wildcard beats the 405 synthesized for "/r/:id".
        let found = router.resolve("/r/1", Some(&Method::POST)).unwrap().unwrap();
        assert_eq!(found.dest(), Some(&"post"));
        assert_eq!(found.param("rest"), Some("1"));

        let found = router.resolve("/r/1", Some(&Method::DELETE)).unwrap().unwrap();
        assert!(matches!(found.route.target(), Target::MethodNotAllowed(a) if a.to_string() == "GET, OPTIONS"));
        assert_eq!(found.route.pattern(), "/r/:id");
    }

    #[test]
    fn test_find_all_is_sorted_by_index() {
        let router = Router::from_routes(
            RouterOptions::default(),
            vec![("/r/:id", None, "y"), ("/r/1", None, "x")],
        )
        .unwrap();

        let all = router.find_all("/r/1").unwrap();
        let dests: Vec<_> = all.iter().filter_map(RouteMatch::dest).collect();
        assert_eq!(dests, vec![&"y", &"x"]);
    }

    #[test]
    fn test_uncompressed_router_resolves_the_same() {
        let routes = vec![
            ("/resources/:id", None, 1),
            ("/resources", None, 2),
            ("/*all", None, 3),
        ];
        let plain = Router::from_routes(
            RouterOptions {
                compress: false,
                known_methods: None,
            },
            routes.clone(),
        )
        .unwrap();
        let compressed = Router::from_routes(RouterOptions::default(), routes).unwrap();

        for path in ["/resources/7", "/resources", "/other", "/"] {
            let a = plain.resolve(path, None).unwrap().map(|m| (*m.route.dest().unwrap(), m.params));
            let b = compressed.resolve(path, None).unwrap().map(|m| (*m.route.dest().unwrap(), m.params));
            assert_eq!(a, b, "path {path}");
        }
    }
}
