//! Trie-based URL router.
//!
//! Patterns are registered once, in order, then compiled into a prefix tree
//! that resolves request paths to the earliest declared matching route.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod trie;

pub use config::schema::RouterConfig;
pub use http::RouteServer;
pub use routing::{Route, RouteMatch, Router, RouterError, RouterOptions, Target};
pub use trie::{Params, Trie};
