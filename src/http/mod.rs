//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, request ID, trace span)
//!     → dispatch: routing::Router::resolve(path, method)
//!         Dest             → 200 + JSON (route, pattern, params)
//!         Options          → 204 + Allow
//!         MethodNotAllowed → 405 + Allow
//!         no match         → 404
//! ```

pub mod server;

pub use server::{AppState, RouteServer};
