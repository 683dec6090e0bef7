//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (pattern, method, destination)[]
//!     → router.rs (assign declaration index, reject duplicates)
//!     → methods.rs (synthesize OPTIONS / 405 routes, optional)
//!     → trie (one insert per distinct pattern)
//!     → compress, freeze as immutable Router
//!
//! Incoming Request (url or path, method)
//!     → path.rs (strip query/fragment, percent-decode)
//!     → trie.find_all(path)
//!     → filter by method
//!     → smallest declaration index wins
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First declared route wins, regardless of specificity
//! - Method filtering happens here, the trie only knows paths
//! - No match is `None`, not an error

pub mod methods;
pub mod path;
pub mod route;
pub mod router;
pub mod types;

pub use methods::STANDARD_METHODS;
pub use route::{AllowedMethods, Route, RouteMatch, Target};
pub use router::{Router, RouterOptions};
pub use types::RouterError;
