//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (register / build / resolve events)
//! http (request spans, dispatch outcome)
//! config (load / reload events)
//!     → logging.rs (tracing subscriber, env filter, fmt output)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (`pattern`, `method`, `index`)
//! - Lookups log at trace level only; the hot path stays quiet by default
//! - `RUST_LOG` overrides the configured level

pub mod logging;
