//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (verb, path)
//!     → router.rs (walk route table in registration order)
//!     → pattern.rs (exact fast path, else alias substitution + regex)
//!     → Return: DispatchQueue of hook matches + one terminal match,
//!       or NotFound
//! ```
//!
//! # Design Decisions
//! - Route table is built during startup registration and immutable after
//! - Exact/static patterns never touch the regex engine
//! - Deterministic: same (table, verb, path) always yields the same queue
//! - First match wins; hooks accumulate ahead of the terminal match

pub mod alias;
pub mod namespace;
pub mod pattern;
pub mod route;
pub mod router;

pub use alias::AliasTable;
pub use namespace::NamespaceStack;
pub use route::{Callable, DispatchQueue, MatchResult, Target};
pub use router::Router;
