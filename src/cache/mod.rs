//! File cache subsystem.
//!
//! # Design Decisions
//! - Entries are plain files under one configured directory
//! - Content addressing via digest keeps stale generations detectable
//! - Freshness is mtime-based; a TTL of zero disables reuse

pub mod file;

pub use file::{CacheError, FileCache};
