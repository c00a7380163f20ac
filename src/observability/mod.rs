//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging only; every event carries its context as fields
//! - Request ids flow through all subsystems via the transport middleware
//! - Not-found outcomes log at info; configuration errors at error

pub mod logging;
