//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Form render:
//!     → token.rs (generate, store in session, embed in form)
//! Form submit:
//!     → token.rs (compare submitted value against session)
//!     → handler decides: mismatch ⇒ reject the request
//! ```
//!
//! # Design Decisions
//! - Tokens are named, so independent forms cannot satisfy each other
//! - Token state lives in the session; no extra storage
//! - No trust in client input

pub mod token;

pub use token::CsrfToken;
