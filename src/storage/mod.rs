//! Session-backed storage subsystem.
//!
//! # Data Flow
//! ```text
//! Request cookie (session id)
//!     → session.rs (SessionStore::open: fingerprint check, expiry purge)
//!     → handlers read/write values through the Context
//!     → SessionStore::persist + Set-Cookie on the way out
//!
//! flash.rs layers one-request messages on top of a session.
//! ```
//!
//! # Design Decisions
//! - The store is owned by the App and passed explicitly; no global state
//! - Sessions are bound to a client fingerprint; a mismatch silently
//!   starts a fresh session instead of serving someone else's data
//! - Expired sessions are purged lazily on open

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashMode, StorageError};
pub use session::{Session, SessionStore};
