//! Handler subsystem.
//!
//! # Data Flow
//! ```text
//! DispatchQueue (from the router)
//!     → dispatch.rs (drain in order)
//!     → registry.rs (resolve qualified name → factory → fresh handler)
//!     → Handler::call(action, context, params)
//! ```
//!
//! # Design Decisions
//! - Handlers are a closed set registered by name; no runtime reflection
//! - One handler instance per dispatched match, never pooled
//! - Handlers receive request/response/settings/session through an
//!   explicit context instead of globals

pub mod dispatch;
pub mod registry;

pub use dispatch::Dispatcher;
pub use registry::HandlerRegistry;

use crate::config::Settings;
use crate::error::Error;
use crate::http::{Request, Response};
use crate::storage::Session;

/// Everything a handler gets to work with for one request.
pub struct Context<'a> {
    pub request: &'a Request,
    pub response: &'a mut Response,
    pub settings: &'a Settings,
    pub session: &'a mut Session,
}

/// The controller capability.
///
/// A handler exposes a closed set of named actions; the dispatcher checks
/// membership before invoking, so a route pointing at a missing action is
/// reported as a configuration error rather than a panic.
pub trait Handler: Send {
    /// The action names this handler responds to.
    fn actions(&self) -> &'static [&'static str];

    /// Invoke a named action. `params` are the positional route
    /// parameters in capture order.
    fn call(&mut self, action: &str, cx: &mut Context<'_>, params: &[String]) -> Result<(), Error>;
}
