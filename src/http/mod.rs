//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → request.rs (normalize path, detect client, build context)
//!     → [framework routing + dispatch]
//!     → response.rs (status/headers/body → transport response)
//! ```

pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use request::{Environment, Request, RequestBuilder};
pub use request_id::{RequestIdLayer, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
