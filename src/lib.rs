//! Gantry, a small MVC-style web micro-framework.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────┐
//!                    │                      GANTRY                        │
//!                    │                                                    │
//!   HTTP Request     │  ┌─────────┐    ┌──────────┐    ┌──────────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│ routing  │───▶│   handler    │  │
//!                    │  │ server  │    │  engine  │    │  dispatcher  │  │
//!                    │  └─────────┘    └────┬─────┘    └──────┬───────┘  │
//!                    │                      │                 │          │
//!                    │                 DispatchQueue     Handler::call   │
//!                    │                      │                 │          │
//!   HTTP Response    │  ┌─────────┐    ┌────▼─────────────────▼───────┐  │
//!   ◀────────────────┼──│response │◀───│            app               │  │
//!                    │  │ context │    │  (session, error rendering)  │  │
//!                    │  └─────────┘    └──────────────────────────────┘  │
//!                    │                                                    │
//!                    │  ┌──────────────────────────────────────────────┐ │
//!                    │  │            Cross-Cutting Concerns             │ │
//!                    │  │  ┌────────┐ ┌─────────┐ ┌────────┐ ┌───────┐ │ │
//!                    │  │  │ config │ │ storage │ │security│ │ cache │ │ │
//!                    │  │  └────────┘ └─────────┘ └────────┘ └───────┘ │ │
//!                    │  │  ┌──────────────────────────────────────┐    │ │
//!                    │  │  │            observability              │    │ │
//!                    │  │  └──────────────────────────────────────┘    │ │
//!                    │  └──────────────────────────────────────────────┘ │
//!                    └───────────────────────────────────────────────────┘
//! ```
//!
//! Routes are registered once at startup against an explicit [`Router`];
//! every incoming request is matched in registration order (first
//! terminal match wins, hooks accumulate) and the resulting queue is
//! executed against a closed set of registered handlers. There are no
//! process-wide singletons: the [`App`] owns all state and is shared
//! behind an `Arc` by the HTTP front end.

// Core subsystems
pub mod error;
pub mod handler;
pub mod http;
pub mod routing;

// Application wiring
pub mod app;
pub mod config;

// Cross-cutting concerns
pub mod cache;
pub mod observability;
pub mod security;
pub mod storage;

pub use app::App;
pub use config::Settings;
pub use error::Error;
pub use handler::{Context, Handler, HandlerRegistry};
pub use http::{Request, Response};
pub use routing::{Router, Target};
