//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all route into the framework
//! - Wire up middleware (timeout, tracing, request ID)
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! # Design Decisions
//! - The transport layer stays thin: every request funnels into
//!   `App::handle`, which runs the framework's own routing
//! - Request timeout comes from configuration, not hardcoded
//! - Shutdown on ctrl-c, matching a single-process deployment

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request as AxumRequest,
    response::IntoResponse,
    routing::any,
    Router as AxumRouter,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::app::App;
use crate::http::request::Request;
use crate::http::request_id::RequestIdLayer;

/// HTTP front end feeding requests into an [`App`].
pub struct HttpServer {
    router: AxumRouter,
}

impl HttpServer {
    /// Build the transport router around a fully configured application.
    pub fn new(app: Arc<App>) -> Self {
        let timeout = Duration::from_secs(app.settings().server.request_timeout_secs);
        let router = AxumRouter::new()
            .route("/{*path}", any(dispatch_request))
            .route("/", any(dispatch_request))
            .with_state(app)
            .layer(TimeoutLayer::new(timeout))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Serve until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let service = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, service)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// The single transport handler: build the framework request, run the
/// framework dispatch, convert the framework response.
async fn dispatch_request(
    State(app): State<Arc<App>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: AxumRequest<Body>,
) -> impl IntoResponse {
    let (parts, _body) = request.into_parts();
    let request = Request::from_http(&parts, addr.ip());

    tracing::debug!(
        method = %request.method(),
        path = %request.path(),
        client = %request.client_ip(),
        "handling request"
    );

    app.handle(request).into_axum()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install Ctrl+C handler");
    }
    tracing::info!("shutdown signal received");
}
