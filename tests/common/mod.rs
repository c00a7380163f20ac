//! Shared utilities for integration testing.

use std::net::SocketAddr;

use gantry::App;

/// Bind an ephemeral port and serve the app in the background.
/// Returns the bound address once the listener is accepting.
pub async fn spawn_app(app: App) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        let _ = app.serve(listener).await;
    });

    addr
}

/// A reqwest client that never reuses pooled connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .expect("build test client")
}
