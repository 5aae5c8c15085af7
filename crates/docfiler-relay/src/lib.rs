//! The relay service: one multipart upload endpoint that extracts text,
//! forwards it to the generative model, and returns the raw reply.

use std::net::SocketAddr;
use std::sync::Arc;

pub mod handlers;
pub mod prompt;
pub mod state;
pub mod upload;

pub use state::AppState;

/// Default port the standalone relay listens on.
pub const DEFAULT_PORT: u16 = 8000;

/// Build the application router. Uploads are capped well above the prompt
/// truncation limit; the bound exists to stop runaway request bodies.
pub fn router(state: Arc<AppState>) -> axum::Router {
    let body_limit = axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024);

    axum::Router::new()
        .route("/upload", axum::routing::post(handlers::upload::upload))
        .route("/healthz", axum::routing::get(handlers::healthz))
        .layer(body_limit)
        .with_state(state)
}

/// Bind the relay listener. Once this returns, the socket is accepting
/// connections — returning the bound address is the readiness signal clients
/// wait on before issuing their first request.
pub async fn bind(addr: SocketAddr) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await
}

/// Serve requests on an already-bound listener until the task is dropped or
/// the process exits.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
