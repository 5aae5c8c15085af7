use std::net::SocketAddr;
use std::sync::Arc;

use docfiler_core::Config;
use docfiler_relay::{AppState, DEFAULT_PORT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // The only startup validation: a usable API credential must exist.
    let config = Config::load()?;

    let port = std::env::var("DOCFILER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = Arc::new(AppState::from_config(&config));

    // Loopback only; the relay is a local intermediary, not a public service.
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = docfiler_relay::bind(addr).await?;
    println!("Listening on http://{}", listener.local_addr()?);
    docfiler_relay::serve(listener, state).await?;

    Ok(())
}
