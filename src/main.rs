//! Listening Coach · assessment backend binary
//!
//! - Axum HTTP API (profiles, results, statistics, recommendations, weaknesses)
//! - Optional OpenAI integration for sentence translation
//! - Static SPA fallback (./static/index.html by default)
//!
//! Important env variables:
//!   PORT                    : u16 (default 3000)
//!   ASSESSMENT_CONFIG_PATH  : path to TOML config (limits, cache age, prompts)
//!   OPENAI_API_KEY          : enables translation if present
//!   OPENAI_BASE_URL         : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL       : default "gpt-4o-mini"
//!   LOG_LEVEL               : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT              : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use listening_coach::routes::build_router;
use listening_coach::state::AppState;
use listening_coach::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new());
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "listening_coach", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "listening_coach", error = %e, "Failed to listen for shutdown signal");
  }
  info!(target: "listening_coach", "Shutdown signal received");
}
