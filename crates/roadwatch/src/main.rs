//! Roadwatch: realtime traffic demo server.
//!
//! Serves a dashboard page, answers chat questions through the Gemini API
//! with the current traffic snapshot as context, and pushes randomly-mutated
//! traffic data to connected clients every few seconds over SSE.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use miette::Result;
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use roadwatch_chat::ChatAssistant;
use roadwatch_gemini::{DEFAULT_MODEL, GeminiClient};
use roadwatch_traffic::TrafficStore;
use roadwatch_web::create_router;

/// Roadwatch realtime traffic demo server.
#[derive(Parser)]
#[command(name = "roadwatch")]
struct Args {
    /// HTTP listen address.
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: String,

    /// Gemini API key. A missing key is reported per chat request, not at
    /// startup.
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,

    /// Gemini model identifier.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Seconds between traffic broadcasts.
    #[arg(long, default_value = "5")]
    broadcast_interval: u64,

    /// Directory of extra front-end assets served under /static.
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadwatch=info".into()),
        )
        .init();

    let args = Args::parse();

    if args.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, chat requests will return an error message");
    }

    let store = Arc::new(TrafficStore::new());
    let model = GeminiClient::new(args.gemini_api_key.clone(), args.model.clone());
    let assistant = ChatAssistant::new(Arc::new(model), Arc::clone(&store));

    let (traffic_tx, _) = broadcast::channel(100);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Flip the shutdown channel on ctrl-c
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    // Start the broadcast loop
    tokio::spawn(roadwatch_web::broadcast::run(
        Arc::clone(&store),
        traffic_tx.clone(),
        Duration::from_secs(args.broadcast_interval),
        shutdown_rx.clone(),
    ));

    let router = create_router(assistant, store, traffic_tx, args.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .map_err(|e| miette::miette!("failed to bind {}: {}", args.listen, e))?;

    info!(listen = %args.listen, model = %args.model, "roadwatch started");

    let mut serve_shutdown = shutdown_rx.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = serve_shutdown.changed().await;
        })
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    Ok(())
}
