use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use supporter_registry::config::Args;
use supporter_registry::state::AppState;
use supporter_registry::store::{MemoryKv, RestKv, SupporterStore};
use supporter_registry::{SUPPORTERS_PATH, app};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // parse cli arguments
    let args = Args::parse();
    let limits = args.limits();

    let store: Option<Arc<dyn SupporterStore>> = if args.in_memory {
        warn!("Using in-memory store, supporters are lost on restart");
        Some(Arc::new(MemoryKv::new()))
    } else if let Some((url, token)) = args.kv_credentials() {
        info!(url = %url, "Using REST key-value store");
        Some(Arc::new(RestKv::new(reqwest::Client::new(), url, token)?))
    } else {
        warn!("KV_REST_API_URL or KV_REST_API_TOKEN not set, supporters requests will fail");
        None
    };

    let state = Arc::new(AppState::new(store, limits));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, path = SUPPORTERS_PATH, "Supporter registry listening");
    info!(
        rate_limit = limits.rate_limit,
        rate_window_secs = limits.rate_window.as_secs(),
        max_supporters = limits.max_supporters,
        max_name_len = limits.max_name_len,
        "Limits"
    );

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
