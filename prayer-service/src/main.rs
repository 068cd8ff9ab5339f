use common::tracing::{LogFormat, init_tracing};
use prayer_service::clock::SystemClock;
use prayer_service::config::Config;
use prayer_service::{build_state, create_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing(LogFormat::from_setting(&config.log_format));

    if config.user_agent.is_none() {
        warn!("USER_AGENT is not set, geocoding requests will fail");
    }
    if config.islamic_api_key.is_none() {
        warn!("ISLAMIC_API_KEY is not set, prayer-time requests will fail");
    }
    info!(
        geocode_ttl_ms = config.geocode_cache_ttl_ms,
        prayer_ttl_ms = config.prayer_cache_ttl_ms,
        "Cache configuration loaded"
    );

    let state = build_state(&config, Arc::new(SystemClock))?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Prayer service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Prayer service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    warn!("Shutting down gracefully...");
}
