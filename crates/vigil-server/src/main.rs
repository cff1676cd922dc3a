//! vigil service binary.
//!
//! - Config: `VIGIL_CONFIG` (optional YAML), then `APP_VERSION` / `ENVIRONMENT` / `PORT`
//! - Logs: `RUST_LOG` (default `info`)
//! - Graceful shutdown on ctrl-c / SIGTERM; `/ready` reports draining first

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use vigil_core::error::{Result, VigilError};
use vigil_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "vigil-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("VIGIL_CONFIG").ok();
    let cfg = config::load(path.as_deref(), |k| std::env::var(k).ok())?;
    let listen = cfg.service.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(
        %listen,
        version = %state.cfg().service.app_version,
        environment = %state.cfg().service.environment,
        "vigil-server starting"
    );
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| VigilError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| VigilError::Internal(format!("server failed: {e}")))?;

    tracing::info!("vigil-server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.set_draining();
    tracing::info!("shutdown signal received, draining");
}
