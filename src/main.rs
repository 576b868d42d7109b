use anyhow::{Context, Result};
use axum::serve;
use orkut_auth::core::config::Config;
use orkut_auth::core::routes::build_router;
use orkut_auth::core::startup::build_registry;
use orkut_auth::core::state::AppState;
use orkut_auth::core::tracing_init::init_tracing;
use orkut_auth::stores::token_store::TokenStore;
use orkut_auth::utils::time::current_timestamp;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'. \
            Copy config.example.toml to config.toml and adjust the values.",
            config_path.display()
        ))?;

    init_tracing(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        public_url = %config.server.public_url,
        num_threads = config.server.num_threads,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Auth service starting"
    );

    let registry = build_registry(&config)?;
    let state = Arc::new(AppState::new(config.clone(), registry));

    spawn_cleanup_task(
        Arc::clone(&state.token_store),
        config.session.cleanup_interval,
        config.session.pending_token_ttl,
    );

    info!(
        backends = ?state.registry.enabled_names(),
        cleanup_interval_seconds = config.session.cleanup_interval,
        pending_token_ttl_seconds = config.session.pending_token_ttl,
        "Auth service startup complete"
    );

    let app = build_router(Arc::clone(&state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "TCP listener bound successfully");

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down gracefully");

    Ok(())
}

/// Periodically drop request tokens whose logins were never completed
fn spawn_cleanup_task(token_store: Arc<TokenStore>, cleanup_interval: u64, ttl: i64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(cleanup_interval));

        loop {
            interval.tick().await;

            let removed = token_store.cleanup_expired(ttl, current_timestamp());

            if removed > 0 {
                info!(
                    removed_tokens = removed,
                    pending_tokens = token_store.len(),
                    "Expired pending tokens removed"
                );
            } else {
                debug!("Pending token cleanup completed, nothing expired");
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
