use anyhow::{Context, Result};
use axum::{http::header, routing::get};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use module_admin::config::{validate_settings, Settings};
use module_admin::metrics::{self as app_metrics, Metrics};
use module_admin::{create_router, AppState, JsonFileStore, ModuleStore};

#[derive(Parser)]
#[command(about = "Web page for installing and removing processing modules")]
struct Args {
    /// Settings file name, without extension
    #[arg(long, default_value = "config")]
    config: String,

    /// Overrides `store.path` from the settings
    #[arg(long)]
    store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = Settings::new(&args.config).context("failed to load configuration")?;
    if let Some(path) = args.store {
        settings.store.path = path;
    }
    validate_settings(&settings)?;

    info!("Loaded settings: {:?}", settings);
    if settings.auth.admin_password.is_empty() {
        info!("No admin password configured, the module page is read-only");
    }

    let metrics = Metrics::new(app_metrics::setup_metrics_recorder()?);
    info!("Prometheus metrics initialized");

    let store: Arc<dyn ModuleStore> = Arc::new(JsonFileStore::open(&settings.store.path).await?);
    let state = AppState::new(store, settings.auth.clone());

    let app = create_router(state).route(
        "/metrics",
        get(move || async move {
            (
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                metrics.render(),
            )
        }),
    );

    let host = settings
        .application
        .host
        .parse::<std::net::IpAddr>()
        .context("invalid application.host")?;
    let addr = SocketAddr::from((host, settings.application.port));

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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

    info!("shutdown signal received");
}
