use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use contact_api::recaptcha::{DEFAULT_THRESHOLD, RecaptchaVerifier};
use contact_api::{AppState, AppStateInner};
use contact_db::{DEFAULT_POOL_SIZE, Database};
use contact_records::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "contact_server=debug,contact_api=debug,contact_records=debug,contact_db=info,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let host = std::env::var("CONTACT_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CONTACT_PORT")
        .unwrap_or_else(|_| "3001".into())
        .parse()?;
    let db_path = std::env::var("CONTACT_DB_PATH").unwrap_or_else(|_| "contact.db".into());
    let pool_size: usize = std::env::var("CONTACT_DB_POOL_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POOL_SIZE);
    let recaptcha_secret = std::env::var("RECAPTCHA_SECRET_KEY").ok();
    let recaptcha_threshold: f64 = std::env::var("RECAPTCHA_THRESHOLD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_THRESHOLD);

    if recaptcha_secret.as_deref().is_none_or(str::is_empty) {
        warn!("RECAPTCHA_SECRET_KEY is unset; /api/contact will reject every submission");
    }

    // Init database
    let db = Arc::new(Database::open(&PathBuf::from(&db_path), pool_size)?);
    match db.ping() {
        Ok(()) => info!("Database reachable (ping ok)"),
        Err(e) => error!("Initial database ping failed: {}", e),
    }

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        dispatcher: Dispatcher::new(db),
        recaptcha: RecaptchaVerifier::new(recaptcha_secret, recaptcha_threshold),
    });

    let app = contact_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Contact server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
