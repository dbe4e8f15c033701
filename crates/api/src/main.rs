use std::net::SocketAddr;
use std::sync::Arc;

use landtrack_core::store::{MemoryStore, Store};
use landtrack_db::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use landtrack_api::auth::bootstrap;
use landtrack_api::config::ServerConfig;
use landtrack_api::router::build_app_router;
use landtrack_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "landtrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        persistent = config.database_url.is_some(),
        "Loaded server configuration",
    );

    let store = open_store(&config).await;

    if let Some(password) = &config.bootstrap_admin_password {
        match bootstrap::ensure_admin(store.as_ref(), &config.bootstrap_admin_username, password)
            .await
        {
            Ok(Some(user)) => tracing::info!(user_id = user.id, "Bootstrap admin ready"),
            Ok(None) => tracing::debug!("Users exist, skipping bootstrap admin"),
            Err(e) => panic!("Failed to create bootstrap admin: {e}"),
        }
    }

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let app = build_app_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Land office tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store.
async fn open_store(config: &ServerConfig) -> Arc<dyn Store> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
        return Arc::new(MemoryStore::new());
    };

    let pool = landtrack_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    landtrack_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    landtrack_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("PostgreSQL store ready");

    Arc::new(PgStore::new(pool))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
