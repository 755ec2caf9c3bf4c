use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use facegate_cloud::cloudinary::CloudinaryClient;
use facegate_cloud::face_engine::HttpFaceEngine;
use facegate_cloud::fetch::ReferenceImageFetcher;
use facegate_core::employee::EmployeeStore;
use facegate_core::storage::ObjectStorage;
use facegate_db::store::PgEmployeeStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use facegate_api::config::ServerConfig;
use facegate_api::router::build_app_router;
use facegate_api::state::AppState;

#[tokio::main]
async fn main() {
    // Hosted deployments inject the environment directly.
    if std::env::var_os("VERCEL").is_none() {
        dotenvy::dotenv().ok();
    }

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "facegate_api=debug,facegate_cloud=debug,facegate_db=debug,\
                 facegate_core=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage_configured = config.cloudinary.is_some(),
        db_configured = config.database_url.is_some(),
        face_engine = %config.face_engine_url,
        "Loaded server configuration"
    );

    let outbound_timeout = Duration::from_secs(config.outbound_timeout_secs);
    let http = facegate_cloud::build_http_client(outbound_timeout)
        .expect("Failed to build reqwest HTTP client");

    // --- Collaborators ---
    let storage = config.cloudinary.clone().map(|cloudinary| {
        Arc::new(CloudinaryClient::with_client(http.clone(), cloudinary)) as Arc<dyn ObjectStorage>
    });

    let employees = connect_employee_store(&config, outbound_timeout).await;

    let face_engine = Arc::new(HttpFaceEngine::with_client(
        http.clone(),
        config.face_engine_url.clone(),
    ));

    // --- App state ---
    let state = AppState {
        storage,
        employees,
        face_engine,
        reference_images: ReferenceImageFetcher::with_client(http),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Connect to the employee database if one is configured.
///
/// An unreachable database does not stop startup: a lazily connecting pool
/// is used instead and lookups fail until it comes back.
async fn connect_employee_store(
    config: &ServerConfig,
    acquire_timeout: Duration,
) -> Option<Arc<dyn EmployeeStore>> {
    let database_url = config.database_url.as_deref()?;

    let pool = match facegate_db::create_pool(database_url, acquire_timeout).await {
        Ok(pool) => {
            tracing::info!("Database connection successful");
            pool
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            match facegate_db::create_lazy_pool(database_url, acquire_timeout) {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!(error = %e, "Invalid DATABASE_URL, employee lookups disabled");
                    return None;
                }
            }
        }
    };

    Some(Arc::new(PgEmployeeStore::new(pool)))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
