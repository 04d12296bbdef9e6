use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use todo_rest_api::{
    config::{Config, StorageBackend},
    db::{Database, MemoryStore, SharedStore},
    middleware::{create_middleware_stack, init_tracing},
    routes::create_router,
};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    if let Err(e) = init_tracing(config.environment) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }
    info!("Configuration loaded successfully");

    let store = match build_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize todo storage: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(store).layer(create_middleware_stack(config.request_timeout));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server with graceful shutdown handling
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Connect to the configured backend and make sure the schema exists
async fn build_store(storage: &StorageBackend) -> Result<SharedStore, todo_rest_api::ApiError> {
    match storage {
        StorageBackend::Postgres(database_config) => {
            let database = Database::new(database_config.clone()).await?;
            info!("Database connection established");

            database.migrate().await?;
            Ok(Arc::new(database))
        }
        StorageBackend::Memory => {
            info!("Using in-memory todo storage; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
