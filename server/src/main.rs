use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_server::{Config, TodoStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration error");
            std::process::exit(1);
        }
    };

    let store = match TodoStore::open(&config.database_path) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!(%error, path = %config.database_path.display(), "DB Error");
            std::process::exit(1);
        }
    };

    let addr = config.addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("Server Running at http://{addr}/");

    if let Err(error) = todo_server::run(listener, store.clone(), shutdown_signal()).await {
        tracing::error!(%error, "server error");
        std::process::exit(1);
    }

    if let Err(error) = store.close() {
        tracing::warn!(%error, "storage handle not released cleanly");
    }
    tracing::info!("shut down");
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
