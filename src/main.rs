//! 产品目录服务入口

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use product_catalog::{
    core::{
        session::MemorySessionStore,
        state::{AppState, Repositories, SessionState},
    },
    infrastructure::{
        config::{load_config, StorageBackend},
        database::DatabaseManager,
        logger::Logger,
    },
    router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    Logger::init(&config.logging);

    info!("Starting product catalog server...");

    // 连接池在进程内只创建一次，关闭时显式释放
    let database = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database: {}", config.redacted_database_url());
            let database = DatabaseManager::connect(&config.database).await?;
            if config.database.init_schema {
                database.init_schema().await?;
            }
            Some(database)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on exit");
            None
        }
    };

    let repositories = match &database {
        Some(database) => Repositories::postgres(database.get_pool().clone()),
        None => Repositories::in_memory(),
    };
    let session_store = Arc::new(MemorySessionStore::new(config.session.idle_timeout()));
    let session = SessionState::new(&config.session, session_store);
    let state = AppState::new(repositories, session)?;

    let app = router(state, &config.http.static_dir);

    let listener = TcpListener::bind((config.http.bind_address.as_str(), config.http.port)).await?;
    info!(
        "Create, Read, Update, and Delete (CRUD) server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
