use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::{AppConfig, StorageBackend};
use service::{
    identity::NameAllowList,
    store::{JsonUpdateStore, OrmUpdateStore, UpdateStore},
};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the app config, falling back to defaults plus env overrides when no
/// config file is present.
fn load_config() -> anyhow::Result<AppConfig> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(_) => {
            let mut cfg = AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Ok(port) = env::var("SERVER_PORT") {
                if let Ok(port) = port.parse::<u16>() {
                    cfg.server.port = port;
                }
            }
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
    }
}

/// Construct the configured store backend. The file backend also hands back
/// the concrete store so `/sync-backup` can reach it.
async fn build_store(
    cfg: &AppConfig,
) -> anyhow::Result<(Arc<dyn UpdateStore>, Option<Arc<JsonUpdateStore>>)> {
    match cfg.storage.backend {
        StorageBackend::File => {
            let store = JsonUpdateStore::new(
                cfg.storage.updates_file.clone(),
                cfg.storage.backup_file.clone(),
                cfg.storage.recover_corrupt,
            )
            .await?;
            info!(file = %cfg.storage.updates_file, "file-backed update store ready");
            Ok((store.clone(), Some(store)))
        }
        StorageBackend::Database => {
            let db = models::db::connect().await?;
            migration::Migrator::up(&db, None).await?;
            info!("table-backed update store ready");
            Ok((Arc::new(OrmUpdateStore::new(db)), None))
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    let (store, json_store) = build_store(&cfg).await?;

    let allow_list = NameAllowList::new(cfg.board.authorized_posters.clone());
    let authorized_posters = allow_list.names().to_vec();
    let state = AppState {
        store,
        json_store,
        identity: Arc::new(allow_list),
        app_name: cfg.board.app_name.clone(),
        authorized_posters,
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, app_name = %cfg.board.app_name, "starting board server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
