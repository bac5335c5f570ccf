use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    identity::IdentityPolicy,
    store::{JsonUpdateStore, UpdateStore},
};

pub mod board;

/// Everything a handler needs, constructed once at startup and injected.
/// There are no ambient singletons: tests build their own state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UpdateStore>,
    /// Present only for the file backend; carries the backup-sync operation
    /// the trait deliberately does not expose.
    pub json_store: Option<Arc<JsonUpdateStore>>,
    pub identity: Arc<dyn IdentityPolicy>,
    pub app_name: String,
    /// The allow-list as rendered into the post form's name choices.
    pub authorized_posters: Vec<String>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. `/sync-backup` exists only when the
/// file backend is active; the database backend has no backup file.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let mut app = Router::new()
        .route("/", get(board::home))
        .route("/updates", get(board::list_updates))
        .route("/post", get(board::post_form).post(board::post_submit))
        .route("/edit/:id", get(board::edit_form).post(board::edit_submit))
        .route("/delete/:id", post(board::delete_update))
        .route("/health", get(health));

    if state.json_store.is_some() {
        app = app.route("/sync-backup", get(board::sync_backup));
    }

    app.with_state(state).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
