use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::SharedState;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HEALTH: &str = "/api/health";
    pub const INFO: &str = "/api/info";
    pub const SET_ROOT: &str = "/api/set_root";
    pub const SCAN_FILES: &str = "/api/scan_files";
    pub const PREVIEW_FILE: &str = "/api/preview_file";
    pub const MERGE_FILES: &str = "/api/merge_files";
    pub const SAVE_MERGED: &str = "/api/save_merged";
    pub const MASTER_CONFIG: &str = "/api/master_config";
}

/// Build the axum router with all avconf endpoints.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::SET_ROOT, post(handler::set_root_handler))
        .route(endpoints::SCAN_FILES, get(handler::scan_handler))
        .route(endpoints::PREVIEW_FILE, get(handler::preview_file_handler))
        .route(endpoints::MERGE_FILES, post(handler::merge_handler))
        .route(endpoints::SAVE_MERGED, post(handler::save_handler))
        .route(endpoints::MASTER_CONFIG, get(handler::master_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
