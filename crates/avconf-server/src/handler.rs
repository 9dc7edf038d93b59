use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use tracing::info;

use crate::api::{
    HealthResponse, InfoResponse, MasterResponse, MergeRequest, MergeResponse, PreviewFileResponse,
    PreviewQuery, SaveRequest, ScanResponse, SetRootRequest, StatusResponse,
};
use crate::error::{ServerError, ServerResult};
use crate::state::SharedState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<SharedState>) -> Json<InfoResponse> {
    let session = state.session();
    Json(InfoResponse {
        name: "avconf".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        master: session.master_store().location(),
        fragments_subdir: session.config().fragments_subdir.clone(),
        root: session.root().map(ToOwned::to_owned),
    })
}

pub async fn set_root_handler(
    State(state): State<SharedState>,
    payload: Result<Json<SetRootRequest>, JsonRejection>,
) -> ServerResult<Json<StatusResponse>> {
    let Json(request) = payload?;
    if request.root_path.trim().is_empty() {
        return Err(ServerError::BadRequest("no root path provided".into()));
    }
    state.session_mut().set_root(&request.root_path)?;
    Ok(Json(StatusResponse::ok("Root directory set successfully")))
}

pub async fn scan_handler(State(state): State<SharedState>) -> ServerResult<Json<ScanResponse>> {
    let files = state.session().scan()?;
    Ok(Json(ScanResponse { files }))
}

pub async fn preview_file_handler(
    State(state): State<SharedState>,
    Query(query): Query<PreviewQuery>,
) -> ServerResult<Json<PreviewFileResponse>> {
    let path = query
        .path
        .ok_or_else(|| ServerError::BadRequest("no file path provided".into()))?;
    let fragment = state.session().load_fragment(&path)?;
    Ok(Json(PreviewFileResponse {
        path: fragment.source,
        content: fragment.content,
    }))
}

/// Merge preview: computes the merged mapping and conflicts without saving.
pub async fn merge_handler(
    State(state): State<SharedState>,
    payload: Result<Json<MergeRequest>, JsonRejection>,
) -> ServerResult<Json<MergeResponse>> {
    let Json(request) = payload?;
    if request.file_paths.is_empty() {
        return Err(ServerError::BadRequest("no files selected".into()));
    }
    let preview = state.session().merge_preview(&request.file_paths)?;
    Ok(Json(MergeResponse {
        conflicts: preview.outcome.conflict_messages(),
        content: preview.outcome.merged,
        conflict_details: preview.outcome.conflicts,
        changes: preview.changes,
        fragments: preview.fragments,
    }))
}

/// Replace the master configuration with the submitted mapping.
pub async fn save_handler(
    State(state): State<SharedState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> ServerResult<Json<StatusResponse>> {
    let Json(request) = payload?;
    let session = state.session();
    session.save_master(&request.content)?;
    info!(
        master = %session.master_store().location(),
        keys = request.content.len(),
        "master configuration replaced"
    );
    Ok(Json(StatusResponse::ok("Configuration saved successfully")))
}

pub async fn master_handler(State(state): State<SharedState>) -> ServerResult<Json<MasterResponse>> {
    let config = state.session().load_master()?;
    Ok(Json(MasterResponse { config }))
}
