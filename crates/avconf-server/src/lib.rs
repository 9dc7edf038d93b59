//! HTTP server for avconf.
//!
//! Exposes the session over a small JSON API: choose a root, list fragment
//! files, preview one, preview a merge against the master, and replace the
//! master. Merge previews never persist anything; saving is a separate call
//! the client makes after the user has seen the conflicts.

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, endpoints};
pub use server::AvconfServer;
pub use state::{AppState, SharedState};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use avconf_store::{InMemoryMasterStore, Session, StoreConfig, YamlCodec};
    use avconf_types::ConfigMap;

    fn app_with_master(master: Value) -> Router {
        let master: ConfigMap = serde_json::from_value(master).unwrap();
        let session = Session::with_parts(
            StoreConfig::default(),
            Arc::new(YamlCodec),
            Arc::new(InMemoryMasterStore::with_config(master)),
        );
        build_router(AppState::new(session))
    }

    fn write_fragment(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join("params/nodes").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app_with_master(json!({}));
        let (status, body) = send(&app, get(endpoints::HEALTH)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = app_with_master(json!({}));
        let (status, body) = send(&app, get(endpoints::INFO)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "avconf");
        assert_eq!(body["master"], "<memory>");
        assert!(body["root"].is_null());
    }

    #[tokio::test]
    async fn set_root_then_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_fragment(dir.path(), "lidar/front.yaml", "lidar: {rate: 10}\n");
        write_fragment(dir.path(), "camera.yaml", "camera: {fps: 30}\n");
        let app = app_with_master(json!({}));

        let (status, body) = send(
            &app,
            post(endpoints::SET_ROOT, json!({"root_path": dir.path()})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(&app, get(endpoints::SCAN_FILES)).await;
        assert_eq!(status, StatusCode::OK);
        let files = body["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["relative_path"], "camera.yaml");
        assert_eq!(files[1]["name"], "front.yaml");
    }

    #[tokio::test]
    async fn set_root_rejects_invalid_path() {
        let app = app_with_master(json!({}));
        let (status, body) = send(
            &app,
            post(endpoints::SET_ROOT, json!({"root_path": "/definitely/not/here"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, post(endpoints::SET_ROOT, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scan_without_root_conflicts() {
        let app = app_with_master(json!({}));
        let (status, body) = send(&app, get(endpoints::SCAN_FILES)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "no root directory has been set");
    }

    #[tokio::test]
    async fn preview_file_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fragment(dir.path(), "a.yaml", "node:\n  rate: 5\n");
        let app = app_with_master(json!({}));

        let uri = format!("{}?path={}", endpoints::PREVIEW_FILE, path.display());
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], json!({"node": {"rate": 5}}));

        let (status, body) = send(&app, get(endpoints::PREVIEW_FILE)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "no file path provided");
    }

    #[tokio::test]
    async fn preview_missing_file_is_not_found() {
        let app = app_with_master(json!({}));
        let uri = format!("{}?path=/nope/missing.yaml", endpoints::PREVIEW_FILE);
        let (status, _) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn merge_reports_conflicts_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_fragment(dir.path(), "a.yaml", "node:\n  rate: 20\n  name: a\n");
        let b = write_fragment(dir.path(), "b.yaml", "other: true\n");
        let app = app_with_master(json!({"node": {"rate": 10}}));

        let (status, body) = send(
            &app,
            post(endpoints::MERGE_FILES, json!({"file_paths": [b, a]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["content"],
            json!({"node": {"rate": 20, "name": "a"}, "other": true})
        );
        assert_eq!(body["conflicts"], json!(["a.yaml: node.rate"]));
        assert_eq!(body["conflict_details"][0]["existing"], 10);
        assert_eq!(body["changes"]["changes"].as_array().unwrap().len(), 3);

        let (_, body) = send(&app, get(endpoints::MASTER_CONFIG)).await;
        assert_eq!(body["config"], json!({"node": {"rate": 10}}));
    }

    #[tokio::test]
    async fn merge_requires_selection() {
        let app = app_with_master(json!({}));
        let (status, body) = send(&app, post(endpoints::MERGE_FILES, json!({"file_paths": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "no files selected");
    }

    #[tokio::test]
    async fn merge_rejects_malformed_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_fragment(dir.path(), "bad.yaml", "- 1\n- 2\n");
        let app = app_with_master(json!({}));
        let (status, body) = send(&app, post(endpoints::MERGE_FILES, json!({"file_paths": [bad]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn save_replaces_master() {
        let app = app_with_master(json!({"old": 1}));
        let (status, body) = send(
            &app,
            post(endpoints::SAVE_MERGED, json!({"content": {"new": {"key": "v"}}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = send(&app, get(endpoints::MASTER_CONFIG)).await;
        assert_eq!(body["config"], json!({"new": {"key": "v"}}));
    }

    #[tokio::test]
    async fn save_rejects_non_mapping_content() {
        let app = app_with_master(json!({"old": 1}));
        let (status, body) = send(&app, post(endpoints::SAVE_MERGED, json!({"content": [1, 2]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (_, body) = send(&app, get(endpoints::MASTER_CONFIG)).await;
        assert_eq!(body["config"], json!({"old": 1}));
    }
}
