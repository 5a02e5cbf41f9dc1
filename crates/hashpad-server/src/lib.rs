//! HTTP server for Hashpad.
//!
//! Serves the editor's static assets and routes every other path through
//! [`hashpad_router::resolve`]: downloads stream stored blobs, anything else
//! carrying a hash redirects to the editor. A small JSON API lets clients
//! store blobs and use the server-side renderer.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::HashpadServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use bytes::Bytes;
    use tower::util::ServiceExt;

    use hashpad_store::{BlobMetadata, BlobStore, InMemoryBlobStore, MARKDOWN_CONTENT_TYPE};
    use hashpad_types::ContentHash;

    use super::*;
    use crate::handler::PutBlobResponse;

    fn app(public_dir: &Path) -> (Router, Arc<InMemoryBlobStore>) {
        let store = Arc::new(InMemoryBlobStore::new());
        let config = ServerConfig {
            public_dir: public_dir.to_path_buf(),
            ..ServerConfig::default()
        };
        let server = HashpadServer::with_store(config, store.clone());
        (server.router(), store)
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(app: Router, uri: &str, content_type: &str, body: impl Into<Body>) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, content_type)
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    #[test]
    fn shipped_editor_page_binds_every_shortcut() {
        let page = include_str!("../../../public/editor.html");
        for action in hashpad_editor::EditorAction::ALL {
            let case = format!("case \"{}\"", action.key());
            assert!(page.contains(&case), "editor.html has no {case} for {action:?}");
        }
    }

    #[tokio::test]
    async fn health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let response = get(app, "/v1/health").await;
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let response = get(app, "/v1/info").await;
        assert_eq!(response.status(), 200);
        let info: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(info["default_document"], "/homepage.md");
    }

    #[tokio::test]
    async fn root_redirects_to_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let response = get(app, "/").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/editor.html?document=/homepage.md");
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("homepage.md"), "# Welcome\n").unwrap();
        let (app, _) = app(dir.path());
        let response = get(app, "/homepage.md").await;
        assert_eq!(response.status(), 200);
        assert_eq!(&body_bytes(response).await[..], b"# Welcome\n");
    }

    #[tokio::test]
    async fn download_streams_stored_blob() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = app(dir.path());
        let hash = store
            .put(Bytes::from_static(b"# Stored\n"), BlobMetadata::markdown())
            .await
            .unwrap();

        let response = get(app, &format!("/download/{}.md", hash.to_hex())).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[CONTENT_TYPE], MARKDOWN_CONTENT_TYPE);
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
        assert_eq!(&body_bytes(response).await[..], b"# Stored\n");
    }

    #[tokio::test]
    async fn download_miss_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let hash = ContentHash::digest(b"nowhere");
        let response = get(app, &format!("/download/{}.md", hash.to_hex())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn absolute_form_uri_routes_on_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = app(dir.path());
        let hash = store
            .put(Bytes::from_static(b"abs"), BlobMetadata::markdown())
            .await
            .unwrap();
        let uri = format!("http://pad.example/download/{}.md?x=download", hash.to_hex());
        let response = get(app, &uri).await;
        assert_eq!(response.status(), 200);
        assert_eq!(&body_bytes(response).await[..], b"abs");
    }

    #[tokio::test]
    async fn unusable_base_url_rejects_routed_requests() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            public_dir: dir.path().to_path_buf(),
            base_url: "not a url".into(),
            ..ServerConfig::default()
        };
        let app = HashpadServer::with_store(config, Arc::new(InMemoryBlobStore::new())).router();
        let response = get(app, "/").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_link_redirects_to_editor() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let hash = ContentHash::digest(b"short");
        let response = get(app, &format!("/{}", hash.to_base64url())).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            format!("/editor.html?document=/download/{}.md", hash.to_hex())
        );
    }

    #[tokio::test]
    async fn uploaded_blob_is_downloadable() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = app(dir.path());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/blobs")
                    .header(CONTENT_TYPE, "text/plain")
                    .header("X-Blob-Name", "notes.txt")
                    .header("X-Blob-Last-Modified", "1714564800000")
                    .body(Body::from("plain notes"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: PutBlobResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let hash = ContentHash::digest(b"plain notes");
        assert_eq!(created.hash, hash.to_hex());
        assert_eq!(created.url, format!("/download/{}.md", hash.to_hex()));

        let blob = store.get(&hash).await.unwrap().unwrap();
        assert_eq!(blob.metadata.name.as_deref(), Some("notes.txt"));
        assert_eq!(blob.metadata.size, Some(11));
        assert_eq!(
            blob.metadata.last_modified.map(|t| t.timestamp_millis()),
            Some(1_714_564_800_000)
        );

        let response = get(app, &created.url).await;
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(&body_bytes(response).await[..], b"plain notes");
    }

    #[tokio::test]
    async fn html_upload_gets_html_url() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let response = post(app, "/api/blobs", "text/html; charset=utf-8", "<p>x</p>").await;
        let created: PutBlobResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(created.url.ends_with(".html"));
    }

    #[tokio::test]
    async fn bad_last_modified_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = app(dir.path());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/blobs")
                    .header("X-Blob-Last-Modified", "yesterday")
                    .body(Body::from("x"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn render_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let response = post(app, "/api/render", "text/markdown", "# Title").await;
        assert_eq!(response.status(), 200);
        let html = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[tokio::test]
    async fn serialize_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let tree = serde_json::json!({
            "type": "element",
            "tag": "body",
            "children": [
                {"type": "element", "tag": "h2", "children": [{"type": "text", "value": "Title"}]},
                {"type": "element", "tag": "p", "children": [{"type": "text", "value": "body"}]}
            ]
        });
        let response = post(app, "/api/serialize", "application/json", tree.to_string()).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[CONTENT_TYPE], MARKDOWN_CONTENT_TYPE);
        assert_eq!(&body_bytes(response).await[..], b"## Title\n\nbody\n");
    }

    #[tokio::test]
    async fn malformed_tree_is_422() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        let tree = serde_json::json!({
            "type": "element",
            "tag": "body",
            "children": [{"type": "comment"}]
        });
        let response = post(app, "/api/serialize", "application/json", tree.to_string()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
