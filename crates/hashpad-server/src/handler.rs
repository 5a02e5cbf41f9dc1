use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use hashpad_doc::{serialize, Element, Node};
use hashpad_router::{download_path, extension_for, request_path, resolve, RouteOutcome};
use hashpad_store::{BlobMetadata, MARKDOWN_CONTENT_TYPE, OCTET_STREAM};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub const BLOB_NAME_HEADER: &str = "x-blob-name";
/// Epoch milliseconds, as browsers report `File.lastModified`.
pub const BLOB_LAST_MODIFIED_HEADER: &str = "x-blob-last-modified";
pub const BLOB_RELATIVE_PATH_HEADER: &str = "x-blob-relative-path";

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "hashpad-server",
        "version": env!("CARGO_PKG_VERSION"),
        "default_document": &*state.default_document,
    }))
}

/// Everything not served as a static asset: downloads and editor redirects.
pub async fn route_handler(State(state): State<AppState>, uri: Uri) -> ServerResult<Response> {
    let path = request_path(&uri.to_string(), &state.base_url)?;
    let outcome = resolve(&path, state.store.as_ref(), &state.default_document).await?;
    outcome_response(outcome)
}

fn header_value(value: &str) -> ServerResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ServerError::Internal(format!("header {value:?}: {e}")))
}

fn status(code: u16) -> ServerResult<StatusCode> {
    StatusCode::from_u16(code).map_err(|e| ServerError::Internal(e.to_string()))
}

fn outcome_response(outcome: RouteOutcome) -> ServerResult<Response> {
    match outcome {
        RouteOutcome::Stream {
            status: code,
            content_type,
            content_length,
            body,
        } => Ok((
            status(code)?,
            [
                (CONTENT_TYPE, header_value(&content_type)?),
                (CONTENT_LENGTH, HeaderValue::from(content_length)),
            ],
            body,
        )
            .into_response()),
        RouteOutcome::Redirect {
            status: code,
            location,
        } => Ok((status(code)?, [(LOCATION, header_value(&location)?)]).into_response()),
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutBlobResponse {
    pub hash: String,
    pub url: String,
}

fn optional_header<'a>(headers: &'a HeaderMap, name: &str) -> ServerResult<Option<&'a str>> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ServerError::BadRequest(format!("{name} is not visible ASCII")))
        })
        .transpose()
}

fn blob_metadata(headers: &HeaderMap, size: u64) -> ServerResult<BlobMetadata> {
    let content_type = optional_header(headers, CONTENT_TYPE.as_str())?
        .filter(|value| !value.is_empty())
        .unwrap_or(OCTET_STREAM);
    let mut metadata = BlobMetadata::new(content_type).with_size(size);
    if let Some(name) = optional_header(headers, BLOB_NAME_HEADER)? {
        metadata = metadata.with_name(name);
    }
    if let Some(path) = optional_header(headers, BLOB_RELATIVE_PATH_HEADER)? {
        metadata = metadata.with_relative_path(path);
    }
    if let Some(raw) = optional_header(headers, BLOB_LAST_MODIFIED_HEADER)? {
        let at = raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| {
                ServerError::BadRequest(format!("{BLOB_LAST_MODIFIED_HEADER} must be epoch milliseconds"))
            })?;
        metadata = metadata.with_last_modified(at);
    }
    Ok(metadata)
}

/// `POST /api/blobs`: store the request body as-is.
pub async fn put_blob_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<PutBlobResponse>)> {
    let metadata = blob_metadata(&headers, body.len() as u64)?;
    let ext = extension_for(&metadata.content_type);
    let len = body.len();
    let hash = state.store.put(body, metadata).await?;
    info!(hash = %hash.short_hex(), len, "blob stored");
    Ok((
        StatusCode::CREATED,
        Json(PutBlobResponse {
            hash: hash.to_hex(),
            url: download_path(&hash, ext),
        }),
    ))
}

/// `POST /api/render`: Markdown in, HTML fragment out.
pub async fn render_handler(State(state): State<AppState>, markdown: String) -> Html<String> {
    debug!(len = markdown.len(), "render request");
    Html(state.renderer.render_html(&markdown))
}

/// `POST /api/serialize`: JSON node tree in, canonical Markdown out.
///
/// A bare node that is not an element is treated as the only child of `body`.
pub async fn serialize_handler(Json(node): Json<Node>) -> ServerResult<impl IntoResponse> {
    let root = match node {
        Node::Element(element) => element,
        other => Element::new("body").with_child(other),
    };
    let markdown = serialize(&root)?;
    Ok(([(CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], markdown))
}
