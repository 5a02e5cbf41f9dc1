use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use hashpad_doc::DocError;
use hashpad_router::RouteError;
use hashpad_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Doc(#[from] DocError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Route(RouteError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Route(RouteError::InvalidHash(_) | RouteError::InvalidUri { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Doc(DocError::MalformedNode { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
