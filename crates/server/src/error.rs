use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pipegallery::{GalleryError, JumpError, SaveError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidPage(#[from] JumpError),

    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    #[error("Save failed: {0}")]
    Save(#[from] SaveError),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::InvalidPage(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Gallery(_) => StatusCode::BAD_GATEWAY,
            ServerError::Save(SaveError::MissingEndpoint) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Save(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidPage(_) => "INVALID_PAGE",
            ServerError::Gallery(_) => "GALLERY_ERROR",
            ServerError::Save(SaveError::Rejected(_)) => "SAVE_REJECTED",
            ServerError::Save(_) => "SAVE_FAILED",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
