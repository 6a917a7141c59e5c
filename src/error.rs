use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::{json_response, ErrorResponse};

/// Custom error type for API endpoints
///
/// Every variant renders as `{"success": false, "error": "..."}` with the
/// matching status code, so no failure reaches the transport as a bare error.
/// Messages are the ones the public site displays, in French.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or ill-shaped field in a request body
    #[error("{0}")]
    Validation(String),
    /// No page carries the requested id
    #[error("Page non trouvée")]
    PageNotFound(String),
    /// No route matches the method and path
    #[error("Route non trouvée")]
    RouteNotFound,
    /// A page with the same id already exists
    #[error("{0}")]
    Conflict(String),
    /// Missing or wrong `X-API-Key`
    #[error("Non autorisé - Clé API invalide")]
    Unauthorized,
    /// Key-value store failure
    #[error("{0}")]
    Store(#[from] anyhow::Error),
    /// Malformed JSON body or record
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PageNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::PageNotFound(id) => tracing::info!("Page not found with id: {}", id),
            ApiError::Store(err) => tracing::error!("Store error: {:#}", err),
            ApiError::Json(err) => tracing::error!("JSON error: {}", err),
            _ => tracing::debug!("Request rejected ({}): {}", status, self),
        }

        // The raw fault text is surfaced to the caller, 500s included.
        json_response(status, ErrorResponse::new(self.to_string()))
    }
}
