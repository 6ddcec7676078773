use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::services::ServiceError;
use crate::extractors::RequestId;

pub const INVALID_PRODUCT_ID: &str = "INVALID_PRODUCT_ID";
pub const INVALID_REQUEST_DATA: &str = "INVALID_REQUEST_DATA";
pub const PRODUCT_VALIDATION_ERROR: &str = "PRODUCT_VALIDATION_ERROR";
pub const PRODUCT_NOT_FOUND: &str = "PRODUCT_NOT_FOUND";
pub const PRODUCT_FETCH_ERROR: &str = "PRODUCT_FETCH_ERROR";
pub const PRODUCT_CREATE_ERROR: &str = "PRODUCT_CREATE_ERROR";
pub const PRODUCT_UPDATE_ERROR: &str = "PRODUCT_UPDATE_ERROR";
pub const PRODUCT_DELETE_ERROR: &str = "PRODUCT_DELETE_ERROR";

/// Error body returned by every product route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: &'static str,
    pub error_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

/// Which operation failed; picks the 500 code for store faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Op {
    fn store_failure(self) -> (&'static str, &'static str) {
        match self {
            Op::Fetch => (PRODUCT_FETCH_ERROR, "failed to fetch products"),
            Op::Create => (PRODUCT_CREATE_ERROR, "failed to create product"),
            Op::Update => (PRODUCT_UPDATE_ERROR, "failed to update product"),
            Op::Delete => (PRODUCT_DELETE_ERROR, "failed to delete product"),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub request_id: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        request_id: &RequestId,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            request_id: request_id.0.clone(),
        }
    }

    pub fn invalid_id(request_id: &RequestId) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            INVALID_PRODUCT_ID,
            "invalid product id",
            request_id,
        )
    }

    pub fn invalid_body(request_id: &RequestId) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            INVALID_REQUEST_DATA,
            "invalid request data",
            request_id,
        )
    }

    pub fn validation(message: String, request_id: &RequestId) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            PRODUCT_VALIDATION_ERROR,
            message,
            request_id,
        )
    }

    /// Maps a service failure for `op`. Store faults are logged in full here
    /// and reach the client only as a generic message.
    pub fn from_service(err: ServiceError, op: Op, request_id: &RequestId) -> Self {
        match err {
            ServiceError::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                PRODUCT_NOT_FOUND,
                "product not found",
                request_id,
            ),
            ServiceError::Store(e) => {
                error!(error = %e, op = ?op, request_id = %request_id.0, "product store failure");
                let (code, message) = op.store_failure();
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message, request_id)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error_code: self.code,
            error_message: self.message,
            request_id: self.request_id,
        };
        (self.status, Json(body)).into_response()
    }
}
