use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned to the caller whenever an internal error is swallowed.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error occur while processing your request";

/// Success envelope wrapping every payload.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: u16,
    pub successful: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            status: StatusCode::OK.as_u16(),
            successful: true,
            data,
        })
    }
}

/// Error envelope; validation failures carry one message per field.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub successful: bool,
    #[serde(rename = "ErrorMessages")]
    pub error_messages: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, messages) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, vec![msg]),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![msg]),
            ApiError::Validation(msgs) => (StatusCode::BAD_REQUEST, msgs),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, vec![msg]),
            // Internal faults are reported as a generic BadRequest, never 5xx.
            ApiError::Internal(err) => {
                error!(error = %err, "unhandled error");
                (StatusCode::BAD_REQUEST, vec![DEFAULT_ERROR_MESSAGE.to_string()])
            }
        };
        let body = ErrorResponse {
            status: status.as_u16(),
            successful: false,
            error_messages: messages,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let Json(body) = DataResponse::ok("payload");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["successful"], true);
        assert_eq!(json["data"], "payload");
    }

    #[test]
    fn error_envelope_shape() {
        let body = ErrorResponse {
            status: 400,
            successful: false,
            error_messages: vec!["first".into(), "second".into()],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["successful"], false);
        assert_eq!(json["ErrorMessages"][0], "first");
        assert_eq!(json["ErrorMessages"][1], "second");
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound("User x not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_surface_as_bad_request() {
        let res = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_keeps_every_message() {
        let res = ApiError::Validation(vec!["a".into(), "b".into()]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
