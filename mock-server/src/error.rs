use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures rendered as the API's `{code, message}` error body.
#[derive(Error, Debug)]
pub enum ApiFailure {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("username is already in use")]
    UsernameTaken,

    #[error("deprecated")]
    Gone,
}

impl ApiFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiFailure::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiFailure::NotFound => StatusCode::NOT_FOUND,
            ApiFailure::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiFailure::UsernameTaken => StatusCode::CONFLICT,
            ApiFailure::Gone => StatusCode::GONE,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        status_body(status, &self.to_string()).into_response()
    }
}

/// `{code, message}` body paired with its status.
pub fn status_body(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({
            "code": status.as_u16(),
            "message": message,
        })),
    )
}
