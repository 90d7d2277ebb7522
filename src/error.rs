use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("No webhook URL configured for this path.")]
    NoWebhookConfigured,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Delivery(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidPayload(_) | Error::MissingField(_) => StatusCode::BAD_REQUEST,
            Error::NoWebhookConfigured => StatusCode::NOT_FOUND,
            Error::Delivery(_) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
