// src/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Prompt is required")]
    PromptRequired,

    #[error("OpenAI API key not configured")]
    ApiKeyMissing,

    #[error("Network error: {0}")]
    Network(String),

    #[error("OpenAI API error: {0}")]
    Upstream(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::PromptRequired | ServiceError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            ServiceError::ApiKeyMissing | ServiceError::Network(_) | ServiceError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The uniform `{"error": ...}` payload.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

// Allow Actix to convert our custom error into an HTTP response
impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        ServiceError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .json(self.body())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
