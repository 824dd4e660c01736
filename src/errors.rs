use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            e @ (DomainError::UnknownProduct(_) | DomainError::PriceChanged { .. }) => {
                AppError::Conflict(e.to_string())
            }
            e @ (DomainError::DuplicateOrderNumber(_) | DomainError::Internal(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(cause) => {
                log::error!("Request failed: {}", cause);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
