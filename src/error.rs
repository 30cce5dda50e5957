use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Select 1, 2 or 3 locations")]
    InvalidCount,

    #[error("Locations must be unique")]
    DuplicateLocation,

    #[error("Points must be {0}, each used exactly once")]
    InvalidPointAssignment(&'static str),

    #[error("Unknown location: {0}")]
    UnknownLocation(i32),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("access denied")]
    AccessDenied,

    #[error("No active event")]
    NoActiveEvent,

    #[error("{0}")]
    StorageWriteFailure(String),

    #[error("{0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// 是否为客户端提交内容导致的校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCount
                | AppError::DuplicateLocation
                | AppError::InvalidPointAssignment(_)
                | AppError::UnknownLocation(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCount
            | AppError::DuplicateLocation
            | AppError::InvalidPointAssignment(_)
            | AppError::UnknownLocation(_)
            | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AccessDenied => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        match self {
            e if e.is_validation() => log::warn!("Rejected submission: {message}"),
            AppError::MalformedRequest(_) => log::warn!("{message}"),
            AppError::AccessDenied => log::warn!("Results access denied"),
            AppError::ConfigError(_) => log::error!("{message}"),
            _ => log::error!("Request failed: {message}"),
        }

        HttpResponse::build(self.status_code()).json(json!({
            "ok": false,
            "error": message
        }))
    }
}
