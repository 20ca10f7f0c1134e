use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("hashing error: {0}")]
    Hashing(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("malformed token")]
    Malformed,

    #[error("unknown account")]
    UnknownAccount,

    #[error("account ownership mismatch")]
    OwnershipMismatch,

    #[error("bad credentials")]
    BadCredentials,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            _ => StorageError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.into())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Authorization rejections get one uniform body so a caller cannot
        // distinguish a bad token from a nonexistent account.
        let message = if status == StatusCode::FORBIDDEN {
            "permission denied".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            // Login-path credential failures map to 400; every middleware
            // level auth failure maps to 403.
            AppError::Auth(AuthError::BadCredentials) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::FORBIDDEN,
            // Unknown ids/numbers deliberately surface as 400, not 404.
            AppError::NotFound(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::BAD_REQUEST,
            AppError::Hashing(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
