use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Raised by a repository when the wedding code is already assigned.
    #[error("wedding code {0} is already taken")]
    DuplicateCode(String),

    /// Raised by a repository when the stored version moved since load.
    #[error("party {0} was modified concurrently")]
    VersionConflict(String),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn party_not_found(id: &str) -> Self {
        Self::NotFound(format!("wedding party {id}"))
    }

    pub fn member_not_found(party_id: &str, member_id: u64) -> Self {
        Self::NotFound(format!("member {member_id} of wedding party {party_id}"))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt party record: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backing store could not be reached, e.g. the pool is exhausted
    /// or already shut down.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Storage(StorageError::Unavailable(e.to_string()))
            }
            e => StoreError::Storage(StorageError::Database(e)),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(StorageError::Corrupt(e))
    }
}

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    NotFound,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => error_body(StatusCode::NOT_FOUND, "Not found"),
            AppError::Store(StoreError::Validation(msg)) => {
                error_body(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::Store(e @ StoreError::NotFound(_)) => {
                error_body(StatusCode::NOT_FOUND, e.to_string())
            }
            AppError::Store(
                e @ (StoreError::Conflict(_)
                | StoreError::DuplicateCode(_)
                | StoreError::VersionConflict(_)),
            ) => {
                tracing::warn!("Conflict: {e}");
                error_body(StatusCode::CONFLICT, e.to_string())
            }
            AppError::Store(StoreError::Storage(e)) => {
                tracing::error!("Storage error: {e}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}
