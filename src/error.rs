use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Storage(String),
    #[error("Not found.")]
    NotFound,
    #[error("metadata provider: {0}")]
    Provider(anyhow::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<wreq::Error> for AppError {
    fn from(err: wreq::Error) -> Self {
        Self::Provider(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingParameter(_) | AppError::Validation(_) | AppError::Storage(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Provider(_) | AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "string": "internal server error" })),
                )
                    .into_response();
            },
        };
        (status, Json(json!({ "string": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Converts a failed write into the text reported to the caller.
///
/// Width violations come back from SQLite as `CHECK constraint failed:
/// length(col) <= N`; those are reported in the same wording a varchar column
/// overflow would produce. Anything else keeps the driver's message.
pub fn storage_error_text(err: &DbErr) -> String {
    let message = err.to_string();
    let Some((_, check)) = message.split_once("CHECK constraint failed:") else {
        return message.trim().to_string();
    };
    let width = check
        .rsplit_once("<=")
        .map(|(_, rest)| {
            rest.trim_start().chars().take_while(char::is_ascii_digit).collect::<String>()
        })
        .and_then(|digits| digits.parse::<u32>().ok());
    match width {
        Some(width) => format!("value too long for type character varying({width})"),
        None => message.trim().to_string(),
    }
}
