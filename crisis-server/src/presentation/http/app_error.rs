use crate::data::disaster_source::UpstreamError;
use crate::domain::error::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<&'static str>,
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let plain = |status: StatusCode, msg: String| {
            (
                status,
                ErrorBody {
                    error: msg,
                    field: None,
                },
            )
        };

        match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: (*message).to_string(),
                        field: Some(*field),
                    },
                ),
                DomainError::AlreadyExists(_) => plain(StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => plain(StatusCode::UNAUTHORIZED, err.to_string()),
                DomainError::NotFound(_) => plain(StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Forbidden => plain(StatusCode::FORBIDDEN, err.to_string()),
                DomainError::Unexpected(detail) => {
                    error!(error = %detail, "unexpected domain error");
                    plain(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(err) => plain(StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Upstream(err) => {
                warn!(error = %err, "upstream request failed");
                plain(
                    StatusCode::BAD_GATEWAY,
                    "disaster data provider unavailable".to_string(),
                )
            }
            AppError::Unauthorized => {
                plain(StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }
            AppError::Internal(err) => {
                error!(error = %err, "internal error");
                plain(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
