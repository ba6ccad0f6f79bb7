use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("not found")]
    NotFound,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
    /// Messages per request field; absent for non-field errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Domain(err) => match err.field_errors() {
                Some(fields) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "validation failed".to_string(),
                        fields: Some(fields.into_map()),
                    },
                ),
                None => match err {
                    DomainError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, ErrorBody::message("not found"))
                    }
                    other => {
                        error!(error = %other, "request failed");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorBody::message("internal error"),
                        )
                    }
                },
            },
            AppError::Json(rejection) => {
                let status = match &rejection {
                    JsonRejection::MissingJsonContentType(_) | JsonRejection::BytesRejection(_) => {
                        rejection.status()
                    }
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, ErrorBody::message(rejection.body_text()))
            }
            AppError::Query(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::message(rejection.body_text()),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::message("not found")),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::AppError;
    use crate::domain::error::{DomainError, FieldErrors};

    #[test]
    fn field_errors_map_to_bad_request() {
        let err = AppError::from(DomainError::Validation(FieldErrors::single("title", "bad")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(DomainError::AlreadyExists {
            field: "email",
            message: "taken",
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        let err = AppError::from(DomainError::NotFound("post".into()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_errors_are_hidden_behind_500() {
        let err = AppError::from(DomainError::Unexpected("db down".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
