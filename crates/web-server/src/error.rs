use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: DbError,
    },
    #[error("Failed to build {resource}: {source}")]
    Analytics {
        resource: &'static str,
        #[source]
        source: AnalyticsError,
    },
    #[error("{0}")]
    InvalidQuery(#[from] CoreError),
}

impl AppError {
    /// Wraps a repository failure for the named resource, for use with `map_err`.
    pub fn fetch(resource: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Fetch { resource, source }
    }

    pub fn analytics(resource: &'static str) -> impl FnOnce(AnalyticsError) -> Self {
        move |source| Self::Analytics { resource, source }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Fetch { resource, source } => {
                tracing::error!(error = ?source, resource, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to fetch {resource}"))
            }
            AppError::Analytics { resource, source } => {
                tracing::error!(error = ?source, resource, "Analytics error.");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to fetch {resource}"))
            }
            AppError::InvalidQuery(err) => {
                tracing::warn!(error = %err, "Rejected query parameters.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
