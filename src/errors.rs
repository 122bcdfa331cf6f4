//! Error handling for the API surface.
//!
//! Internal detail (the underlying `DbErr`) is logged via `tracing` and never
//! serialized to the client; responses carry a sanitized message only.
//! Validation errors are produced before any store execution and
//! short-circuit the request.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// 422 - malformed or out-of-range request parameters.
    Validation { message: String },

    /// 500 - store execution failure. The `DbErr` is logged, not exposed.
    Database {
        internal: DbErr,
        endpoint: Option<&'static str>,
    },

    /// 500 - anything else that went wrong server-side.
    Internal {
        message: String,
        endpoint: Option<&'static str>,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            endpoint: None,
        }
    }

    /// Attach the endpoint name for log context. Route handlers call this so
    /// store failures can be traced back to the operation that issued them.
    #[must_use]
    pub fn with_endpoint(mut self, name: &'static str) -> Self {
        match &mut self {
            Self::Database { endpoint, .. } | Self::Internal { endpoint, .. } => {
                *endpoint = Some(name);
            }
            Self::Validation { .. } => {}
        }
        self
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Database { .. } | Self::Internal { .. } => "Internal Server Error".to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, endpoint } => {
                tracing::error!(
                    endpoint = endpoint.unwrap_or("unknown"),
                    error = ?internal,
                    "store execution failed"
                );
            }
            Self::Internal { message, endpoint } => {
                tracing::error!(
                    endpoint = endpoint.unwrap_or("unknown"),
                    details = %message,
                    "internal error"
                );
            }
            Self::Validation { message } => {
                tracing::debug!(error = %message, "request validation failed");
            }
        }
    }
}

/// Sanitized error body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::Database {
            internal: err,
            endpoint: None,
        }
    }
}
