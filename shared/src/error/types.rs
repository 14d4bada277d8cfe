//! HTTP-facing error and response envelope
//!
//! Handlers return [`AppResult`]. A rejected floor command, a lookup miss or
//! a storage failure becomes an [`AppError`] carrying its [`ErrorCode`]; axum
//! renders it as an [`ApiResponse`] whose HTTP status follows the code.

use super::category::ErrorKind;
use super::codes::ErrorCode;
use crate::order::CommandError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by an HTTP handler
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Offending ids (table, order, command, header name)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Lookup miss on a floor entity: `Table t7 not found`, detail `id = t7`
    pub fn missing(code: ErrorCode, entity: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(code, format!("{} {} not found", entity, id)).with_detail("id", id)
    }

    /// Malformed request outside the command payload (headers, query)
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// NOT_FOUND / VALIDATION / CONFLICT / INTERNAL
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        Self::new(err.code, err.message)
    }
}

/// Response body shared by every endpoint
///
/// `code` is 0 on success. A noop command still succeeds; its reason is
/// carried in `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }

    fn status(&self) -> StatusCode {
        ErrorCode::try_from(self.code)
            .map(|code| code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Handler result
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 业务拒绝是正常流程，只有系统错误记 error
        match self.kind() {
            ErrorKind::Internal => {
                tracing::error!(code = %self.code, message = %self.message, "Request failed")
            }
            _ => tracing::debug!(code = %self.code, message = %self.message, "Request rejected"),
        }
        let body = ApiResponse::<()>::failure(&self);
        (self.http_status(), Json(body)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
