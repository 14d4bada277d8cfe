//! 统一错误处理
//!
//! 错误类型全部来自 `shared::error`，这里只放 HTTP 处理器用到的转换：
//! - [`ManagerError`] → [`AppError`]
//! - 失败的 [`CommandResponse`] → [`AppError`]
//! - 阻塞任务 (`spawn_blocking`) 的 JoinError → 系统错误

use crate::floor::ManagerError;
use shared::order::{CommandError, CommandResponse};

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        CommandError::from(err).into()
    }
}

/// 失败的命令响应转换为 AppError，成功 (含 noop / duplicate) 原样返回
pub fn command_result(response: CommandResponse) -> AppResult<CommandResponse> {
    if response.success {
        return Ok(response);
    }
    let err = response.error.unwrap_or_else(|| {
        CommandError::new(ErrorCode::InternalError, ErrorCode::InternalError.message())
    });
    Err(AppError::from(err).with_detail("command_id", response.command_id))
}

/// 在阻塞线程池上执行 redb 读写
pub async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        AppError::internal(format!("Blocking task failed: {}", e))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::FloorError;

    #[test]
    fn test_failed_command_maps_code() {
        let response = CommandResponse::error(
            "cmd-1".to_string(),
            CommandError::new(ErrorCode::TableNotAvailable, "Table 12 is OCCUPIED"),
        );
        let err = command_result(response).unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotAvailable);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert!(err.details.unwrap().contains_key("command_id"));
    }

    #[test]
    fn test_noop_passes_through() {
        let response = CommandResponse::noop("cmd-2".to_string(), "Table t1 has no open order");
        let ok = command_result(response).unwrap();
        assert!(ok.is_noop());
    }

    #[test]
    fn test_manager_error_not_found() {
        let err: AppError = ManagerError::from(FloorError::OrderNotFound("o-1".into())).into();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_blocking_returns_value() {
        let value = run_blocking(|| Ok::<_, AppError>(42)).await.unwrap();
        assert_eq!(value, 42);
    }
}
