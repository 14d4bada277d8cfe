use super::super::storage::StorageError;
use super::super::traits::FloorError;
use shared::error::ErrorCode;
use shared::order::CommandError;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Floor(#[from] FloorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 将存储错误转换为错误码（前端负责本地化）
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if let StorageError::Serialization(_) = e {
        return ErrorCode::InternalError;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();

    // 磁盘空间不足
    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    // 内存不足
    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return ErrorCode::OutOfMemory;
    }

    // 数据损坏
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    // 默认：系统繁忙
    ErrorCode::SystemBusy
}

fn storage_command_error(e: &StorageError) -> CommandError {
    let code = classify_storage_error(e);
    tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
    CommandError::new(code, e.to_string())
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) | ManagerError::Floor(FloorError::Storage(e)) => {
                storage_command_error(&e)
            }
            ManagerError::Floor(e) => CommandError::new(e.code(), e.to_string()),
            ManagerError::Internal(msg) => CommandError::new(ErrorCode::InternalError, msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
