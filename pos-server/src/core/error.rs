use thiserror::Error;

use crate::floor::{ManagerError, StorageError};

/// 启动与运行期错误 (HTTP 处理器使用 [`crate::utils::AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储初始化失败: {0}")]
    Storage(#[from] StorageError),

    #[error("楼面管理器初始化失败: {0}")]
    Manager(#[from] ManagerError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
