use std::path::PathBuf;

use crate::core::ServerError;

/// 服务器配置 - 楼面服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志目录，存在时按天滚动写文件 |
/// | SEED_DEFAULTS | true | 空库首次启动时写入默认桌台和菜单 |
/// | SYNC_MAX_GAP | 1000 | 客户端落后超过该序号差时要求全量同步 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 是否写入默认数据
    pub seed_defaults: bool,
    /// 增量同步允许的最大序号差
    pub sync_max_gap: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            seed_defaults: std::env::var("SEED_DEFAULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            sync_max_gap: std::env::var("SYNC_MAX_GAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 启动前校验
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.work_dir.trim().is_empty() {
            return Err(ServerError::Config("WORK_DIR 不能为空".into()));
        }
        if self.sync_max_gap == 0 {
            return Err(ServerError::Config("SYNC_MAX_GAP 必须大于 0".into()));
        }
        Ok(())
    }

    /// 数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("floor.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
