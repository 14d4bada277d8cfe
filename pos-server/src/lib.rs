//! POS Floor Server - 餐厅楼面服务
//!
//! # 架构概述
//!
//! 管理桌台拓扑 (拆台、并台、换台)、订单生命周期和结账：
//!
//! - **楼面** (`floor`): 命令处理、事件、redb 持久化
//! - **金额** (`order_money`): Decimal 计价、税、折扣、找零
//! - **菜单** (`services/catalog_service`): 菜单目录缓存
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # 操作员身份 (请求头)
//! ├── services/      # HTTP 服务、菜单目录
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、错误转换
//! ├── floor/         # 楼面命令处理
//! └── order_money/   # 金额计算
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod floor;
pub mod order_money;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use floor::{FloorManager, FloorStorage};
pub use services::CatalogService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env，读取配置并初始化日志
pub fn setup_environment() -> Config {
    // 没有 .env 文件时直接使用环境变量
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/   floor server
    "#
    );
}
