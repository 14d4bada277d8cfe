//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`HttpService`] - HTTP 服务器
//! - [`CatalogService`] - 菜单目录统一管理（含内存缓存）

pub mod catalog_service;
pub mod https;

pub use catalog_service::{CatalogService, MenuCatalog};
pub use https::{HttpService, build_app, build_router};
