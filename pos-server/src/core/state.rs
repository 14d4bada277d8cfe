use std::sync::Arc;

use crate::core::{Config, Result};
use crate::floor::{FloorManager, FloorStorage, seed};
use crate::services::CatalogService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | manager | Arc<FloorManager> | 楼面命令处理与查询 |
/// | catalog | Arc<CatalogService> | 菜单目录 (内存缓存 + redb) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub manager: Arc<FloorManager>,
    pub catalog: Arc<CatalogService>,
}

impl ServerState {
    pub fn new(config: Config, manager: Arc<FloorManager>, catalog: Arc<CatalogService>) -> Self {
        Self {
            config,
            manager,
            catalog,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 校验配置并创建工作目录
    /// 2. 打开 redb 数据库
    /// 3. 空库时写入默认桌台和菜单 (SEED_DEFAULTS)
    /// 4. 加载菜单缓存并挂到 FloorManager
    pub fn initialize(config: &Config) -> Result<Self> {
        // 1. Work dir
        config.validate()?;
        std::fs::create_dir_all(&config.work_dir)?;

        // 2. Storage
        let db_path = config.db_path();
        tracing::info!(path = %db_path.display(), "Opening floor database");
        let storage = FloorStorage::open(&db_path)?;

        // 3. Seed
        if config.seed_defaults {
            seed::seed_if_empty(&storage)?;
        }

        // 4. Catalog + manager
        let catalog = Arc::new(CatalogService::new(storage.clone()));
        let menu_items = catalog.load()?;
        tracing::info!(menu_items, "Menu catalog loaded");

        let mut manager = FloorManager::with_storage(storage);
        manager.set_catalog(catalog.clone());
        tracing::info!(epoch = %manager.epoch(), "FloorManager ready");

        Ok(Self::new(config.clone(), Arc::new(manager), catalog))
    }

    /// 获取楼面管理器
    pub fn manager(&self) -> &FloorManager {
        &self.manager
    }
}
