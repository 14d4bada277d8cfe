use pos_server::{Server, ServerState, api, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment();

    print_banner();
    api::health::mark_started();

    tracing::info!(
        work_dir = %config.work_dir,
        http_port = config.http_port,
        "POS floor server starting..."
    );

    // 2. 初始化服务器状态 (数据库, 默认数据, 菜单缓存)
    let state = match ServerState::initialize(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize server state: {}", e);
            return Err(e.into());
        }
    };

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
