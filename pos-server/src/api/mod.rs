//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台拓扑 (拆台 / 并台 / 换台 / 结账)
//! - [`orders`] - 订单生命周期和统计
//! - [`menu`] - 菜单目录
//! - [`sync`] - 轮询同步
//!
//! 所有写操作都包装为 [`FloorCommand`] 交给 FloorManager 处理。

pub mod health;
pub mod menu;
pub mod orders;
pub mod sync;
pub mod tables;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, command_result, run_blocking};
use shared::order::{CommandResponse, FloorCommand, FloorCommandPayload};

/// 执行楼面命令 (阻塞线程池)，失败的命令转换为 AppError
pub(crate) async fn dispatch(
    state: &ServerState,
    user: CurrentUser,
    payload: FloorCommandPayload,
) -> AppResult<ApiResponse<CommandResponse>> {
    let cmd = FloorCommand::new(user.into(), payload);
    tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Dispatching command");

    let manager = state.manager.clone();
    let response = run_blocking(move || Ok(manager.execute_command(cmd))).await?;
    let response = command_result(response)?;

    Ok(match response.noop.clone() {
        Some(reason) => ApiResponse::success_with_message(reason, response),
        None => ApiResponse::success(response),
    })
}
