//! Dining Table API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/tables | GET | 全部桌台 (按桌号排序) |
//! | /api/tables/{id} | GET | 单个桌台 |
//! | /api/tables/{id}/status | PUT | 设置状态 |
//! | /api/tables/{id}/split | POST | 拆台 |
//! | /api/tables/{id}/unsplit | POST | 取消拆台 |
//! | /api/tables/{id}/merge | POST | 并台 (id 为主桌) |
//! | /api/tables/{id}/unmerge | POST | 全部拆开 |
//! | /api/tables/{id}/unmerge/{member_id} | POST | 移出单桌 |
//! | /api/tables/{id}/reassign | POST | 换台 |
//! | /api/tables/{id}/finalize | POST | 结账并释放 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/split", post(handler::split))
        .route("/{id}/unsplit", post(handler::unsplit))
        .route("/{id}/merge", post(handler::merge))
        .route("/{id}/unmerge", post(handler::unmerge_all))
        .route("/{id}/unmerge/{member_id}", post(handler::unmerge_one))
        .route("/{id}/reassign", post(handler::reassign))
        .route("/{id}/finalize", post(handler::finalize))
}
