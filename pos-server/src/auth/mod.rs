//! 操作员身份模块
//!
//! 身份来自请求头，本服务不做认证：
//! - [`CurrentUser`] - 当前操作员上下文
//! - `X-Staff-Id` / `X-Staff-Name` / `X-Staff-Role`

pub mod extractor;

use shared::models::{StaffRef, StaffRole};

pub const STAFF_ID_HEADER: &str = "x-staff-id";
pub const STAFF_NAME_HEADER: &str = "x-staff-name";
pub const STAFF_ROLE_HEADER: &str = "x-staff-role";

/// Staff member issuing the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl From<CurrentUser> for StaffRef {
    fn from(user: CurrentUser) -> Self {
        StaffRef::new(user.id, user.name, user.role)
    }
}
