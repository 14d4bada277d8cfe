//! Staff header extractor

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::StaffRole;

use super::{CurrentUser, STAFF_ID_HEADER, STAFF_NAME_HEADER, STAFF_ROLE_HEADER};
use crate::core::ServerState;
use crate::utils::AppError;

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 从请求头提取操作员
///
/// - `X-Staff-Id` 必填
/// - `X-Staff-Name` 缺省时使用 id
/// - `X-Staff-Role` 缺省为 WAITER，无法识别时拒绝
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Some(id) = header(parts, STAFF_ID_HEADER) else {
            tracing::warn!(uri = %parts.uri, "Request without staff identity");
            return Err(AppError::invalid_request("Missing X-Staff-Id header"));
        };

        let role = match header(parts, STAFF_ROLE_HEADER) {
            Some(raw) => raw
                .parse::<StaffRole>()
                .map_err(|e| AppError::invalid_request(e).with_detail("header", "X-Staff-Role"))?,
            None => StaffRole::default(),
        };

        let user = CurrentUser {
            id: id.to_string(),
            name: header(parts, STAFF_NAME_HEADER).unwrap_or(id).to_string(),
            role,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::utils::ErrorCode;

    fn state() -> (tempfile::TempDir, ServerState) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
        let state = ServerState::initialize(&config).unwrap();
        (dir, state)
    }

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = http::Request::builder().uri("/api/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_full_headers() {
        let (_dir, state) = state();
        let mut parts = parts(&[
            ("X-Staff-Id", "k1"),
            ("X-Staff-Name", "Ravi"),
            ("X-Staff-Role", "kitchen"),
        ]);
        let user = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.name, "Ravi");
        assert_eq!(user.role, StaffRole::Kitchen);
    }

    #[tokio::test]
    async fn test_defaults_name_and_role() {
        let (_dir, state) = state();
        let mut parts = parts(&[("X-Staff-Id", "w7")]);
        let user = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.name, "w7");
        assert_eq!(user.role, StaffRole::Waiter);
    }

    #[tokio::test]
    async fn test_rejects_missing_id_and_bad_role() {
        let (_dir, state) = state();
        let mut missing = parts(&[("X-Staff-Name", "Nobody")]);
        let err = CurrentUser::from_request_parts(&mut missing, &state)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let mut bad_role = parts(&[("X-Staff-Id", "w1"), ("X-Staff-Role", "chef")]);
        let err = CurrentUser::from_request_parts(&mut bad_role, &state)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
