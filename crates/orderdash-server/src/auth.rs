//! Role gating for the JSON routes.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the caller's role is carried in [`ROLE_HEADER`]. The middleware
//! here only performs the capability check `role ∈ allowed`.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use orderdash_core::role::{Role, ADMIN_ROLES, MEMBER_ROLES};

use crate::error::AppError;

pub const ROLE_HEADER: &str = "x-orderdash-role";

/// Role context injected into request extensions after a successful check.
#[derive(Debug, Clone, Copy)]
pub struct RoleContext {
    pub role: Role,
}

/// Dashboard and orders views: any signed-in role.
pub async fn require_member(request: Request, next: Next) -> Response {
    require_roles(MEMBER_ROLES, request, next).await
}

/// Products, users and snapshot replacement: admins only.
pub async fn require_admin(request: Request, next: Next) -> Response {
    require_roles(ADMIN_ROLES, request, next).await
}

async fn require_roles(allowed: &[Role], mut request: Request, next: Next) -> Response {
    let role = match role_from_headers(request.headers()) {
        Ok(role) => role,
        Err(e) => return e.into_response(),
    };

    if !role.is_allowed(allowed) {
        tracing::warn!(
            role = role.as_str(),
            path = %request.uri().path(),
            "Role not allowed on route"
        );
        return AppError::Forbidden.into_response();
    }

    request.extensions_mut().insert(RoleContext { role });
    next.run(request).await
}

/// Missing header means no session (401); an unrecognised role is treated as
/// having no capabilities (403).
fn role_from_headers(headers: &HeaderMap) -> Result<Role, AppError> {
    let raw = headers
        .get(ROLE_HEADER)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Forbidden)?;
    Role::parse(raw).ok_or(AppError::Forbidden)
}
