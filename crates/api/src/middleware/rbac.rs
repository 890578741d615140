//! Role-based access control middleware.
//!
//! Per-route allow-list checks over the identity resolved by
//! [`crate::middleware::auth::resolve_identity`]. Stateless: every check
//! reads the identity from request extensions.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use domain::models::Role;

use crate::middleware::auth::Identity;

/// Allow only administrators.
pub async fn require_administrator(req: Request<Body>, next: Next) -> Response {
    check_roles(req, next, &[Role::Administrator]).await
}

/// Allow administrators and operators.
pub async fn require_elevated(req: Request<Body>, next: Next) -> Response {
    check_roles(req, next, &[Role::Administrator, Role::Operator]).await
}

/// Allow only standard users.
pub async fn require_standard(req: Request<Body>, next: Next) -> Response {
    check_roles(req, next, &[Role::Standard]).await
}

async fn check_roles(req: Request<Body>, next: Next, allowed: &'static [Role]) -> Response {
    let identity = match req.extensions().get::<Identity>() {
        Some(identity) => identity,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Authentication required"
                })),
            )
                .into_response();
        }
    };

    if !allowed.contains(&identity.role) {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            path = %req.uri().path(),
            "Access denied"
        );
        let required: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Insufficient role for this operation",
                "requiredRoles": required
            })),
        )
            .into_response();
    }

    next.run(req).await
}
