//! Identity resolution middleware.
//!
//! Resolves the caller's identity from either a server-side session cookie
//! (elevated roles) or a JWT (standard users) and stores it in request
//! extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use domain::models::Role;
use persistence::repositories::UserRepository;
use shared::token::sha256_hex;

use crate::app::AppState;
use crate::services::cookies::CookieHelper;

/// How the identity was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Server-side session (administrator / operator).
    Session,
    /// HS256 JWT (standard users).
    Jwt,
}

/// Resolved caller identity, stored in request extensions.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub scheme: AuthScheme,
}

/// Middleware that resolves the caller's identity.
///
/// Resolution order:
/// 1. `session_token` cookie: hash it and look up a live session row. A
///    valid session wins over any JWT in the same request.
/// 2. JWT from the `auth_token` cookie or `Authorization: Bearer` header.
///    A well-formed JWT carrying an elevated role claim is rejected and the
///    cookie is cleared; elevated roles only authenticate via session.
///
/// Missing credentials produce 401; present-but-invalid credentials 403.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let users = UserRepository::new(state.pool.clone());

    // 1. Server-side session
    if let Some(raw_token) = CookieHelper::extract_session_token(req.headers()) {
        match users.find_live_session(&sha256_hex(raw_token)).await {
            Ok(Some(session)) => match users.find_by_id(session.user_id).await {
                Ok(Some(user)) => {
                    let identity = Identity {
                        user_id: user.id,
                        email: user.email.clone(),
                        role: user.role.parse().unwrap_or(Role::Standard),
                        scheme: AuthScheme::Session,
                    };
                    req.extensions_mut().insert(identity);
                    return next.run(req).await;
                }
                Ok(None) => {
                    // Session row without a user; treat as invalid credentials
                    return forbidden_response("Invalid session");
                }
                Err(e) => {
                    tracing::error!("Session user lookup failed: {}", e);
                    return internal_error_response("Authentication service unavailable");
                }
            },
            Ok(None) => {
                return forbidden_response("Session expired or revoked");
            }
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                return internal_error_response("Authentication service unavailable");
            }
        }
    }

    // 2. JWT from cookie or Authorization header
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    let token = CookieHelper::extract_auth_token(req.headers()).or(bearer);

    let token = match token {
        Some(token) => token,
        None => return unauthorized_response("Authentication required"),
    };

    let claims = match state.auth.jwt_config().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            return forbidden_response("Invalid or expired token");
        }
    };

    let role = claims.role.parse::<Role>().unwrap_or(Role::Standard);
    if role.is_elevated() {
        // Elevated roles must not authenticate with a bearer token, even a
        // validly signed one. Clear the cookie so the client re-logs in.
        tracing::warn!(
            email = %claims.email,
            role = %role,
            "Rejected elevated-role JWT"
        );
        let mut response = forbidden_response("Elevated roles must authenticate via session");
        if let Ok(value) = HeaderValue::from_str(&state.cookies.build_clear_auth_token_cookie()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
        return response;
    }

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return forbidden_response("Invalid or expired token"),
    };

    let identity = Identity {
        user_id,
        email: claims.email,
        role,
        scheme: AuthScheme::Jwt,
    };
    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Authentication required");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Invalid or expired token");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_response() {
        let response = internal_error_response("Authentication service unavailable");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_identity_struct() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            role: Role::Standard,
            scheme: AuthScheme::Jwt,
        };
        assert_eq!(identity.scheme, AuthScheme::Jwt);
        assert!(!identity.role.is_elevated());
    }

    #[test]
    fn test_identity_clone() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "op@example.com".to_string(),
            role: Role::Operator,
            scheme: AuthScheme::Session,
        };
        let cloned = identity.clone();
        assert_eq!(cloned.user_id, identity.user_id);
        assert_eq!(cloned.scheme, AuthScheme::Session);
        assert!(cloned.role.is_elevated());
    }
}
