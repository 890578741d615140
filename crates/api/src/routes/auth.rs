//! Authentication routes for registration, login, logout, and session lookup.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::User;
use persistence::repositories::UserRepository;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::{AuthScheme, Identity};
use crate::services::auth::IssuedCredential;
use crate::services::cookies::CookieHelper;

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 255, message = "Address too long"))]
    pub address: Option<String>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for successful registration or login.
///
/// The credential itself travels only in the httpOnly cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
}

/// Response body for the session lookup endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    /// "session" for elevated roles, "jwt" for standard users.
    pub scheme: String,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new standard user.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let outcome = state
        .auth
        .register(
            &request.name,
            &request.email,
            &request.password,
            request.address.as_deref(),
        )
        .await?;

    let mut headers = HeaderMap::new();
    match &outcome.credential {
        IssuedCredential::Jwt { token } => state.cookies.add_auth_token_cookie(&mut headers, token),
        IssuedCredential::Session { token } => {
            state.cookies.add_session_token_cookie(&mut headers, token)
        }
    }

    let user: User = outcome.user.into();
    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, headers, Json(AuthResponse { user })))
}

/// Verify credentials and set the cookie matching the user's role.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let outcome = state.auth.login(&request.email, &request.password).await?;

    let mut headers = HeaderMap::new();
    match &outcome.credential {
        IssuedCredential::Jwt { token } => state.cookies.add_auth_token_cookie(&mut headers, token),
        IssuedCredential::Session { token } => {
            state.cookies.add_session_token_cookie(&mut headers, token)
        }
    }

    let user: User = outcome.user.into();
    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok((headers, Json(AuthResponse { user })))
}

/// Delete any server session and clear both auth cookies.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let session_token = CookieHelper::extract_session_token(&request_headers);
    state.auth.logout(session_token).await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookies(&mut headers);

    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Return the authenticated identity and its scheme.
///
/// GET /api/v1/auth/session
pub async fn session(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<SessionResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let scheme = match identity.scheme {
        AuthScheme::Session => "session",
        AuthScheme::Jwt => "jwt",
    };

    Ok(Json(SessionResponse {
        user: entity.into(),
        scheme: scheme.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "correct-horse".to_string(),
            address: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
            password: "correct-horse".to_string(),
            address: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_empty_name() {
        let request = RegisterRequest {
            name: String::new(),
            email: "ana@example.com".to_string(),
            password: "correct-horse".to_string(),
            address: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_empty_password() {
        let request = LoginRequest {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_auth_response_hides_password_hash() {
        use chrono::Utc;
        use domain::models::Role;
        use uuid::Uuid;

        let response = AuthResponse {
            user: User {
                id: Uuid::new_v4(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_hash: Some("$argon2id$hash".to_string()),
                address: None,
                role: Role::Standard,
                points_balance: 0,
                created_at: Utc::now(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"email\":\"ana@example.com\""));
    }
}
