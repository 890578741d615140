//! Authentication service for registration, login, and logout.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use domain::models::Role;
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{
    check_password_policy, hash_password, verify_password, PasswordError,
};
use shared::token::{generate_session_token, sha256_hex};
use shared::validation::{normalize_email, validate_email_format};

use crate::config::{JwtAuthConfig, SessionConfig};
use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password does not meet requirements")]
    WeakPassword,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".into())
            }
            AuthError::InvalidEmail => ApiError::Validation("Invalid email address".into()),
            AuthError::WeakPassword => ApiError::Validation(format!(
                "Password must be at least {} characters",
                shared::password::MIN_PASSWORD_LEN
            )),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".into())
            }
            AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Database(e) => e.into(),
        }
    }
}

/// Credential material issued on a successful login or registration.
#[derive(Debug, Clone)]
pub enum IssuedCredential {
    /// HS256 JWT for standard users, carried in the `auth_token` cookie.
    Jwt { token: String },
    /// Raw server-side session token for elevated roles, carried in the
    /// `session_token` cookie. Only its SHA-256 hash is stored.
    Session { token: String },
}

/// Result of a successful registration or login.
#[derive(Debug)]
pub struct AuthOutcome {
    pub user: UserEntity,
    pub credential: IssuedCredential,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
    session_expiry_secs: i64,
}

impl AuthService {
    /// Creates a new AuthService from configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig, session_config: &SessionConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt: JwtConfig::with_leeway(
                &jwt_config.secret,
                jwt_config.token_expiry_secs,
                jwt_config.leeway_secs,
            ),
            session_expiry_secs: session_config.expiry_secs,
        }
    }

    /// Returns the JWT configuration used to sign and validate tokens.
    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt
    }

    /// Register a new standard user and issue a JWT.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        address: Option<&str>,
    ) -> Result<AuthOutcome, AuthError> {
        let email = normalize_email(email);
        validate_email_format(&email).map_err(|_| AuthError::InvalidEmail)?;
        check_password_policy(password).map_err(|_| AuthError::WeakPassword)?;

        let password_hash = hash_password(password).map_err(AuthError::Password)?;

        let user = self
            .users
            .create_user(name, &email, &password_hash, address, Role::Standard.as_str())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    AuthError::EmailAlreadyExists
                }
                _ => AuthError::Database(e),
            })?;

        let (token, _jti) = self.jwt.generate_token(user.id, &user.email, &user.role)?;

        Ok(AuthOutcome {
            user,
            credential: IssuedCredential::Jwt { token },
        })
    }

    /// Verify credentials and issue the scheme matching the user's role.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid =
            verify_password(password, &user.password_hash).map_err(AuthError::Password)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let role = user.role.parse::<Role>().unwrap_or(Role::Standard);
        let credential = if role.is_elevated() {
            // Opportunistic cleanup; stale rows only accumulate through logins
            let removed = self.users.delete_expired_sessions().await?;
            if removed > 0 {
                tracing::debug!(count = removed, "Expired sessions removed");
            }

            let raw = generate_session_token();
            let expires_at = Utc::now() + Duration::seconds(self.session_expiry_secs);
            self.users
                .create_session(user.id, &sha256_hex(&raw), expires_at)
                .await?;
            IssuedCredential::Session { token: raw }
        } else {
            let (token, _jti) = self.jwt.generate_token(user.id, &user.email, &user.role)?;
            IssuedCredential::Jwt { token }
        };

        Ok(AuthOutcome { user, credential })
    }

    /// Delete the server session matching the raw token, if one exists.
    pub async fn logout(&self, session_token: Option<&str>) -> Result<(), AuthError> {
        if let Some(raw) = session_token {
            self.users.delete_session(&sha256_hex(raw)).await?;
        }
        Ok(())
    }
}
