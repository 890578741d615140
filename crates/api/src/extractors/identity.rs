//! Identity extractor.
//!
//! Reads the identity that [`crate::middleware::auth::resolve_identity`]
//! stored in request extensions. Routes using this extractor must be behind
//! that middleware; without it the extractor rejects with 401.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::auth::Identity;

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::AuthScheme;
    use axum::http::Request;
    use domain::models::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_extractor_reads_extensions() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            role: Role::Standard,
            scheme: AuthScheme::Jwt,
        };

        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(identity.clone());
        let (mut parts, _) = req.into_parts();

        let extracted = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.user_id, identity.user_id);
        assert_eq!(extracted.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_extractor_rejects_missing_identity() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let result = Identity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
