use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;

/// Extracts and validates the bearer access token, returning the user ID.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            (StatusCode::UNAUTHORIZED, "invalid or expired token".to_string())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::TokenKind;
    use crate::auth::jwt::test_tokens::{config, sign};
    use axum::http::Request;
    use time::Duration;

    async fn extract(header: Option<String>) -> Result<AuthUser, (StatusCode, String)> {
        let mut req = Request::builder().uri("/api/v1/meal-plans");
        if let Some(value) = header {
            req = req.header(axum::http::header::AUTHORIZATION, value);
        }
        let (mut parts, _) = req.body(()).unwrap().into_parts();
        let keys = JwtKeys::from(&config());
        AuthUser::from_request_parts(&mut parts, &keys).await
    }

    #[tokio::test]
    async fn accepts_bearer_access_token() {
        let user_id = Uuid::new_v4();
        let token = sign(user_id, TokenKind::Access, "test-issuer", Duration::minutes(5));
        let AuthUser(got) = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(got, user_id);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let Err((status, msg)) = extract(None).await else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(msg.contains("missing"));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let Err((status, msg)) = extract(Some("Basic dXNlcjpwYXNz".into())).await else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(msg.contains("scheme"));
    }

    #[tokio::test]
    async fn refresh_token_is_unauthorized() {
        let token = sign(Uuid::new_v4(), TokenKind::Refresh, "test-issuer", Duration::minutes(5));
        let Err((status, _)) = extract(Some(format!("Bearer {token}"))).await else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
