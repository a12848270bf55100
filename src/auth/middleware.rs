//! Authentication Middleware
//! Mission: Protect endpoints with bearer token verification

use crate::auth::jwt::TokenService;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Middleware that verifies the bearer token on every protected request.
///
/// The legacy clients send the raw token in the `Authorization` header; a
/// standard `Bearer ` prefix is tolerated. Missing token rejects with 401,
/// a token that fails verification rejects with 403.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = tokens.verify(&token).map_err(|e| {
        warn!("Rejected token: {e:#}");
        AuthError::InvalidToken
    })?;

    // Make claims available to handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Auth middleware error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token"),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Claims, Role};
    use axum::{body::Body, http::Request as HttpRequest};
    use uuid::Uuid;

    #[test]
    fn test_auth_error_status_codes() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::InvalidToken.into_response();
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_claims_round_trip_through_extensions() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(req.extensions().get::<Claims>().is_none());

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "test".to_string(),
            role: Role::user(),
            exp: None,
        };
        req.extensions_mut().insert(claims);

        let extracted = req.extensions().get::<Claims>();
        assert!(extracted.is_some());
        assert_eq!(extracted.unwrap().username, "test");
    }
}
