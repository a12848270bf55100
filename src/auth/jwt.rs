//! JWT Token Service
//! Mission: Issue and verify signed bearer tokens

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Issues and verifies HS256 tokens with a static shared secret.
///
/// With no TTL configured, tokens carry no `exp` claim and never expire (the
/// legacy behavior). Configuring a TTL switches to expiring tokens, enforced
/// at verification.
pub struct TokenService {
    secret: String,
    ttl_secs: Option<i64>,
}

impl TokenService {
    pub fn new(secret: String, ttl_secs: Option<i64>) -> Self {
        Self { secret, ttl_secs }
    }

    /// Issue a signed token for a user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let exp = match self.ttl_secs {
            Some(ttl) => Some(
                Utc::now()
                    .checked_add_signed(chrono::Duration::seconds(ttl))
                    .context("Invalid timestamp")?
                    .timestamp() as usize,
            ),
            None => None,
        };

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp,
        };

        debug!(
            "Issuing token for user {} ({}), ttl: {:?}s",
            user.username, user.id, self.ttl_secs
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Verify a token's signature and extract its claims.
    ///
    /// Expiry is checked only when this service issues expiring tokens;
    /// legacy tokens have no `exp` to check.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        if self.ttl_secs.is_none() {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid token")?;

        debug!("Verified token for user {}", decoded.claims.username);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use uuid::Uuid;

    fn create_test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new("test-secret-key-12345".to_string(), None);
        let user = create_test_user(Role::user());

        let token = service.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, user.role);
        assert!(claims.exp.is_none()); // legacy mode: no expiry
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = TokenService::new("test-secret-key-12345".to_string(), None);

        assert!(service.verify("invalid.token.here").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = TokenService::new("secret1".to_string(), None);
        let verifier = TokenService::new("secret2".to_string(), None);
        let user = create_test_user(Role::admin());

        let token = issuer.issue(&user).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_ttl_sets_expiry_claim() {
        let service = TokenService::new("test-secret-key-12345".to_string(), Some(3600));
        let user = create_test_user(Role::user());

        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        let exp = claims.exp.expect("expiring token must carry exp");
        assert!(exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_expired_token_rejected_in_ttl_mode() {
        // Negative TTL produces a token that is already expired.
        let service = TokenService::new("test-secret-key-12345".to_string(), Some(-3600));
        let user = create_test_user(Role::user());

        let token = service.issue(&user).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_legacy_verifier_accepts_token_without_exp() {
        // A token issued before expiry was introduced still verifies.
        let service = TokenService::new("shared".to_string(), None);
        let user = create_test_user(Role::admin());

        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();
        assert!(claims.role.is_admin());
    }
}
