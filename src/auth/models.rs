//! Authentication Models
//! Mission: Define user, role, and token claim data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub created_at: String,
}

/// Coarse authorization tag gating endpoint access.
///
/// The well-known values are `"user"` and `"admin"`, but the legacy system
/// accepted any string at registration, so this is a validated newtype rather
/// than a closed enum. Strict mode rejects everything but the known values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const USER: &'static str = "user";
    pub const ADMIN: &'static str = "admin";

    /// Accept any role string (legacy behavior).
    pub fn lenient(s: &str) -> Self {
        Role(s.to_string())
    }

    /// Accept only the well-known roles.
    pub fn strict(s: &str) -> Option<Self> {
        match s {
            Self::USER | Self::ADMIN => Some(Role(s.to_string())),
            _ => None,
        }
    }

    pub fn user() -> Self {
        Role(Self::USER.to_string())
    }

    pub fn admin() -> Self {
        Role(Self::ADMIN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_user(&self) -> bool {
        self.0 == Self::USER
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // absent in legacy non-expiring mode
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Submission request body
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization_is_transparent() {
        let admin = Role::admin();
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let user: Role = serde_json::from_str(r#""user""#).unwrap();
        assert!(user.is_user());
    }

    #[test]
    fn test_strict_role_rejects_unknown_values() {
        assert!(Role::strict("user").is_some());
        assert!(Role::strict("admin").is_some());
        assert!(Role::strict("superadmin").is_none());
        assert!(Role::strict("").is_none());
        assert!(Role::strict("Admin").is_none()); // case-sensitive, like the original
    }

    #[test]
    fn test_lenient_role_accepts_anything() {
        let odd = Role::lenient("auditor");
        assert_eq!(odd.as_str(), "auditor");
        assert!(!odd.is_user());
        assert!(!odd.is_admin());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: Role::user(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_claims_omit_exp_when_absent() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            role: Role::user(),
            exp: None,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("exp"));
    }
}
