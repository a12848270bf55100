//! Service Configuration
//! Mission: Read runtime settings from the environment

use std::env;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listening port (`PORT`, default 3000).
    pub port: u16,
    /// SQLite path, or the literal `memory` for the in-memory backend
    /// (`INTAKE_DB`, default `intake.db`).
    pub db: String,
    /// HS256 signing secret (`INTAKE_JWT_SECRET`). The default matches the
    /// legacy system; set a real secret in production.
    pub jwt_secret: String,
    /// Token lifetime in seconds (`INTAKE_TOKEN_TTL_SECS`). Unset means
    /// tokens never expire, as in the legacy system.
    pub token_ttl_secs: Option<i64>,
    /// Strict role validation and in-memory duplicate-username rejection
    /// (`INTAKE_STRICT_VALIDATION`, default off).
    pub strict_validation: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let db = env::var("INTAKE_DB").unwrap_or_else(|_| "intake.db".to_string());

        let jwt_secret =
            env::var("INTAKE_JWT_SECRET").unwrap_or_else(|_| "secret_key".to_string());

        let token_ttl_secs = env::var("INTAKE_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0);

        let strict_validation = env::var("INTAKE_STRICT_VALIDATION")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);

        Self {
            port,
            db,
            jwt_secret,
            token_ttl_secs,
            strict_validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them to defaults-only so they
    // stay order-independent.
    #[test]
    fn test_defaults() {
        env::remove_var("PORT");
        env::remove_var("INTAKE_DB");
        env::remove_var("INTAKE_JWT_SECRET");
        env::remove_var("INTAKE_TOKEN_TTL_SECS");
        env::remove_var("INTAKE_STRICT_VALIDATION");

        let config = Config::from_env();
        assert_eq!(config.port, 3000);
        assert_eq!(config.db, "intake.db");
        assert_eq!(config.jwt_secret, "secret_key");
        assert!(config.token_ttl_secs.is_none());
        assert!(!config.strict_validation);
    }
}
