//! Authentication Module
//! Mission: Token-based auth with role gating for the submission API

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use handlers::{api_router, AppState};
pub use jwt::TokenService;
pub use middleware::auth_middleware;
