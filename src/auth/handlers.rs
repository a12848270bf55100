//! Authentication & Submission Endpoints
//! Mission: Register, login, submit, and list submissions

use crate::auth::{
    jwt::TokenService,
    middleware::auth_middleware,
    models::{Claims, LoginRequest, LoginResponse, RegisterRequest, Role, SubmitRequest},
};
use crate::store::{StoreError, Submission, SubmissionStore, UserStore};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use bcrypt::DEFAULT_COST;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Shared application state, built once at startup and passed to handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub tokens: Arc<TokenService>,
    pub strict_validation: bool,
}

/// Build the `/api/auth` router: register and login are public, submit and
/// the submission listing sit behind the token middleware.
pub fn api_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/auth/submit", post(submit))
        .route("/api/auth/submissions", get(list_submissions))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}

/// Register endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let role = if state.strict_validation {
        Role::strict(&payload.role).ok_or(ApiError::InvalidRole)?
    } else {
        Role::lenient(&payload.role)
    };

    // bcrypt is deliberately slow; keep it off the reactor threads.
    let password_hash = tokio::task::spawn_blocking(move || {
        bcrypt::hash(payload.password, DEFAULT_COST)
    })
    .await
    .map_err(|_| ApiError::Internal)?
    .map_err(|_| ApiError::Internal)?;

    let user = state
        .users
        .create(&payload.username, &password_hash, role)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateUser => ApiError::DuplicateUser,
            StoreError::Backend(err) => {
                warn!("Registration failed: {err:#}");
                ApiError::Internal
            }
        })?;

    info!("Registered user: {} ({})", user.username, user.role.as_str());

    Ok((StatusCode::CREATED, "User registered"))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            warn!("Login lookup failed: {e}");
            ApiError::Internal
        })?
        .ok_or_else(|| {
            warn!("Failed login attempt: {}", payload.username);
            ApiError::InvalidCredentials
        })?;

    // Constant-time comparison against the stored hash, never raw strings.
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(payload.password, &hash))
        .await
        .map_err(|_| ApiError::Internal)?
        .map_err(|_| ApiError::Internal)?;

    if !valid {
        warn!("Failed login attempt: {}", user.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&user).map_err(|e| {
        warn!("Token issuance failed: {e:#}");
        ApiError::Internal
    })?;

    info!("Login successful: {} ({})", user.username, user.role.as_str());

    Ok(Json(LoginResponse { token }))
}

/// Submit endpoint - POST /api/auth/submit (role `user` only)
pub async fn submit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    if !claims.role.is_user() {
        return Err(ApiError::Forbidden);
    }

    let user_id = Uuid::parse_str(&claims.sub).ok();
    state
        .submissions
        .append(&payload.data, user_id)
        .await
        .map_err(|e| {
            warn!("Submission failed: {e}");
            ApiError::Internal
        })?;

    info!("Submission stored for {}", claims.username);

    Ok((StatusCode::CREATED, "Data submitted"))
}

/// Submission listing endpoint - GET /api/auth/submissions (role `admin` only)
pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    if !claims.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let submissions = state.submissions.list_all().await.map_err(|e| {
        warn!("Submission listing failed: {e}");
        ApiError::Internal
    })?;

    Ok(Json(submissions))
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    Forbidden,
    InvalidRole,
    DuplicateUser,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            ApiError::InvalidRole => (StatusCode::BAD_REQUEST, "Role must be 'user' or 'admin'"),
            ApiError::DuplicateUser => (StatusCode::CONFLICT, "Username already exists"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, message).into_response()
    }
}
