use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const ROLE_CUSTOMER: &str = "CUSTOMER";
pub const ROLE_HOSTER: &str = "HOSTER";

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims issued by the authentication service. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// The verified caller, inserted into request extensions for handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

// ============================================================================
// Role-gated Authentication Middleware
// ============================================================================

pub async fn customer_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, req, next, ROLE_CUSTOMER).await
}

pub async fn hoster_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, req, next, ROLE_HOSTER).await
}

async fn authenticate(
    state: &AppState,
    mut req: Request,
    next: Next,
    required_role: &str,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthenticationError("Expected a bearer token".into()))?;

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|e| {
        tracing::debug!("rejected token: {}", e);
        AppError::AuthenticationError("Invalid or expired token".into())
    })?;

    // 3. Check role
    if token_data.claims.role != required_role {
        return Err(AppError::AuthorizationError(format!(
            "This endpoint requires the {} role",
            required_role
        )));
    }

    let id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::AuthenticationError("Token subject is not a user id".into()))?;

    // 4. Inject caller into request extensions
    req.extensions_mut().insert(AuthUser { id });
    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
