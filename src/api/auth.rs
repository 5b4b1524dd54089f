use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::JsonBody;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::{AdminInfo, AuthError};

/// Session key holding the logged-in [`AdminIdentity`].
const SESSION_ADMIN_KEY: &str = "admin";

// ============================================================================
// Request/Response Types
// ============================================================================

/// The admin making the current request.
///
/// Inserted by [`auth_middleware`]; admin handlers take it as
/// `Extension<AdminIdentity>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminIdentity {
    pub id: i32,
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::AdminNotFound => Self::Unauthorized("Admin not found".to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Reads the admin from the session cookie and exposes it to handlers.
pub async fn auth_middleware(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let admin = session_admin(&session)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    tracing::Span::current().record("user_id", admin.username.as_str());
    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}

/// Returns the logged-in admin, if any.
pub async fn session_admin(session: &Session) -> Result<Option<AdminIdentity>, ApiError> {
    session
        .get::<AdminIdentity>(SESSION_ADMIN_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let admin = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    // Fresh session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    session
        .insert(
            SESSION_ADMIN_KEY,
            AdminIdentity {
                id: admin.id,
                username: admin.username.clone(),
            },
        )
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Admin logged in: {}", admin.username);
    Ok(Json(ApiResponse::success(admin)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// GET /auth/me
pub async fn get_current_admin(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    let info = state.auth_service().get_admin(admin.id).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .change_password(
            &admin.username,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    tracing::info!("Password changed for admin: {}", admin.username);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}
