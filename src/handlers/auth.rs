//! Registration and login handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedUser, ValidatedJson};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::app_state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/users/login and POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}

/// GET /api/users/me and GET /api/auth/me
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state.auth_service.get_user_by_id(user.user_id).await?;
    Ok(Json(user.into()))
}
