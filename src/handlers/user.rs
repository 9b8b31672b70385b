//! User profile handlers

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::UserResponse;

/// GET /api/users/:id
pub async fn get_user(
    State(auth_service): State<Arc<AuthService>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = auth_service.get_user_by_id(user_id).await?;
    Ok(Json(user.into()))
}
