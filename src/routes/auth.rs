//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{current_user, login};
use crate::app_state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth", post(login))
        .route("/api/auth/me", get(current_user))
}
