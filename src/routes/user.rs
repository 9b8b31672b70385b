//! User route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{current_user, get_user, login, register};
use crate::app_state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/me", get(current_user))
        .route("/api/users/:id", get(get_user))
}
