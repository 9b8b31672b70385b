//! Route definitions

mod auth;
mod loan;
mod user;

pub use auth::auth_routes;
pub use loan::loan_routes;
pub use user::user_routes;

use axum::Router;

use crate::app_state::AppState;

/// Every API route, bound to `state`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(loan_routes())
        .with_state(state)
}
