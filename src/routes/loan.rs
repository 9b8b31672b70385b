//! Loan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{calculate_loan, get_loan};
use crate::app_state::AppState;

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/loans/calculate-loan", post(calculate_loan))
        .route("/api/loans/:id", get(get_loan))
}
