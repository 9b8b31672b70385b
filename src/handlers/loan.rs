//! Loan calculation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::loan_service::LoanService;
use crate::middleware::{AuthenticatedUser, ValidatedJson};
use crate::models::{CalculateLoanRequest, CalculateLoanResponse, LoanWithSchedule};

/// POST /api/loans/calculate-loan
pub async fn calculate_loan(
    State(service): State<Arc<LoanService>>,
    user: AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<CalculateLoanRequest>,
) -> ApiResult<Json<CalculateLoanResponse>> {
    let terms = req
        .into_terms()
        .map_err(|e| ApiError::Validation(vec![e.to_string()]))?;

    let loan = service.calculate_loan(user.user_id, terms).await?;

    Ok(Json(CalculateLoanResponse {
        message: "Loan calculation successful".to_string(),
        loan,
    }))
}

/// GET /api/loans/:id
pub async fn get_loan(
    State(service): State<Arc<LoanService>>,
    user: AuthenticatedUser,
    Path(loan_id): Path<Uuid>,
) -> ApiResult<Json<LoanWithSchedule>> {
    let loan = service.get_loan(user.user_id, loan_id).await?;
    Ok(Json(loan))
}
