//! Loan service layer - amortization plus persistence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::amortization::{generate_schedule, round_to_cents, AmortizationError, LoanTerms};
use crate::error::ApiError;
use crate::models::{LoanCalculation, LoanWithSchedule, NewLoan};
use crate::store::{LoanStore, StoreError};

#[derive(Error, Debug)]
pub enum LoanServiceError {
    #[error(transparent)]
    InvalidTerms(#[from] AmortizationError),

    #[error("Loan not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LoanServiceError> for ApiError {
    fn from(e: LoanServiceError) -> Self {
        match e {
            LoanServiceError::InvalidTerms(err) => ApiError::Validation(vec![err.to_string()]),
            LoanServiceError::NotFound => ApiError::NotFound(e.to_string()),
            LoanServiceError::Store(err) => err.into(),
        }
    }
}

/// Loan service for calculating and retrieving loans
#[derive(Clone)]
pub struct LoanService {
    store: Arc<dyn LoanStore>,
}

impl LoanService {
    pub fn new(store: Arc<dyn LoanStore>) -> Self {
        Self { store }
    }

    /// Amortize `terms` starting now and persist the loan for `user_id`
    pub async fn calculate_loan(
        &self,
        user_id: Uuid,
        terms: LoanTerms,
    ) -> Result<LoanCalculation, LoanServiceError> {
        self.calculate_loan_at(user_id, terms, Utc::now()).await
    }

    /// Amortize `terms` with payments counted from `start_date`.
    ///
    /// Persists the loan and its schedule, then re-reads the stored loan so
    /// the response carries database-assigned ids and timestamps.
    pub async fn calculate_loan_at(
        &self,
        user_id: Uuid,
        terms: LoanTerms,
        start_date: DateTime<Utc>,
    ) -> Result<LoanCalculation, LoanServiceError> {
        let result = generate_schedule(&terms, start_date)?;

        let new_loan = NewLoan::from_terms(user_id, &terms, round_to_cents(result.payment));
        let loan = self
            .store
            .save_loan_with_schedule(new_loan, &result.schedule)
            .await?;

        tracing::info!(
            loan_id = %loan.id,
            user_id = %user_id,
            periods = result.schedule.len(),
            payment = loan.monthly_payment,
            "Loan calculated"
        );

        let details = self
            .store
            .find_loan_with_schedule(loan.id)
            .await?
            .ok_or(LoanServiceError::NotFound)?;

        Ok(LoanCalculation {
            details,
            total_to_be_paid: result.total_to_be_paid,
        })
    }

    /// Loan with its schedule, visible only to its owner
    pub async fn get_loan(
        &self,
        user_id: Uuid,
        loan_id: Uuid,
    ) -> Result<LoanWithSchedule, LoanServiceError> {
        match self.store.find_loan_with_schedule(loan_id).await? {
            Some(details) if details.loan.user_id == user_id => Ok(details),
            _ => Err(LoanServiceError::NotFound),
        }
    }
}
