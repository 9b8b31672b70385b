//! Persistence seams for users and loans
//!
//! Services hold `Arc<dyn UserStore>` / `Arc<dyn LoanStore>` handles built
//! at start-up, so handlers and tests can swap the PostgreSQL store for the
//! in-memory one.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::amortization::ScheduledPayment;
use crate::models::{Loan, LoanWithSchedule, NewLoan, NewUser, ScheduleEntry, User};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Storage errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation(db_err.message().to_string()),
                // Class 23: integrity constraint violation
                Some(code) if code.starts_with("23") => {
                    StoreError::ConstraintViolation(db_err.message().to_string())
                }
                _ => StoreError::Database(db_err.to_string()),
            },
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// User records
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Loan and amortization schedule records
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn create_loan(&self, new_loan: NewLoan) -> Result<Loan, StoreError>;

    async fn create_schedule_entry(
        &self,
        loan_id: Uuid,
        entry: &ScheduledPayment,
    ) -> Result<ScheduleEntry, StoreError>;

    /// Loan with its schedule ordered by payment date
    async fn find_loan_with_schedule(
        &self,
        id: Uuid,
    ) -> Result<Option<LoanWithSchedule>, StoreError>;

    /// Write a loan and then each schedule row, one at a time.
    ///
    /// Rows written before a failure are left in place; stores that can
    /// should override this with an atomic version.
    async fn save_loan_with_schedule(
        &self,
        new_loan: NewLoan,
        schedule: &[ScheduledPayment],
    ) -> Result<Loan, StoreError> {
        let loan = self.create_loan(new_loan).await?;
        for entry in schedule {
            self.create_schedule_entry(loan.id, entry).await?;
        }
        Ok(loan)
    }
}
