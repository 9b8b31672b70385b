//! In-memory store
//!
//! Mirrors the PostgreSQL constraints that matter to callers (unique email,
//! loan owner and schedule parent must exist). Used by tests and local
//! experiments; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LoanStore, StoreError, UserStore};
use crate::amortization::ScheduledPayment;
use crate::models::{Loan, LoanWithSchedule, NewLoan, NewUser, ScheduleEntry, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    loans: HashMap<Uuid, Loan>,
    schedules: HashMap<Uuid, Vec<ScheduleEntry>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn loan_count(&self) -> usize {
        self.tables.read().await.loans.len()
    }

    pub async fn schedule_entry_count(&self) -> usize {
        self.tables.read().await.schedules.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::UniqueViolation(format!(
                "duplicate key value violates unique constraint \"users_email_key\": {}",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn create_loan(&self, new_loan: NewLoan) -> Result<Loan, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_loan.user_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "loan owner {} does not exist",
                new_loan.user_id
            )));
        }

        let loan = Loan {
            id: Uuid::new_v4(),
            user_id: new_loan.user_id,
            principal_amount: new_loan.principal_amount,
            interest_rate: new_loan.interest_rate,
            interest_rate_type: new_loan.interest_rate_type,
            term_months: new_loan.term_months,
            repayment_frequency: new_loan.repayment_frequency,
            monthly_payment: new_loan.monthly_payment,
            created_at: Utc::now(),
        };
        tables.loans.insert(loan.id, loan.clone());
        tables.schedules.insert(loan.id, Vec::new());

        Ok(loan)
    }

    async fn create_schedule_entry(
        &self,
        loan_id: Uuid,
        entry: &ScheduledPayment,
    ) -> Result<ScheduleEntry, StoreError> {
        let mut tables = self.tables.write().await;

        let rows = tables.schedules.get_mut(&loan_id).ok_or_else(|| {
            StoreError::ConstraintViolation(format!("loan {} does not exist", loan_id))
        })?;

        let row = ScheduleEntry {
            id: Uuid::new_v4(),
            loan_id,
            payment_date: entry.payment_date,
            principal_paid: entry.principal_paid,
            interest_paid: entry.interest_paid,
            balance: entry.balance,
        };
        rows.push(row.clone());

        Ok(row)
    }

    async fn find_loan_with_schedule(
        &self,
        id: Uuid,
    ) -> Result<Option<LoanWithSchedule>, StoreError> {
        let tables = self.tables.read().await;

        let Some(loan) = tables.loans.get(&id).cloned() else {
            return Ok(None);
        };

        let mut amortization_schedules = tables.schedules.get(&id).cloned().unwrap_or_default();
        amortization_schedules.sort_by_key(|row| row.payment_date);

        Ok(Some(LoanWithSchedule {
            loan,
            amortization_schedules,
        }))
    }
}
