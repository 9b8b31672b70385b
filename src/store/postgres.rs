//! PostgreSQL store backed by sqlx

use async_trait::async_trait;
use sqlx::postgres::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{LoanStore, StoreError, UserStore};
use crate::amortization::ScheduledPayment;
use crate::models::{Loan, LoanWithSchedule, NewLoan, NewUser, ScheduleEntry, User};

/// Store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_pool
    }
}

async fn insert_loan<'e, E: PgExecutor<'e>>(
    executor: E,
    new_loan: &NewLoan,
) -> Result<Loan, sqlx::Error> {
    sqlx::query_as::<_, Loan>(
        r#"
        INSERT INTO loans (
            id, user_id, principal_amount, interest_rate, interest_rate_type,
            term_months, repayment_frequency, monthly_payment
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, principal_amount, interest_rate, interest_rate_type,
                  term_months, repayment_frequency, monthly_payment, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_loan.user_id)
    .bind(new_loan.principal_amount)
    .bind(new_loan.interest_rate)
    .bind(new_loan.interest_rate_type)
    .bind(new_loan.term_months)
    .bind(new_loan.repayment_frequency)
    .bind(new_loan.monthly_payment)
    .fetch_one(executor)
    .await
}

async fn insert_schedule_entry<'e, E: PgExecutor<'e>>(
    executor: E,
    loan_id: Uuid,
    entry: &ScheduledPayment,
) -> Result<ScheduleEntry, sqlx::Error> {
    sqlx::query_as::<_, ScheduleEntry>(
        r#"
        INSERT INTO amortization_schedules (
            id, loan_id, payment_date, principal_paid, interest_paid, balance
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, loan_id, payment_date, principal_paid, interest_paid, balance
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(loan_id)
    .bind(entry.payment_date)
    .bind(entry.principal_paid)
    .bind(entry.interest_paid)
    .bind(entry.balance)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl LoanStore for PgStore {
    async fn create_loan(&self, new_loan: NewLoan) -> Result<Loan, StoreError> {
        Ok(insert_loan(&self.db_pool, &new_loan).await?)
    }

    async fn create_schedule_entry(
        &self,
        loan_id: Uuid,
        entry: &ScheduledPayment,
    ) -> Result<ScheduleEntry, StoreError> {
        Ok(insert_schedule_entry(&self.db_pool, loan_id, entry).await?)
    }

    async fn find_loan_with_schedule(
        &self,
        id: Uuid,
    ) -> Result<Option<LoanWithSchedule>, StoreError> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, user_id, principal_amount, interest_rate, interest_rate_type,
                   term_months, repayment_frequency, monthly_payment, created_at
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        let Some(loan) = loan else {
            return Ok(None);
        };

        let amortization_schedules = sqlx::query_as::<_, ScheduleEntry>(
            r#"
            SELECT id, loan_id, payment_date, principal_paid, interest_paid, balance
            FROM amortization_schedules
            WHERE loan_id = $1
            ORDER BY payment_date ASC
            "#,
        )
        .bind(loan.id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Some(LoanWithSchedule {
            loan,
            amortization_schedules,
        }))
    }

    /// Loan and schedule rows commit together or not at all
    async fn save_loan_with_schedule(
        &self,
        new_loan: NewLoan,
        schedule: &[ScheduledPayment],
    ) -> Result<Loan, StoreError> {
        let mut tx = self.db_pool.begin().await?;

        let loan = insert_loan(&mut *tx, &new_loan).await?;
        for entry in schedule {
            insert_schedule_entry(&mut *tx, loan.id, entry).await?;
        }

        tx.commit().await?;

        tracing::debug!(loan_id = %loan.id, rows = schedule.len(), "Loan schedule committed");

        Ok(loan)
    }
}
