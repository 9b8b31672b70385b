//! Loan amortization engine
//!
//! Computes the fixed periodic payment of an amortizing loan and the full
//! payment-by-payment schedule (interest/principal split and running
//! balance). Everything here is pure, synchronous arithmetic.

mod payment;
mod rounding;
mod schedule;

pub use payment::{calculate_payment, monthly_rate, period_rate};
pub use rounding::round_to_cents;
pub use schedule::{generate_schedule, AmortizationResult, ScheduledPayment};

use thiserror::Error;

use crate::models::{InterestRateType, RepaymentFrequency};

/// Longest accepted term (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Reasons a set of loan terms cannot be amortized
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmortizationError {
    #[error("Principal amount must be greater than zero")]
    InvalidPrincipal,

    #[error("Interest rate must be zero or greater")]
    InvalidInterestRate,

    #[error("Loan term must be at least one month")]
    EmptyTerm,

    #[error("Loan term must not exceed {MAX_TERM_MONTHS} months")]
    TermTooLong,

    #[error("Yearly repayment requires a term in whole years, got {0} months")]
    PartialYearTerm(u32),

    #[error("Payment date is out of range")]
    DateOutOfRange,

    #[error("Loan payment is too large to compute")]
    PaymentOverflow,
}

/// Normalized terms of a single loan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,
    /// Nominal rate in percent (5 means 5%)
    pub interest_rate: f64,
    pub term_months: u32,
    /// Whether `interest_rate` is already monthly or annual
    pub interest_rate_type: InterestRateType,
    pub repayment_frequency: RepaymentFrequency,
}

impl LoanTerms {
    pub fn new(
        principal: f64,
        interest_rate: f64,
        term_months: u32,
        interest_rate_type: InterestRateType,
        repayment_frequency: RepaymentFrequency,
    ) -> Result<Self, AmortizationError> {
        let terms = Self {
            principal,
            interest_rate,
            term_months,
            interest_rate_type,
            repayment_frequency,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Build terms from a term expressed as years plus months
    pub fn from_years_and_months(
        principal: f64,
        interest_rate: f64,
        years: u32,
        months: u32,
        interest_rate_type: InterestRateType,
        repayment_frequency: RepaymentFrequency,
    ) -> Result<Self, AmortizationError> {
        let term_months = years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .ok_or(AmortizationError::TermTooLong)?;

        Self::new(
            principal,
            interest_rate,
            term_months,
            interest_rate_type,
            repayment_frequency,
        )
    }

    /// Check the terms can be amortized without dividing by zero
    pub fn validate(&self) -> Result<(), AmortizationError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(AmortizationError::InvalidPrincipal);
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(AmortizationError::InvalidInterestRate);
        }
        if self.term_months == 0 {
            return Err(AmortizationError::EmptyTerm);
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(AmortizationError::TermTooLong);
        }
        if self.repayment_frequency == RepaymentFrequency::Annual && self.term_months % 12 != 0 {
            return Err(AmortizationError::PartialYearTerm(self.term_months));
        }
        Ok(())
    }

    /// Number of payments over the term
    pub fn period_count(&self) -> u32 {
        self.term_months / self.repayment_frequency.months_per_period()
    }

    /// Interest rate applied to the balance each period, as a fraction
    pub fn period_rate(&self) -> f64 {
        period_rate(
            self.interest_rate,
            self.interest_rate_type,
            self.repayment_frequency,
        )
    }
}
