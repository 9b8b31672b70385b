//! Loan models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::amortization::{AmortizationError, LoanTerms};

/// Whether the supplied interest rate is monthly or annual
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "interest_rate_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum InterestRateType {
    Monthly,
    Annual,
}

/// How often the borrower pays
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "repayment_frequency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RepaymentFrequency {
    Monthly,
    Annual,
}

impl RepaymentFrequency {
    pub fn months_per_period(&self) -> u32 {
        match self {
            RepaymentFrequency::Monthly => 1,
            RepaymentFrequency::Annual => 12,
        }
    }
}

/// `compound` field of a calculation request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Monthly,
    #[serde(alias = "annual", alias = "yearly")]
    Annually,
}

impl From<Compound> for InterestRateType {
    fn from(compound: Compound) -> Self {
        match compound {
            Compound::Monthly => InterestRateType::Monthly,
            Compound::Annually => InterestRateType::Annual,
        }
    }
}

/// `pay_back` field of a calculation request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayBack {
    Monthly,
    #[serde(alias = "annually", alias = "annual")]
    Yearly,
}

impl From<PayBack> for RepaymentFrequency {
    fn from(pay_back: PayBack) -> Self {
        match pay_back {
            PayBack::Monthly => RepaymentFrequency::Monthly,
            PayBack::Yearly => RepaymentFrequency::Annual,
        }
    }
}

/// Loan model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub interest_rate_type: InterestRateType,
    pub term_months: i32,
    pub repayment_frequency: RepaymentFrequency,
    /// Fixed payment per repayment period, rounded to cents
    pub monthly_payment: f64,
    pub created_at: DateTime<Utc>,
}

/// Amortization schedule row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub payment_date: DateTime<Utc>,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub balance: f64,
}

/// Fields needed to insert a loan
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub user_id: Uuid,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub interest_rate_type: InterestRateType,
    pub term_months: i32,
    pub repayment_frequency: RepaymentFrequency,
    pub monthly_payment: f64,
}

impl NewLoan {
    pub fn from_terms(user_id: Uuid, terms: &LoanTerms, monthly_payment: f64) -> Self {
        Self {
            user_id,
            principal_amount: terms.principal,
            interest_rate: terms.interest_rate,
            interest_rate_type: terms.interest_rate_type,
            // Bounded by MAX_TERM_MONTHS
            term_months: terms.term_months as i32,
            repayment_frequency: terms.repayment_frequency,
            monthly_payment,
        }
    }
}

/// Loan joined with its schedule, ordered by payment date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanWithSchedule {
    #[serde(flatten)]
    pub loan: Loan,
    pub amortization_schedules: Vec<ScheduleEntry>,
}

/// Persisted loan plus the total of all payments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCalculation {
    #[serde(flatten)]
    pub details: LoanWithSchedule,
    pub total_to_be_paid: f64,
}

/// Response body of `POST /api/loans/calculate-loan`
#[derive(Debug, Serialize)]
pub struct CalculateLoanResponse {
    pub message: String,
    pub loan: LoanCalculation,
}

/// Loan calculation request body
///
/// `years` and `months` arrive as strings holding whole numbers.
#[derive(Debug, Deserialize, Validate)]
pub struct CalculateLoanRequest {
    #[validate(required(message = "Principal Amount required"))]
    pub amount: Option<f64>,

    #[validate(required(message = "Years required"))]
    pub years: Option<String>,

    #[validate(required(message = "Months required"))]
    pub months: Option<String>,

    #[validate(required(message = "Interest Rate required"))]
    pub interest_rate: Option<f64>,

    #[validate(required(message = "Compound required"))]
    pub compound: Option<Compound>,

    #[validate(required(message = "Pay back required"))]
    pub pay_back: Option<PayBack>,
}

/// Why a calculation request cannot become loan terms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanRequestError {
    #[error("{0} required")]
    Missing(&'static str),

    #[error("{0} must be a whole number")]
    NotWholeNumber(&'static str),

    #[error(transparent)]
    Terms(#[from] AmortizationError),
}

impl CalculateLoanRequest {
    /// Normalize the request into validated loan terms
    pub fn into_terms(self) -> Result<LoanTerms, LoanRequestError> {
        let amount = self.amount.ok_or(LoanRequestError::Missing("Principal Amount"))?;
        let interest_rate = self
            .interest_rate
            .ok_or(LoanRequestError::Missing("Interest Rate"))?;
        let years = parse_whole_number(self.years.as_deref(), "Years")?;
        let months = parse_whole_number(self.months.as_deref(), "Months")?;
        let compound = self.compound.ok_or(LoanRequestError::Missing("Compound"))?;
        let pay_back = self.pay_back.ok_or(LoanRequestError::Missing("Pay back"))?;

        Ok(LoanTerms::from_years_and_months(
            amount,
            interest_rate,
            years,
            months,
            compound.into(),
            pay_back.into(),
        )?)
    }
}

fn parse_whole_number(value: Option<&str>, field: &'static str) -> Result<u32, LoanRequestError> {
    value
        .ok_or(LoanRequestError::Missing(field))?
        .trim()
        .parse::<u32>()
        .map_err(|_| LoanRequestError::NotWholeNumber(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CalculateLoanRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_request_normalizes_enums_and_term() {
        let terms = request(json!({
            "amount": 10000,
            "years": "2",
            "months": "3",
            "interest_rate": 5.5,
            "compound": "annually",
            "pay_back": "monthly"
        }))
        .into_terms()
        .unwrap();

        assert_eq!(terms.term_months, 27);
        assert_eq!(terms.interest_rate_type, InterestRateType::Annual);
        assert_eq!(terms.repayment_frequency, RepaymentFrequency::Monthly);
    }

    #[test]
    fn test_request_missing_fields_fail_validation() {
        let req = request(json!({ "amount": 1000 }));
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("years"));
        assert!(fields.contains_key("pay_back"));
        assert!(!fields.contains_key("amount"));
    }

    #[test]
    fn test_request_rejects_non_numeric_years() {
        let result = request(json!({
            "amount": 1000,
            "years": "two",
            "months": "0",
            "interest_rate": 5,
            "compound": "monthly",
            "pay_back": "monthly"
        }))
        .into_terms();

        assert_eq!(result, Err(LoanRequestError::NotWholeNumber("Years")));
    }

    #[test]
    fn test_request_rejects_empty_term() {
        let result = request(json!({
            "amount": 1000,
            "years": "0",
            "months": "0",
            "interest_rate": 5,
            "compound": "monthly",
            "pay_back": "yearly"
        }))
        .into_terms();

        assert_eq!(
            result,
            Err(LoanRequestError::Terms(AmortizationError::EmptyTerm))
        );
    }

    #[test]
    fn test_unknown_compound_does_not_deserialize() {
        let result = serde_json::from_value::<CalculateLoanRequest>(json!({
            "compound": "weekly"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_loan_serializes_camel_case() {
        let loan = Loan {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            principal_amount: 1000.0,
            interest_rate: 5.0,
            interest_rate_type: InterestRateType::Annual,
            term_months: 12,
            repayment_frequency: RepaymentFrequency::Monthly,
            monthly_payment: 85.61,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(LoanWithSchedule {
            loan,
            amortization_schedules: vec![],
        })
        .unwrap();

        assert_eq!(value["principalAmount"], 1000.0);
        assert_eq!(value["interestRateType"], "ANNUAL");
        assert_eq!(value["repaymentFrequency"], "MONTHLY");
        assert_eq!(value["termMonths"], 12);
        assert!(value["amortizationSchedules"].is_array());
    }

    #[test]
    fn test_complete_request_passes_validation() {
        let req = request(json!({
            "amount": 5000,
            "years": "1",
            "months": "0",
            "interest_rate": 3,
            "compound": "yearly",
            "pay_back": "annual"
        }));

        assert!(req.validate().is_ok());
        assert_eq!(req.compound, Some(Compound::Annually));
        assert_eq!(req.pay_back, Some(PayBack::Yearly));
        assert_eq!(serde_json::to_value(Compound::Annually).unwrap(), json!("annually"));
        assert_eq!(serde_json::to_value(PayBack::Yearly).unwrap(), json!("yearly"));
    }
}
