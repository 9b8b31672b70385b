//! Payment-by-payment schedule generation

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use super::{calculate_payment, round_to_cents, AmortizationError, LoanTerms};

/// One row of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPayment {
    pub payment_date: DateTime<Utc>,
    pub principal_paid: f64,
    pub interest_paid: f64,
    /// Remaining balance after this payment, never below zero
    pub balance: f64,
}

/// Outcome of amortizing a loan
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationResult {
    /// Unrounded fixed payment per period
    pub payment: f64,
    pub schedule: Vec<ScheduledPayment>,
    /// Sum of every payment, rounded to cents
    pub total_to_be_paid: f64,
}

/// Amortize `terms` with the first payment one period after `start_date`.
///
/// The balance and the running total are carried unrounded; only the
/// recorded figures are rounded to cents. Each payment date is derived from
/// the previous one, so a month-end start date clamps to shorter months and
/// keeps the clamped day afterwards.
pub fn generate_schedule(
    terms: &LoanTerms,
    start_date: DateTime<Utc>,
) -> Result<AmortizationResult, AmortizationError> {
    terms.validate()?;

    let payment = calculate_payment(terms);
    if !payment.is_finite() {
        return Err(AmortizationError::PaymentOverflow);
    }
    let rate = terms.period_rate();
    let periods = terms.period_count();
    let step = Months::new(terms.repayment_frequency.months_per_period());

    let mut schedule = Vec::with_capacity(periods as usize);
    let mut remaining_balance = terms.principal;
    let mut total_paid = 0.0;
    let mut payment_date = start_date;

    for _ in 0..periods {
        let interest_paid = remaining_balance * rate;
        let principal_paid = payment - interest_paid;
        remaining_balance -= principal_paid;
        total_paid += payment;

        payment_date = payment_date
            .checked_add_months(step)
            .ok_or(AmortizationError::DateOutOfRange)?;

        let balance = round_to_cents(remaining_balance);
        schedule.push(ScheduledPayment {
            payment_date,
            principal_paid: round_to_cents(principal_paid),
            interest_paid: round_to_cents(interest_paid),
            balance: if balance > 0.0 { balance } else { 0.0 },
        });
    }

    Ok(AmortizationResult {
        payment,
        schedule,
        total_to_be_paid: round_to_cents(total_paid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterestRateType, RepaymentFrequency};
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_first_payment_split() {
        let terms = LoanTerms::new(
            10000.0,
            1.0,
            12,
            InterestRateType::Monthly,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();
        let first = &result.schedule[0];

        assert_eq!(first.interest_paid, 100.0);
        assert_eq!(first.principal_paid, 788.49);
        assert_eq!(first.balance, 9211.51);
        assert_eq!(result.total_to_be_paid, 10661.85);
    }

    #[test]
    fn test_monthly_dates_advance_one_month() {
        let terms = LoanTerms::new(
            1000.0,
            5.0,
            3,
            InterestRateType::Annual,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();
        let dates: Vec<_> = result.schedule.iter().map(|p| p.payment_date).collect();

        assert_eq!(
            dates,
            vec![
                Utc.with_ymd_and_hms(2024, 2, 15, 9, 30, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 4, 15, 9, 30, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_annual_dates_advance_one_year() {
        let terms = LoanTerms::new(
            1000.0,
            5.0,
            24,
            InterestRateType::Annual,
            RepaymentFrequency::Annual,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();

        assert_eq!(result.schedule.len(), 2);
        assert_eq!(
            result.schedule[1].payment_date,
            Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_month_end_start_clamps_and_carries_forward() {
        let terms = LoanTerms::new(
            900.0,
            0.0,
            3,
            InterestRateType::Annual,
            RepaymentFrequency::Monthly,
        )
        .unwrap();
        let start = Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap();

        let result = generate_schedule(&terms, start).unwrap();
        let days: Vec<_> = result
            .schedule
            .iter()
            .map(|p| p.payment_date.format("%Y-%m-%d").to_string())
            .collect();

        assert_eq!(days, vec!["2023-02-28", "2023-03-28", "2023-04-28"]);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let terms = LoanTerms::new(
            1200.0,
            0.0,
            12,
            InterestRateType::Annual,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();

        assert!(result.schedule.iter().all(|p| p.interest_paid == 0.0));
        assert!(result.schedule.iter().all(|p| p.principal_paid == 100.0));
        assert_eq!(result.schedule.last().unwrap().balance, 0.0);
        assert_eq!(result.total_to_be_paid, 1200.0);
    }

    #[test]
    fn test_final_balance_reaches_zero() {
        let terms = LoanTerms::new(
            250000.0,
            4.25,
            360,
            InterestRateType::Annual,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();
        let last = result.schedule.last().unwrap();

        assert_abs_diff_eq!(last.balance, 0.0, epsilon = 0.01);
        assert!(last.balance >= 0.0);
    }

    #[test]
    fn test_invalid_terms_are_rejected() {
        let terms = LoanTerms {
            principal: 1000.0,
            interest_rate: 5.0,
            term_months: 0,
            interest_rate_type: InterestRateType::Annual,
            repayment_frequency: RepaymentFrequency::Monthly,
        };

        assert_eq!(
            generate_schedule(&terms, start()),
            Err(AmortizationError::EmptyTerm)
        );
    }

    #[test]
    fn test_tiny_rate_schedule_is_finite() {
        let terms = LoanTerms::new(
            10000.0,
            1e-14,
            12,
            InterestRateType::Annual,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        let result = generate_schedule(&terms, start()).unwrap();
        let repaid: f64 = result.schedule.iter().map(|p| p.principal_paid).sum();

        assert!(result.schedule.iter().all(|p| p.principal_paid.is_finite()));
        assert_abs_diff_eq!(repaid, 10000.0, epsilon = 0.12);
        assert_abs_diff_eq!(result.total_to_be_paid, 10000.0, epsilon = 0.01);
    }

    #[test]
    fn test_overflowing_payment_is_rejected() {
        let terms = LoanTerms::new(
            f64::MAX,
            100.0,
            12,
            InterestRateType::Monthly,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        assert_eq!(
            generate_schedule(&terms, start()),
            Err(AmortizationError::PaymentOverflow)
        );
    }
}
