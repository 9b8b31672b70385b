//! Amortization engine properties
//!
//! Checks the payment formula and schedule invariants across a spread of
//! loan shapes, independent of storage and HTTP.

use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};

use loancalc_server::amortization::{
    calculate_payment, generate_schedule, AmortizationError, LoanTerms,
};
use loancalc_server::models::{InterestRateType, RepaymentFrequency};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}

fn sample_loans() -> Vec<LoanTerms> {
    let shapes = [
        (10000.0, 1.0, 12, InterestRateType::Monthly, RepaymentFrequency::Monthly),
        (250000.0, 4.5, 360, InterestRateType::Annual, RepaymentFrequency::Monthly),
        (20000.0, 5.0, 48, InterestRateType::Annual, RepaymentFrequency::Annual),
        (5000.0, 0.0, 10, InterestRateType::Annual, RepaymentFrequency::Monthly),
        (1234.56, 0.75, 27, InterestRateType::Monthly, RepaymentFrequency::Monthly),
        (75000.0, 1.2, 120, InterestRateType::Monthly, RepaymentFrequency::Annual),
    ];

    shapes
        .into_iter()
        .map(|(principal, rate, months, rate_type, frequency)| {
            LoanTerms::new(principal, rate, months, rate_type, frequency).unwrap()
        })
        .collect()
}

// ============================================================================
// Payment Formula
// ============================================================================

#[test]
fn test_monthly_rate_one_percent_over_a_year() {
    let terms = LoanTerms::new(
        10000.0,
        1.0,
        12,
        InterestRateType::Monthly,
        RepaymentFrequency::Monthly,
    )
    .unwrap();

    let payment = calculate_payment(&terms);
    assert_abs_diff_eq!(payment, 10000.0 * 0.01 / (1.0 - 1.01_f64.powi(-12)), epsilon = 1e-9);
    assert_abs_diff_eq!(payment, 888.49, epsilon = 0.005);

    let result = generate_schedule(&terms, start()).unwrap();
    assert_eq!(result.schedule.len(), 12);
    assert!(result.schedule.last().unwrap().balance <= 0.01);
}

#[test]
fn test_payment_is_deterministic() {
    for terms in sample_loans() {
        assert_eq!(
            calculate_payment(&terms).to_bits(),
            calculate_payment(&terms).to_bits()
        );
    }
}

#[test]
fn test_zero_rate_splits_principal_evenly() {
    let terms = LoanTerms::new(
        5000.0,
        0.0,
        10,
        InterestRateType::Annual,
        RepaymentFrequency::Monthly,
    )
    .unwrap();

    let result = generate_schedule(&terms, start()).unwrap();
    assert_eq!(result.payment, 500.0);
    assert!(result.schedule.iter().all(|p| p.interest_paid == 0.0));
    assert_eq!(result.total_to_be_paid, 5000.0);
}

// ============================================================================
// Schedule Invariants
// ============================================================================

#[test]
fn test_schedule_length_matches_period_count() {
    for terms in sample_loans() {
        let expected = match terms.repayment_frequency {
            RepaymentFrequency::Monthly => terms.term_months,
            RepaymentFrequency::Annual => terms.term_months / 12,
        };
        let result = generate_schedule(&terms, start()).unwrap();
        assert_eq!(result.schedule.len(), expected as usize);
    }
}

#[test]
fn test_principal_paid_sums_to_principal() {
    for terms in sample_loans() {
        let result = generate_schedule(&terms, start()).unwrap();
        let repaid: f64 = result.schedule.iter().map(|p| p.principal_paid).sum();
        let tolerance = 0.01 * result.schedule.len() as f64;

        assert_abs_diff_eq!(repaid, terms.principal, epsilon = tolerance);
    }
}

#[test]
fn test_balance_never_increases_or_goes_negative() {
    for terms in sample_loans() {
        let result = generate_schedule(&terms, start()).unwrap();

        let mut previous = terms.principal;
        for payment in &result.schedule {
            assert!(payment.balance >= 0.0);
            assert!(payment.balance <= previous);
            previous = payment.balance;
        }
        assert!(previous <= 0.01);
    }
}

#[test]
fn test_total_is_payment_times_periods() {
    for terms in sample_loans() {
        let result = generate_schedule(&terms, start()).unwrap();
        let expected = result.payment * result.schedule.len() as f64;

        assert_abs_diff_eq!(result.total_to_be_paid, expected, epsilon = 0.01);
    }
}

#[test]
fn test_payment_dates_strictly_increase() {
    for terms in sample_loans() {
        let result = generate_schedule(&terms, start()).unwrap();
        let mut previous = start();
        for payment in &result.schedule {
            assert!(payment.payment_date > previous);
            previous = payment.payment_date;
        }
    }
}

// ============================================================================
// Rejected Terms
// ============================================================================

#[test]
fn test_zero_length_term_is_rejected() {
    let result = LoanTerms::from_years_and_months(
        10000.0,
        5.0,
        0,
        0,
        InterestRateType::Annual,
        RepaymentFrequency::Monthly,
    );
    assert_eq!(result, Err(AmortizationError::EmptyTerm));
}

#[test]
fn test_negative_rate_is_rejected() {
    let result = LoanTerms::new(
        10000.0,
        -1.0,
        12,
        InterestRateType::Annual,
        RepaymentFrequency::Monthly,
    );
    assert_eq!(result, Err(AmortizationError::InvalidInterestRate));
}

#[test]
fn test_partial_year_with_yearly_repayment_is_rejected() {
    let result = LoanTerms::from_years_and_months(
        10000.0,
        5.0,
        1,
        6,
        InterestRateType::Annual,
        RepaymentFrequency::Annual,
    );
    assert_eq!(result, Err(AmortizationError::PartialYearTerm(18)));
}
