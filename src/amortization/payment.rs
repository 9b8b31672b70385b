//! Rate normalization and the annuity payment formula

use super::LoanTerms;
use crate::models::{InterestRateType, RepaymentFrequency};

/// Base monthly rate as a fraction.
///
/// `interest_rate` is in percent. An annual rate is spread evenly over
/// twelve months; a monthly rate is used as given.
pub fn monthly_rate(interest_rate: f64, interest_rate_type: InterestRateType) -> f64 {
    let rate = interest_rate / 100.0;
    match interest_rate_type {
        InterestRateType::Monthly => rate,
        InterestRateType::Annual => rate / 12.0,
    }
}

/// Rate charged per repayment period, derived from the monthly base rate
pub fn period_rate(
    interest_rate: f64,
    interest_rate_type: InterestRateType,
    repayment_frequency: RepaymentFrequency,
) -> f64 {
    let rate = monthly_rate(interest_rate, interest_rate_type);
    match repayment_frequency {
        RepaymentFrequency::Monthly => rate,
        RepaymentFrequency::Annual => rate * 12.0,
    }
}

/// Fixed payment that retires the loan after `n` periods at rate `i`:
/// `P * i / (1 - (1 + i)^-n)`, or `P / n` when the rate is zero.
///
/// The discount term is evaluated as `-expm1(-n * ln1p(i))`, which stays
/// non-zero for rates too small to change `1 + i`. Rates that still
/// underflow it are treated as zero.
///
/// Callers must pass validated terms (`n >= 1`). The result can overflow
/// to infinity for extreme principals or rates.
pub fn calculate_payment(terms: &LoanTerms) -> f64 {
    let periods = f64::from(terms.period_count());
    let rate = terms.period_rate();

    if rate == 0.0 {
        return terms.principal / periods;
    }

    let discount = -(-periods * rate.ln_1p()).exp_m1();
    if !discount.is_normal() || discount <= 0.0 {
        return terms.principal / periods;
    }

    terms.principal * rate / discount
}
