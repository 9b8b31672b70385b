//! Cent rounding for schedule figures

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to two decimal places, halves away from zero.
///
/// The decision is made on the exact binary value of `value`, so `2.675`
/// (stored as 2.67499...) rounds down while `0.125` rounds up. Non-finite
/// input is returned unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };

    let mut rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    // Nearest f64 to the two-decimal figure; zero loses its sign.
    rounded.mantissa() as f64 / 100.0
}
