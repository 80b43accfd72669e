use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::{ScheduleError, ScheduleResult};
use crate::types::Money;

/// Periods per year. Every period is a month.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Rounds an amount to cents, halves away from zero.
///
/// Every monetary value the crate produces goes through this function.
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a nominal annual percentage into the monthly decimal rate.
///
/// Unlike an effective-rate conversion this is a plain division:
/// 14% per year becomes 14 / 12 / 100 per month.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / Decimal::from(PERIODS_PER_YEAR) / dec!(100)
}

/// Calculates the fixed annuity payment.
///
/// The formula is: PMT = P * [r(1 + r)^n] / [(1 + r)^n – 1], with `r` the
/// monthly rate. A zero rate amortizes linearly: PMT = P / n. When `(1 + r)^n`
/// exceeds the `Decimal` range the payment is its limit, P * r.
///
/// # Arguments
///
/// * `principal` - The amount to amortize.
/// * `annual_rate_percent` - The nominal annual rate as a percentage.
/// * `periods` - The number of monthly payments.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] if the principal is not positive,
/// the rate is negative or `periods` is zero, and [`ScheduleError::Overflow`]
/// if the payment itself does not fit in a `Decimal`.
pub fn compute_payment(
    principal: Money,
    annual_rate_percent: Decimal,
    periods: u32,
) -> ScheduleResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(ScheduleError::invalid("principal", "must be greater than zero"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(ScheduleError::invalid("annual_rate_percent", "cannot be negative"));
    }
    if periods == 0 {
        return Err(ScheduleError::invalid("periods", "cannot be zero"));
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return Ok(round_money(principal / Decimal::from(periods)));
    }

    // (1 + r)^n / ((1 + r)^n - 1), which tends to 1 as n grows.
    let factor = match (Decimal::ONE + rate).checked_powu(periods.into()) {
        Some(growth) => match growth.checked_div(growth - Decimal::ONE) {
            Some(factor) => factor,
            // The rate is below Decimal precision.
            None => return Ok(round_money(principal / Decimal::from(periods))),
        },
        None => Decimal::ONE,
    };

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_mul(factor))
        .map(round_money)
        .ok_or_else(|| ScheduleError::overflow("payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(2_000_000), dec!(14), 36, dec!(68355.26))]
    #[case(dec!(12_000), dec!(12), 12, dec!(1066.19))]
    #[case(dec!(100_000), dec!(10), 360, dec!(877.57))]
    fn test_compute_payment(
        #[case] principal: Money,
        #[case] rate: Decimal,
        #[case] periods: u32,
        #[case] expected: Money,
    ) {
        assert_eq!(compute_payment(principal, rate, periods).unwrap(), expected);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        assert_eq!(compute_payment(dec!(12_000), dec!(0), 12).unwrap(), dec!(1000.00));
        assert_eq!(compute_payment(dec!(1000), dec!(0), 3).unwrap(), dec!(333.33));
    }

    #[rstest]
    #[case(dec!(100_000), dec!(300), 360, dec!(25000.00))]
    #[case(dec!(100_000), dec!(14), 10_000, dec!(1166.67))]
    #[case(dec!(100_000), dec!(14), u32::MAX, dec!(1166.67))]
    fn test_growth_overflow_converges_to_interest_only(
        #[case] principal: Money,
        #[case] rate: Decimal,
        #[case] periods: u32,
        #[case] expected: Money,
    ) {
        assert_eq!(compute_payment(principal, rate, periods).unwrap(), expected);
    }

    #[test]
    fn test_payment_beyond_decimal_range_is_an_error() {
        let result = compute_payment(Decimal::MAX, dec!(1200), 12);
        assert!(matches!(result, Err(ScheduleError::Overflow { .. })));
    }

    #[test]
    fn test_single_period_repays_principal_plus_interest() {
        // One period: the payment is principal * (1 + r).
        assert_eq!(compute_payment(dec!(1000), dec!(12), 1).unwrap(), dec!(1010.00));
    }

    #[rstest]
    #[case(dec!(0), dec!(10), 12, "principal")]
    #[case(dec!(-5), dec!(10), 12, "principal")]
    #[case(dec!(1000), dec!(-0.5), 12, "annual_rate_percent")]
    #[case(dec!(1000), dec!(10), 0, "periods")]
    fn test_invalid_inputs(
        #[case] principal: Money,
        #[case] rate: Decimal,
        #[case] periods: u32,
        #[case] field: &str,
    ) {
        match compute_payment(principal, rate, periods) {
            Err(ScheduleError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected invalid input on {field}, got {other:?}"),
        }
    }

    #[rstest]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(0.015), dec!(0.02))]
    #[case(dec!(2.675), dec!(2.68))]
    #[case(dec!(-0.005), dec!(-0.01))]
    #[case(dec!(1.004), dec!(1.00))]
    fn test_round_money_half_away_from_zero(#[case] value: Decimal, #[case] expected: Money) {
        assert_eq!(round_money(value), expected);
    }
}
