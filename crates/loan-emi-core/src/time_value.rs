use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{Money, Rate};
use crate::LoanEmiResult;

/// Growth factor (1 + rate)^periods.
///
/// Whole period counts are compounded by exact repeated multiplication;
/// fractional counts go through `exp(ln(1 + rate) * periods)`.
/// Returns `None` when the factor cannot be represented.
pub fn compound_factor(rate: Rate, periods: Decimal) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(rate)?;
    if periods.fract().is_zero() {
        if let Some(n) = periods.to_i64() {
            return base.checked_powi(n);
        }
    }
    base.checked_powd(periods)
}

/// ln(f64::MAX). Growth past e^709.78 has no finite double-precision value,
/// so a payment built on it is undefined rather than approximated.
const MAX_LOG_GROWTH: Decimal = dec!(709.782712893384);

/// Discount factor (1 + rate)^-periods.
///
/// A growth factor too large for a Decimal discounts to zero; growth beyond
/// `MAX_LOG_GROWTH` is `None`.
pub fn discount_factor(rate: Rate, periods: Decimal) -> Option<Decimal> {
    let log_growth = Decimal::ONE
        .checked_add(rate)?
        .checked_ln()?
        .checked_mul(periods)?;
    if log_growth > MAX_LOG_GROWTH {
        return None;
    }

    match compound_factor(rate, periods) {
        Some(factor) => Decimal::ONE.checked_div(factor),
        None if log_growth > Decimal::ZERO => Some(Decimal::ZERO),
        None => None,
    }
}

/// Level payment that fully amortises `present_value` over `periods` at `rate`
/// per period. The payment is returned as a positive amount.
///
/// PMT = PV * r / (1 - (1 + r)^-n), which equals
/// PV * r * (1 + r)^n / ((1 + r)^n - 1) without forming PV * r * (1 + r)^n.
pub fn level_payment(rate: Rate, periods: Decimal, present_value: Money) -> LoanEmiResult<Money> {
    if periods <= Decimal::ZERO {
        return Err(LoanError::calculation(format!(
            "payment periods must be positive, got {periods}"
        )));
    }

    if rate.is_zero() {
        return present_value
            .checked_div(periods)
            .ok_or_else(|| LoanError::calculation("straight-line payment overflow"));
    }

    let discount = discount_factor(rate, periods).ok_or_else(|| {
        LoanError::calculation(format!(
            "discount factor (1 + {rate})^-{periods} is undefined"
        ))
    })?;

    let annuity_denominator = Decimal::ONE
        .checked_sub(discount)
        .filter(|d| !d.is_zero())
        .ok_or_else(|| LoanError::calculation("annuity factor is zero"))?;

    present_value
        .checked_mul(rate)
        .and_then(|v| v.checked_div(annuity_denominator))
        .ok_or_else(|| LoanError::calculation("level payment overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_factor_whole_periods() {
        let f = compound_factor(dec!(0.10), dec!(2)).unwrap();
        assert_eq!(f, dec!(1.21));
    }

    #[test]
    fn test_compound_factor_fractional_periods() {
        // 1.21^0.5 = 1.1
        let f = compound_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((f - dec!(1.1)).abs() < dec!(0.00001));
    }

    #[test]
    fn test_compound_factor_overflow() {
        assert!(compound_factor(dec!(1), dec!(1000)).is_none());
    }

    #[test]
    fn test_level_payment_basic() {
        // 1,000 over 12 periods at 1%: ~88.85
        let p = level_payment(dec!(0.01), dec!(12), dec!(1000)).unwrap();
        assert!((p - dec!(88.8488)).abs() < dec!(0.001));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let p = level_payment(Decimal::ZERO, dec!(10), dec!(1000)).unwrap();
        assert_eq!(p, dec!(100));
    }

    #[test]
    fn test_level_payment_rejects_zero_periods() {
        assert!(level_payment(dec!(0.01), Decimal::ZERO, dec!(1000)).is_err());
    }

    #[test]
    fn test_discount_factor_basic() {
        let v = discount_factor(dec!(0.25), dec!(2)).unwrap();
        assert_eq!(v, dec!(0.64));
    }

    #[test]
    fn test_discount_factor_past_decimal_range_is_zero() {
        // 1.03^3000 ~ 1e38 does not fit a Decimal but is finite in f64
        assert!(compound_factor(dec!(0.03), dec!(3000)).is_none());
        assert_eq!(discount_factor(dec!(0.03), dec!(3000)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_large_factor_does_not_overflow_payment() {
        // 1.05^1200 ~ 2.5e25; PV * r * factor alone would exceed Decimal::MAX
        let p = level_payment(dec!(0.05), dec!(1200), dec!(1000000)).unwrap();
        assert!((p - dec!(50000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_level_payment_tends_to_interest_only() {
        let p = level_payment(dec!(0.03), dec!(3000), dec!(100000)).unwrap();
        assert_eq!(p, dec!(3000));
    }

    #[test]
    fn test_level_payment_overflow_is_calculation_error() {
        let err = level_payment(dec!(0.5), dec!(1_000_000), dec!(1000)).unwrap_err();
        assert!(matches!(err, LoanError::Calculation { .. }));
    }
}
