use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanError;
use crate::loan::validation::LoanInput;
use crate::time_value::level_payment;
use crate::types::*;
use crate::LoanEmiResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Decimal places of every reported amount.
pub const DISPLAY_DP: u32 = 2;

/// Output of the EMI calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// Equated monthly installment
    pub emi: Money,
    /// Interest paid over the life of the loan
    pub total_interest: Money,
    /// Principal plus interest
    pub total_payment: Money,
    /// Amount borrowed
    pub principal: Money,
    /// Number of monthly installments
    pub tenure_months: Decimal,
    /// Periodic (monthly) rate as a decimal
    pub monthly_rate: Rate,
}

/// Round a reported amount to cents, half away from zero.
pub fn round_amount(value: Money) -> Money {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate the equated monthly installment, total interest and total
/// payment of a loan.
///
/// A zero rate is repaid straight-line. Any other rate uses
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1) with r = rate / 12 / 100 and
/// n = tenure * 12. Amounts are rounded to two decimals; totals are derived
/// from the unrounded EMI.
pub fn calculate_emi(input: &LoanInput) -> LoanEmiResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.check()?;

    let principal = input.principal;
    let tenure_months = input
        .tenure_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| LoanError::calculation("tenure in months is out of range"))?;

    if !tenure_months.fract().is_zero() {
        warnings.push(format!(
            "Tenure of {} years is {} months; the final period is compounded fractionally",
            input.tenure_years, tenure_months
        ));
    }

    let (methodology, monthly_rate, emi, total_payment, total_interest) =
        if input.annual_rate_percent.is_zero() {
            debug!("zero-rate loan: repaying {principal} straight-line over {tenure_months} months");
            let emi = principal
                .checked_div(tenure_months)
                .ok_or_else(|| LoanError::calculation("straight-line installment overflow"))?;
            (
                "Loan EMI: interest-free, principal / months",
                Decimal::ZERO,
                emi,
                principal,
                Decimal::ZERO,
            )
        } else {
            let monthly_rate = input.annual_rate_percent / MONTHS_PER_YEAR / PERCENT;
            debug!("amortising {principal} at {monthly_rate} per month over {tenure_months} months");
            let emi = level_payment(monthly_rate, tenure_months, principal)?;
            let total_payment = emi
                .checked_mul(tenure_months)
                .ok_or_else(|| LoanError::calculation("total payment overflow"))?;
            let total_interest = total_payment
                .checked_sub(principal)
                .ok_or_else(|| LoanError::calculation("total interest overflow"))?;
            (
                "Loan EMI: standard amortisation P * r * (1 + r)^n / ((1 + r)^n - 1)",
                monthly_rate,
                emi,
                total_payment,
                total_interest,
            )
        };

    let emi = round_amount(emi);
    if emi.is_zero() {
        warnings.push("EMI rounds to zero at two decimal places".into());
    }

    let output = LoanResult {
        emi,
        total_interest: round_amount(total_interest),
        total_payment: round_amount(total_payment),
        principal,
        tenure_months,
        monthly_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "tenure_years": input.tenure_years.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn run(principal: Decimal, rate: Decimal, years: Decimal) -> LoanResult {
        calculate_emi(&LoanInput::new(principal, rate, years))
            .unwrap()
            .result
    }

    #[test]
    fn test_ten_percent_one_year() {
        let r = run(dec!(100000), dec!(10), dec!(1));
        assert_eq!(r.emi, dec!(8791.59));
        assert_eq!(r.total_payment, dec!(105499.06));
        assert_eq!(r.total_interest, dec!(5499.06));
        assert_eq!(r.tenure_months, dec!(12));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let r = run(dec!(50000), Decimal::ZERO, dec!(5));
        assert_eq!(r.emi, dec!(833.33));
        assert_eq!(r.total_payment, dec!(50000));
        assert_eq!(r.total_interest, Decimal::ZERO);
        assert_eq!(r.monthly_rate, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate_conversion() {
        let r = run(dec!(1000), dec!(12), dec!(2));
        assert_eq!(r.monthly_rate, dec!(0.01));
        assert_eq!(r.tenure_months, dec!(24));
    }

    #[test]
    fn test_fractional_tenure_warns() {
        let out = calculate_emi(&LoanInput::new(dec!(10000), dec!(6), dec!(0.1))).unwrap();
        assert_eq!(out.result.tenure_months, dec!(1.2));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_input_is_rejected_before_calculation() {
        let err = calculate_emi(&LoanInput::new(Decimal::ZERO, dec!(5), dec!(1))).unwrap_err();
        assert!(matches!(err, LoanError::Validation(_)));
    }

    #[test]
    fn test_extreme_tenure_is_calculation_error() {
        let err = calculate_emi(&LoanInput::new(dec!(100000), dec!(50), dec!(100000)))
            .unwrap_err();
        assert!(matches!(err, LoanError::Calculation { .. }));
    }

    #[test]
    fn test_metadata_envelope() {
        let out = calculate_emi(&LoanInput::new(dec!(100000), dec!(10), dec!(1))).unwrap();
        assert!(out.methodology.contains("amortisation"));
        assert_eq!(out.assumptions["annual_rate_percent"], "10");
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
