use std::fmt;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoanError;
use crate::types::*;
use crate::LoanEmiResult;

/// One of the three inputs a borrower fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanField {
    Principal,
    Rate,
    Tenure,
}

impl LoanField {
    pub const ALL: [LoanField; 3] = [LoanField::Principal, LoanField::Rate, LoanField::Tenure];

    /// Identifier of the input field on the form.
    pub fn id(self) -> &'static str {
        match self {
            LoanField::Principal => "principal",
            LoanField::Rate => "rate",
            LoanField::Tenure => "tenure",
        }
    }

    /// Message shown to the borrower when this field is rejected.
    pub fn message(self) -> &'static str {
        match self {
            LoanField::Principal => "Please enter a valid loan amount.",
            LoanField::Rate => "Please enter a valid annual interest rate.",
            LoanField::Tenure => "Please enter a valid loan tenure in years.",
        }
    }

    /// Domain rule for an already-parsed value.
    fn check(self, value: Decimal) -> Result<(), FieldFailure> {
        match self {
            LoanField::Principal | LoanField::Tenure if value <= Decimal::ZERO => {
                Err(FieldFailure::NotPositive)
            }
            // Zero is an interest-free loan.
            LoanField::Rate if value < Decimal::ZERO => Err(FieldFailure::Negative),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFailure {
    Missing,
    NotANumber,
    NotPositive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: LoanField,
    pub failure: FieldFailure,
    pub message: String,
}

impl FieldError {
    pub fn new(field: LoanField, failure: FieldFailure) -> Self {
        Self {
            field,
            failure,
            message: field.message().to_string(),
        }
    }
}

/// The three values exactly as typed, before any parsing.
///
/// JSON numbers are accepted and kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLoanInput {
    #[serde(default, deserialize_with = "raw_text")]
    pub principal: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub rate: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub tenure: String,
}

impl RawLoanInput {
    pub fn new(
        principal: impl Into<String>,
        rate: impl Into<String>,
        tenure: impl Into<String>,
    ) -> Self {
        Self {
            principal: principal.into(),
            rate: rate.into(),
            tenure: tenure.into(),
        }
    }

    pub fn get(&self, field: LoanField) -> &str {
        match field {
            LoanField::Principal => &self.principal,
            LoanField::Rate => &self.rate,
            LoanField::Tenure => &self.tenure,
        }
    }
}

fn raw_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A loan request whose values satisfy the domain rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed
    pub principal: Money,
    /// Annual interest rate as a percentage (10 = 10% p.a.)
    pub annual_rate_percent: Percent,
    /// Repayment period in years
    pub tenure_years: Years,
}

impl LoanInput {
    pub fn new(principal: Money, annual_rate_percent: Percent, tenure_years: Years) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_years,
        }
    }

    pub fn get(&self, field: LoanField) -> Decimal {
        match field {
            LoanField::Principal => self.principal,
            LoanField::Rate => self.annual_rate_percent,
            LoanField::Tenure => self.tenure_years,
        }
    }

    /// Re-apply the domain rules, reporting every violated field.
    pub fn check(&self) -> LoanEmiResult<()> {
        let errors: Vec<FieldError> = LoanField::ALL
            .iter()
            .filter_map(|&field| {
                field
                    .check(self.get(field))
                    .err()
                    .map(|failure| FieldError::new(field, failure))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoanError::Validation(errors))
        }
    }
}

/// Result of validating a [`RawLoanInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(LoanInput),
    Invalid(Vec<FieldError>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationOutcome::Valid(_) => &[],
            ValidationOutcome::Invalid(errors) => errors,
        }
    }

    /// Fields the presentation layer should highlight.
    pub fn flagged_fields(&self) -> Vec<LoanField> {
        self.errors().iter().map(|e| e.field).collect()
    }

    pub fn into_result(self) -> LoanEmiResult<LoanInput> {
        match self {
            ValidationOutcome::Valid(input) => Ok(input),
            ValidationOutcome::Invalid(errors) => Err(LoanError::Validation(errors)),
        }
    }
}

/// Parse one raw field as a decimal number.
///
/// Surrounding whitespace is ignored. Scientific notation is accepted;
/// digit separators and trailing garbage (`"12abc"`) are not.
pub fn parse_field(raw: &str) -> Result<Decimal, FieldFailure> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(FieldFailure::Missing);
    }

    // Decimal::from_str would read "1_000" as 1000.
    if text.contains('_') {
        return Err(FieldFailure::NotANumber);
    }

    let parsed = if text.contains(|c| c == 'e' || c == 'E') {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    };
    parsed.map_err(|_| FieldFailure::NotANumber)
}

/// Parse and check all three fields independently.
pub fn validate(raw: &RawLoanInput) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut values = [Decimal::ZERO; 3];

    for (slot, field) in values.iter_mut().zip(LoanField::ALL) {
        match parse_field(raw.get(field)).and_then(|v| field.check(v).map(|_| v)) {
            Ok(v) => *slot = v,
            Err(failure) => {
                debug!("rejected {field} input {:?}: {failure:?}", raw.get(field));
                errors.push(FieldError::new(field, failure));
            }
        }
    }

    if !errors.is_empty() {
        return ValidationOutcome::Invalid(errors);
    }

    let [principal, annual_rate_percent, tenure_years] = values;
    ValidationOutcome::Valid(LoanInput::new(principal, annual_rate_percent, tenure_years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_and_padded() {
        assert_eq!(parse_field("100000"), Ok(dec!(100000)));
        assert_eq!(parse_field("  7.5 "), Ok(dec!(7.5)));
        assert_eq!(parse_field("-3"), Ok(dec!(-3)));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_field("1e5"), Ok(dec!(100000)));
        assert_eq!(parse_field("2.5E-1"), Ok(dec!(0.25)));
    }

    #[test]
    fn test_parse_empty_is_missing() {
        assert_eq!(parse_field(""), Err(FieldFailure::Missing));
        assert_eq!(parse_field("   "), Err(FieldFailure::Missing));
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert_eq!(parse_field("12abc"), Err(FieldFailure::NotANumber));
        assert_eq!(parse_field("abc"), Err(FieldFailure::NotANumber));
        assert_eq!(parse_field("NaN"), Err(FieldFailure::NotANumber));
        assert_eq!(parse_field("1_000"), Err(FieldFailure::NotANumber));
        assert_eq!(parse_field("1e_5"), Err(FieldFailure::NotANumber));
    }

    #[test]
    fn test_validate_all_good() {
        let outcome = validate(&RawLoanInput::new("100000", "10", "1"));
        assert_eq!(
            outcome,
            ValidationOutcome::Valid(LoanInput::new(dec!(100000), dec!(10), dec!(1)))
        );
    }

    #[test]
    fn test_zero_rate_is_valid() {
        assert!(validate(&RawLoanInput::new("50000", "0", "5")).is_valid());
    }

    #[test]
    fn test_every_failure_is_reported() {
        let outcome = validate(&RawLoanInput::new("0", "-1", "x"));
        assert_eq!(
            outcome.errors().to_vec(),
            vec![
                FieldError::new(LoanField::Principal, FieldFailure::NotPositive),
                FieldError::new(LoanField::Rate, FieldFailure::Negative),
                FieldError::new(LoanField::Tenure, FieldFailure::NotANumber),
            ]
        );
    }

    #[test]
    fn test_negative_principal_flags_principal_only() {
        let outcome = validate(&RawLoanInput::new("-1000", "5", "2"));
        assert_eq!(outcome.flagged_fields(), vec![LoanField::Principal]);
    }

    #[test]
    fn test_check_on_typed_input() {
        let input = LoanInput::new(dec!(1000), dec!(5), Decimal::ZERO);
        let err = input.check().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, LoanField::Tenure);
    }

    #[test]
    fn test_raw_input_accepts_json_numbers() {
        let raw: RawLoanInput =
            serde_json::from_str(r#"{"principal": 250000, "rate": "8.5"}"#).unwrap();
        assert_eq!(raw, RawLoanInput::new("250000", "8.5", ""));
    }
}
