pub mod emi;
pub mod validation;

#[cfg(feature = "display")]
pub mod display;

pub use emi::{calculate_emi, LoanResult};
pub use validation::{
    validate, FieldError, FieldFailure, LoanField, LoanInput, RawLoanInput, ValidationOutcome,
};

use crate::types::ComputationOutput;
use crate::LoanEmiResult;

/// Handle one submission: parse and validate the raw fields, then calculate.
///
/// Validation failures abort before any arithmetic is attempted.
pub fn evaluate(raw: &RawLoanInput) -> LoanEmiResult<ComputationOutput<LoanResult>> {
    let input = validate(raw).into_result()?;
    calculate_emi(&input)
}
