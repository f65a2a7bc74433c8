use napi::Result as NapiResult;
use napi_derive::napi;

use loan_emi_core::loan::{self, display, LoanInput, RawLoanInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Typed input: `{"principal", "annual_rate_percent", "tenure_years"}`.
#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Raw form values: `{"principal", "rate", "tenure"}` as typed by the user.
#[napi]
pub fn evaluate_emi(raw_json: String) -> NapiResult<String> {
    let raw: RawLoanInput = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    let output = loan::evaluate(&raw).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Raw form values in, view model out. Never fails on bad input; the
/// returned object carries `"status": "error"` with messages and the
/// fields to highlight instead.
#[napi]
pub fn render_emi(raw_json: String) -> NapiResult<String> {
    let raw: RawLoanInput = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    serde_json::to_string(&display::render(&raw)).map_err(to_napi_error)
}
