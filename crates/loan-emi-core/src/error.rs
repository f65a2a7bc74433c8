use log::debug;
use thiserror::Error;

use crate::loan::validation::FieldError;

/// Message shown when valid inputs still produce no usable EMI.
pub const CALCULATION_FAILED_MESSAGE: &str = "Could not calculate EMI. Please check your inputs.";

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),

    /// `context` is diagnostic only and never part of the message.
    #[error("Could not calculate EMI. Please check your inputs.")]
    Calculation { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanError {
    /// Field errors carried by a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            LoanError::Validation(errors) => errors,
            _ => &[],
        }
    }

    pub(crate) fn calculation(context: impl Into<String>) -> Self {
        let context = context.into();
        debug!("calculation failed: {context}");
        LoanError::Calculation { context }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::SerializationError(e.to_string())
    }
}
