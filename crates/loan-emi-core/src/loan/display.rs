//! View model for whatever surface shows the calculator.
//!
//! Nothing here touches a screen. [`render`] turns one submission into the
//! result block, the details block, or the error block, together with the
//! fields that should be highlighted and for how long.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LoanError, CALCULATION_FAILED_MESSAGE};
use crate::loan::emi::{round_amount, LoanResult, DISPLAY_DP};
use crate::loan::validation::{LoanField, RawLoanInput};
use crate::types::Money;

pub const CURRENCY_SYMBOL: &str = "₹";

/// How long a rejected field stays highlighted unless the user edits it first.
pub const HIGHLIGHT_CLEAR_AFTER: Duration = Duration::from_secs(3);

/// Format an amount as currency with two decimals, e.g. `₹ 8791.59`.
pub fn format_currency(amount: Money) -> String {
    let mut value = round_amount(amount);
    value.rescale(DISPLAY_DP);
    format!("{CURRENCY_SYMBOL} {value}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    pub label: String,
    pub value: String,
}

impl DetailLine {
    fn new(label: &str, amount: Money) -> Self {
        Self {
            label: label.to_string(),
            value: format_currency(amount),
        }
    }
}

/// A field to flag, and when the flag should be cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHighlight {
    pub field: LoanField,
    pub clear_after_ms: u64,
}

impl FieldHighlight {
    pub fn new(field: LoanField) -> Self {
        Self {
            field,
            clear_after_ms: HIGHLIGHT_CLEAR_AFTER.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Rendered {
    Result {
        emi: String,
        details: Vec<DetailLine>,
    },
    /// Any previous result and details are cleared.
    Error {
        messages: Vec<String>,
        highlights: Vec<FieldHighlight>,
    },
}

impl Rendered {
    pub fn is_error(&self) -> bool {
        matches!(self, Rendered::Error { .. })
    }

    pub fn highlighted_fields(&self) -> Vec<LoanField> {
        match self {
            Rendered::Result { .. } => Vec::new(),
            Rendered::Error { highlights, .. } => highlights.iter().map(|h| h.field).collect(),
        }
    }

    /// Plain-text rendering, one block per line group.
    pub fn to_text(&self) -> String {
        match self {
            Rendered::Result { emi, details } => {
                let mut lines = vec!["Monthly EMI:".to_string(), emi.clone(), String::new()];
                lines.extend(details.iter().map(|d| format!("{}: {}", d.label, d.value)));
                lines.join("\n")
            }
            Rendered::Error { messages, .. } => messages.join("\n"),
        }
    }
}

pub fn render_result(result: &LoanResult) -> Rendered {
    Rendered::Result {
        emi: format_currency(result.emi),
        details: vec![
            DetailLine::new("Principal Loan Amount", result.principal),
            DetailLine::new("Total Interest Payable", result.total_interest),
            DetailLine::new("Total Payment (Principal + Interest)", result.total_payment),
        ],
    }
}

pub fn render_error(error: &LoanError) -> Rendered {
    match error {
        LoanError::Validation(errors) => Rendered::Error {
            messages: errors.iter().map(|e| e.message.clone()).collect(),
            highlights: errors.iter().map(|e| FieldHighlight::new(e.field)).collect(),
        },
        _ => Rendered::Error {
            messages: vec![CALCULATION_FAILED_MESSAGE.to_string()],
            highlights: Vec::new(),
        },
    }
}

/// Run one submission end to end and describe what to show.
pub fn render(raw: &RawLoanInput) -> Rendered {
    match crate::loan::evaluate(raw) {
        Ok(output) => render_result(&output.result),
        Err(e) => render_error(&e),
    }
}
