use clap::Args;
use serde_json::Value;

use loan_emi_core::loan::display::{self, Rendered};
use loan_emi_core::loan::{self, RawLoanInput};

use crate::input;

/// Arguments shared by `calculate` and `report`
#[derive(Args, Debug, Default)]
pub struct EmiArgs {
    /// Path to JSON input file with "principal", "rate" and "tenure" keys
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<String>,

    /// Annual interest rate in percent (e.g. 10 for 10%, 0 for interest-free)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Loan tenure in years
    #[arg(long, allow_hyphen_values = true)]
    pub tenure: Option<String>,
}

impl EmiArgs {
    /// Raw values from flags. Flags that were left out become empty fields
    /// so the validator reports them as missing. None when no flag was given.
    fn raw_from_flags(&self) -> Option<RawLoanInput> {
        if self.principal.is_none() && self.rate.is_none() && self.tenure.is_none() {
            return None;
        }
        Some(RawLoanInput::new(
            self.principal.clone().unwrap_or_default(),
            self.rate.clone().unwrap_or_default(),
            self.tenure.clone().unwrap_or_default(),
        ))
    }
}

fn get_raw_input(args: &EmiArgs) -> Result<RawLoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        input::file::read_json(path)
    } else if let Some(raw) = args.raw_from_flags() {
        Ok(raw)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("Provide --principal, --rate and --tenure, or --input file, or pipe JSON via stdin".into())
    }
}

pub fn run_calculate(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = get_raw_input(&args)?;
    let result = loan::evaluate(&raw)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_report(args: EmiArgs) -> Result<Rendered, Box<dyn std::error::Error>> {
    let raw = get_raw_input(&args)?;
    Ok(display::render(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(principal: Option<&str>, rate: Option<&str>, tenure: Option<&str>) -> EmiArgs {
        EmiArgs {
            input: None,
            principal: principal.map(String::from),
            rate: rate.map(String::from),
            tenure: tenure.map(String::from),
        }
    }

    #[test]
    fn test_no_flags_yields_none() {
        assert!(EmiArgs::default().raw_from_flags().is_none());
    }

    #[test]
    fn test_missing_flag_becomes_empty_field() {
        let raw = flags(Some("1000"), None, Some("2")).raw_from_flags().unwrap();
        assert_eq!(raw, RawLoanInput::new("1000", "", "2"));
    }

    #[test]
    fn test_calculate_from_flags() {
        let value = run_calculate(flags(Some("100000"), Some("10"), Some("1"))).unwrap();
        assert_eq!(value["result"]["emi"], "8791.59");
    }

    #[test]
    fn test_calculate_rejects_invalid_flags() {
        let err = run_calculate(flags(Some("-1000"), Some("5"), Some("2"))).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid loan amount.");
    }

    #[test]
    fn test_report_renders_error_instead_of_failing() {
        let rendered = run_report(flags(Some("1000"), Some("-5"), Some("2"))).unwrap();
        assert!(rendered.is_error());
    }
}
