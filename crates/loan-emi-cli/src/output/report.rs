use colored::Colorize;
use loan_emi_core::loan::display::Rendered;

use super::json::print_json;
use crate::OutputFormat;

/// Print a rendered submission. JSON keeps the structured form (including
/// which fields to highlight); every other format prints the text block.
pub fn print_report(format: &OutputFormat, rendered: &Rendered) {
    match format {
        OutputFormat::Json => print_json(rendered),
        _ if rendered.is_error() => println!("{}", rendered.to_text().red()),
        _ => println!("{}", rendered.to_text()),
    }
}
