use serde_json::Value;
use std::io;

use super::{format_value, result_fields};

/// Write the result fields as a two-column CSV (field, value) to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in result_fields(value) {
        let _ = wtr.write_record([key.as_str(), &format_value(val)]);
    }

    let _ = wtr.flush();
}
