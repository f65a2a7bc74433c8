use serde_json::Value;

use super::format_value;

/// Print just the monthly installment, falling back to the first result field.
pub fn print_minimal(value: &Value) {
    let result_obj = value.get("result").unwrap_or(value);

    if let Some(emi) = result_obj.get("emi").filter(|v| !v.is_null()) {
        println!("{}", format_value(emi));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}
