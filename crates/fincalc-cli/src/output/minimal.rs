use serde_json::Value;

use super::{format_value, result_of};

/// Headline field of each calculator, in lookup order.
const PRIORITY_KEYS: [&str; 7] = [
    "price",
    "ytm",
    "realized_yield",
    "intrinsic_value",
    "w1",
    "risk_free_weight",
    "sharpe_ratio",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return format_value(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_value(val));
        }
    }

    format_value(result)
}
