use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{detail_rows, format_value};

/// Format output as tables: headline fields first, then any schedule.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => println!("{}", field_table(map, None)),
        },
        _ => println!("{}", value),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let detail = detail_rows(result);
    println!("{}", field_table(result, detail.map(|(key, _)| key)));

    if let Some((key, rows)) = detail {
        println!("\n{}:", key);
        println!("{}", rows_table(rows));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Two-column Field/Value table, skipping the detail field.
fn field_table(map: &Map<String, Value>, skip: Option<&str>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(k, _)| Some(k.as_str()) != skip) {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    builder.build()
}

/// One row per object, headers from the first object.
fn rows_table(rows: &[Value]) -> Table {
    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    builder.build()
}
