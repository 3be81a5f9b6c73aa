use serde_json::Value;
use std::io::{self, Write};

use super::{detail_rows, format_value, result_of};

/// Write output as CSV to stdout.
///
/// A result carrying a schedule (bond cashflows, DDM periods) is written as
/// one row per entry; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match result_of(value) {
        Value::Object(result) => {
            if let Some((_, rows)) = detail_rows(result) {
                write_rows(&mut wtr, rows)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in result {
                    wtr.write_record([key.as_str(), &format_value(val)])?;
                }
            }
        }
        other => wtr.write_record([&format_value(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let headers: Vec<&str> = match rows.first() {
        Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
        _ => return Ok(()),
    };
    wtr.write_record(&headers)?;

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_value).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
