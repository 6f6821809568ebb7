use serde_json::Value;
use std::io::{self, Write};

use super::series;

/// Write output as CSV to stdout.
///
/// When the envelope carries a per-row series (yearly chart points or
/// sensitivity cells) that series is written, ready for plotting; otherwise
/// the headline result is written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    if let Some((_, rows)) = series(value) {
        write_rows(wtr, rows)?;
    } else {
        match value.get("result").unwrap_or(value) {
            Value::Object(map) => {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                }
            }
            Value::Array(arr) => write_rows(wtr, arr)?,
            other => wtr.write_record([&format_csv_value(other)])?,
        }
    }
    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([&format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_series_preferred_over_result() {
        let value = json!({
            "result": { "break_even": "Year 3" },
            "yearly": [
                { "year": 0, "cumulative_old": "0", "downtime_hours_old": null },
                { "year": 1, "cumulative_old": "100", "downtime_hours_old": "32" }
            ]
        });
        let out = render(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "year,cumulative_old,downtime_hours_old");
        assert_eq!(lines[1], "0,0,");
        assert_eq!(lines[2], "1,100,32");
    }

    #[test]
    fn test_result_as_field_value_pairs() {
        let value = json!({ "result": { "outcome": "submitted" } });
        assert_eq!(render(&value), "field,value\noutcome,submitted\n");
    }
}
