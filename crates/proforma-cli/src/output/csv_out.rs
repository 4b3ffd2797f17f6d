use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, is_record_array};

/// Write the result as CSV on stdout.
///
/// Record lists (the monthly cash flow) become one row per record; anything
/// else becomes `field,value` pairs with dotted, indexed field names.
pub fn print_csv(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    let written = match result {
        Value::Array(rows) if is_record_array(rows) => write_records(&mut wtr, rows),
        _ => write_fields(&mut wtr, result),
    };
    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {e}");
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let mut flat = Vec::new();
    flatten("", value, false, &mut flat);

    wtr.write_record(["field", "value"])?;
    for (key, val) in flat {
        wtr.write_record([key, format_scalar(&val)])?;
    }
    Ok(())
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let mut headers: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let mut flat = Vec::new();
        flatten("", row, false, &mut flat);
        if i == 0 {
            headers = flat.iter().map(|(k, _)| k.clone()).collect();
            wtr.write_record(&headers)?;
        }
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                flat.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| format_scalar(v))
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&cells)?;
    }
    Ok(())
}
