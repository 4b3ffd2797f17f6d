use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar, is_record_array};

/// Render the envelope as tables: scalar fields first, then one table per
/// record list (cash flows, scenarios, stress tests), then warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_fields(value),
        },
        Value::Array(rows) => print_records(rows),
        _ => println!("{}", format_scalar(value)),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Array(rows) => print_records(rows),
        _ => print_fields(result),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

fn print_fields(value: &Value) {
    let mut flat = Vec::new();
    flatten("", value, true, &mut flat);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();
    for (key, val) in flat {
        match val {
            Value::Array(rows) if is_record_array(&rows) => sections.push((key, rows)),
            other => builder.push_record([key, format_scalar(&other)]),
        }
    }
    println!("{}", Table::from(builder));

    for (title, rows) in sections {
        println!("\n{title}:");
        print_records(&rows);
    }
}

fn print_records(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let flattened: Vec<Vec<(String, Value)>> = rows
        .iter()
        .map(|row| {
            let mut flat = Vec::new();
            flatten("", row, false, &mut flat);
            flat
        })
        .collect();

    let headers: Vec<String> = flattened[0].iter().map(|(k, _)| k.clone()).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in &flattened {
        builder.push_record(headers.iter().map(|h| {
            row.iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| format_scalar(v))
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}
