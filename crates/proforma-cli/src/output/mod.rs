pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Number, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Non-finite metrics serialize as JSON null.
pub const NOT_AVAILABLE: &str = "n/a";

/// Render a scalar for table / CSV cells: integers as-is, floats rounded to
/// cents, null as `n/a`.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => NOT_AVAILABLE.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten nested objects into dotted keys. Arrays of records are expanded
/// with `[i]` indices unless `keep_record_arrays` is set, in which case they
/// are returned whole for the caller to render separately.
pub fn flatten(prefix: &str, value: &Value, keep_record_arrays: bool, out: &mut Vec<(String, Value)>) {
    let key = |child: &str| {
        if prefix.is_empty() {
            child.to_string()
        } else {
            format!("{prefix}.{child}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&key(k), v, keep_record_arrays, out);
            }
        }
        Value::Array(items) if is_record_array(items) => {
            if keep_record_arrays {
                out.push((prefix.to_string(), value.clone()));
            } else {
                for (i, item) in items.iter().enumerate() {
                    flatten(&format!("{prefix}[{i}]"), item, keep_record_arrays, out);
                }
            }
        }
        _ => out.push((prefix.to_string(), value.clone())),
    }
}

pub fn is_record_array(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::Object(_)))
}

fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    n.as_f64()
        .and_then(Decimal::from_f64)
        .map(|d| {
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string()
        })
        .unwrap_or_else(|| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_scalar_rounds_to_cents() {
        assert_eq!(format_scalar(&json!(1896.2042)), "1896.2");
        assert_eq!(format_scalar(&json!(23.399883)), "23.4");
        assert_eq!(format_scalar(&json!(0.125)), "0.13");
        assert_eq!(format_scalar(&json!(96)), "96");
    }

    #[test]
    fn test_flatten_dotted_keys() {
        let value = json!({
            "metrics": { "irr": 23.4, "risk": { "level": "low" } },
            "rows": [{ "a": 1 }, { "a": 2 }],
            "flows": [1.0, 2.0]
        });
        let mut flat = Vec::new();
        flatten("", &value, false, &mut flat);
        let keys: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["flows", "metrics.irr", "metrics.risk.level", "rows[0].a", "rows[1].a"]
        );

        let mut kept = Vec::new();
        flatten("", &value, true, &mut kept);
        assert_eq!(kept.last().map(|(k, _)| k.as_str()), Some("rows"));
    }

    #[test]
    fn test_format_scalar_null_is_not_available() {
        assert_eq!(format_scalar(&Value::Null), "n/a");
        assert_eq!(format_scalar(&json!("Month 1")), "Month 1");
        assert_eq!(format_scalar(&json!(true)), "true");
    }
}
