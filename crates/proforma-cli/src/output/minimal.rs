use serde_json::Value;

use super::format_scalar;

/// Headline values, most specific first, as JSON pointers into the result.
const HEADLINE_POINTERS: [&str; 6] = [
    "/metrics/internal_rate_of_return",
    "/irr",
    "/npv",
    "/payment",
    "/is_valid",
    "/viability/rating",
];

/// Print just the headline number of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(found) = HEADLINE_POINTERS
        .iter()
        .find_map(|p| result.pointer(p).filter(|v| !v.is_null()))
    {
        return format_scalar(found);
    }

    match result {
        // Monthly cash flow: where the cumulative position ends up.
        Value::Array(rows) => rows
            .last()
            .and_then(|row| row.get("cumulative_cash_flow"))
            .map(format_scalar)
            .unwrap_or_else(|| format_scalar(result)),
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(k, v)| format!("{k}: {}", format_scalar(v)))
            .unwrap_or_default(),
        _ => format_scalar(result),
    }
}
