use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// JSON piped on stdin, or `None` when stdin is a terminal or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let document = buffer.trim();
    if document.is_empty() {
        return Ok(None);
    }

    debug!(bytes = document.len(), "reading input from stdin");
    let value = serde_json::from_str(document)
        .map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?;
    Ok(Some(value))
}
