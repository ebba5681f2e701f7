use serde_json::Value;
use std::io::{self, Read};

/// Read a piped payload from stdin. Returns None when stdin is a TTY or
/// nothing was piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_payload(&buffer)
}

/// JSON first; a document that is not a JSON object or array is retried as
/// YAML so `cat fleet.yaml | ffa dashboard` works too.
pub fn parse_payload(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) if trimmed.starts_with('{') || trimmed.starts_with('[') => {
            return Err(format!("Failed to parse JSON from stdin: {e}").into());
        }
        Err(_) => serde_yaml::from_str(trimmed)
            .map_err(|e| format!("Failed to parse stdin as JSON or YAML: {e}"))?,
    };
    tracing::debug!(bytes = trimmed.len(), "input read from stdin");
    Ok(Some(value))
}
