pub mod file;
pub mod stdin;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Load a report payload from `--input`, falling back to piped stdin.
pub fn load(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_input_value(path);
    }
    if let Some(data) = stdin::read_stdin()? {
        return Ok(data);
    }
    Err(format!("--input file (or JSON on stdin) is required for {what}").into())
}

/// Set the payload's valuation date. An explicit `--as-of` wins over one in
/// the file; with neither, the current time is used.
pub fn with_as_of(mut value: Value, as_of: Option<DateTime<Utc>>) -> Value {
    if let Value::Object(map) = &mut value {
        match as_of {
            Some(ts) => {
                map.insert("as_of".into(), Value::String(ts.to_rfc3339()));
            }
            None => {
                map.entry("as_of")
                    .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
            }
        }
    }
    value
}
