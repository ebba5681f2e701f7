use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render a value as text tables. Report envelopes print their `result`
/// (one row per schedule entry when it is an array) followed by warnings
/// and methodology.
pub fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => render_envelope(result, map),
            None => format!("{}\n", field_table(map)),
        },
        Value::Array(arr) => render_rows(arr),
        _ => format!("{value}\n"),
    }
}

fn render_envelope(result: &Value, envelope: &serde_json::Map<String, Value>) -> String {
    let mut out = match result {
        Value::Object(res_map) => format!("{}\n", field_table(res_map)),
        Value::Array(rows) => render_rows(rows),
        other => format!("{}\n", format_value(other)),
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings {
                if let Value::String(s) = w {
                    out.push_str(&format!("  - {s}\n"));
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\nMethodology: {meth}\n"));
    }
    out
}

fn field_table(map: &serde_json::Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder)
}

fn render_rows(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)\n".to_string();
    }

    // Headers come from the first row
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        format!("{}\n", Table::from(builder))
    } else {
        arr.iter().map(|v| format!("{}\n", format_value(v))).collect()
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_envelope_renders_rows_and_warnings() {
        let out = render_table(&json!({
            "result": [
                { "payment_number": 1, "remaining_balance": "900.00" },
                { "payment_number": 2, "remaining_balance": "0.00" }
            ],
            "methodology": "Level-payment amortization projection",
            "warnings": ["1 paid-off loan(s) excluded"]
        }));
        assert!(out.contains("payment_number"));
        assert!(out.contains("900.00"));
        assert!(out.contains("Warnings:"));
        assert!(out.contains("Methodology: Level-payment amortization projection"));
    }

    #[test]
    fn test_empty_schedule() {
        let out = render_table(&json!({ "result": [], "warnings": [] }));
        assert!(out.starts_with("(empty)"));
        assert!(!out.contains("Warnings"));
    }
}
