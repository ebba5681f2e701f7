use serde_json::Value;

/// Pretty-printed JSON with a trailing newline.
pub fn render_json(value: &Value) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(s) => format!("{s}\n"),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimals_stay_strings() {
        let out = render_json(&json!({ "result": { "monthly_payment": "1063.69" } }));
        assert!(out.contains("\"monthly_payment\": \"1063.69\""));
        assert!(out.ends_with("}\n"));
    }
}
