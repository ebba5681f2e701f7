pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Render a command result in the requested format.
pub fn render(format: &OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => json::render_json(value),
        OutputFormat::Table => table::render_table(value),
        OutputFormat::Csv => csv_out::render_csv(value),
        OutputFormat::Minimal => format!("{}\n", minimal::minimal(value)),
    }
}

/// Write a command result to stdout.
pub fn format_output(format: &OutputFormat, value: &Value) {
    print!("{}", render(format, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_format_renders_a_schedule() {
        let value = json!({
            "result": [{ "vehicle_name": "Mack Anthem (2021)", "current_value": "70000.00" }],
            "warnings": []
        });
        for format in [
            OutputFormat::Json,
            OutputFormat::Table,
            OutputFormat::Csv,
            OutputFormat::Minimal,
        ] {
            let out = render(&format, &value);
            assert!(!out.is_empty(), "{format:?}");
        }
        assert_eq!(render(&OutputFormat::Minimal, &value), "1 rows\n");
    }
}
