//! JSON export format implementation

use serde_json::{Map, Number, Value as JsonValue};

use super::format::ExportFormat;

/// JSON exporter (one object per line, NDJSON format)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportFormat for JsonExporter {
    fn header(&self, _columns: &[&str]) -> Option<String> {
        None // NDJSON carries column names in every object
    }

    fn format_row(&self, columns: &[&str], row: &[f64]) -> String {
        format_json_entry(columns, row).to_string()
    }
}

/// Column-keyed object for one row. Non-finite values become `null`.
pub fn format_json_entry(columns: &[&str], row: &[f64]) -> JsonValue {
    let entry: Map<String, JsonValue> = columns
        .iter()
        .zip(row)
        .map(|(column, &value)| {
            let value = Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number);
            ((*column).to_string(), value)
        })
        .collect();
    JsonValue::Object(entry)
}
