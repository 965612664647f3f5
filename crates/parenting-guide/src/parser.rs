/// Parser for the guidance-table JSON payload.
///
/// The endpoint is a spreadsheet export whose envelope varies by deployment:
/// - a bare array of row objects
/// - an object wrapping the rows under one of `WRAPPER_KEYS`
/// - an object of sheets, each an array (or an object of arrays, one level down)
///
/// Rows that are not objects are skipped; blank rows are dropped.
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::model::Entry;

const WRAPPER_KEYS: &[&str] = &["data", "rows", "records", "items", "library", "result"];

/// Parse a response body into library entries, in source order.
pub fn parse_library(body: &str) -> Result<Vec<Entry>, AppError> {
    let payload: Value = serde_json::from_str(body)?;
    let rows = collect_rows(&payload)?;
    let total = rows.len();

    let entries: Vec<Entry> = rows
        .into_iter()
        .filter_map(entry_from_row)
        .filter(|e| !e.is_blank())
        .collect();

    if entries.len() < total {
        debug!(
            rows = total,
            kept = entries.len(),
            "dropped non-object or blank rows"
        );
    }
    Ok(entries)
}

fn collect_rows(payload: &Value) -> Result<Vec<&Value>, AppError> {
    match payload {
        Value::Array(rows) => Ok(rows.iter().collect()),
        Value::Object(map) => {
            if let Some(rows) = WRAPPER_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_array))
            {
                return Ok(rows.iter().collect());
            }
            merge_sheets(map)
        }
        other => Err(AppError::UnsupportedPayload(format!(
            "expected an array or object, got {}",
            json_kind(other)
        ))),
    }
}

/// Concatenate every array found among the object's values and, one level
/// down, among the values of nested objects. Sheets keep their source order.
fn merge_sheets(map: &Map<String, Value>) -> Result<Vec<&Value>, AppError> {
    let mut found_array = false;
    let mut rows = Vec::new();
    for value in map.values() {
        match value {
            Value::Array(sheet) => {
                found_array = true;
                rows.extend(sheet.iter());
            }
            Value::Object(nested) => {
                for inner in nested.values() {
                    if let Value::Array(sheet) = inner {
                        found_array = true;
                        rows.extend(sheet.iter());
                    }
                }
            }
            _ => {}
        }
    }

    if !found_array {
        warn!(keys = map.len(), "payload object contains no arrays");
        return Err(AppError::UnsupportedPayload(
            "object payload contains no row arrays".to_string(),
        ));
    }
    Ok(rows)
}

/// Build an entry from a row object. Strings are trimmed, numbers and booleans
/// keep their JSON text, null becomes empty, nested structures are ignored.
fn entry_from_row(row: &Value) -> Option<Entry> {
    let object = row.as_object()?;
    let pairs = object.iter().filter_map(|(key, value)| {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => return None,
        };
        Some((key.as_str(), text))
    });
    Some(Entry::from_pairs(pairs))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
