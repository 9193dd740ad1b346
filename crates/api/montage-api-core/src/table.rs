//! Small tabular payload used by chart and timeline templates.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Row-major table of cells stored as text. Numeric columns are parsed on access.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Parse a cell as a number, tolerating thousands separators and a trailing `%`.
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        let raw = self.text(row, col)?;
        let cleaned: String = raw
            .trim()
            .trim_end_matches('%')
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Decode from JSON. Accepts `{headers, rows}`, an array of arrays whose first row is the
    /// header, or an array of objects (headers taken from the first object's keys).
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(obj) if obj.contains_key("rows") => {
                serde_json::from_value(value.clone()).ok()
            }
            JsonValue::Array(items) if items.iter().all(JsonValue::is_array) => {
                let mut rows = items.iter().filter_map(JsonValue::as_array).map(|row| {
                    row.iter().map(cell_to_string).collect::<Vec<_>>()
                });
                let headers = rows.next()?;
                Some(Self::new(headers, rows.collect()))
            }
            JsonValue::Array(items) if items.iter().all(JsonValue::is_object) => {
                let first = items.first()?.as_object()?;
                let headers: Vec<String> = first.keys().cloned().collect();
                let rows = items
                    .iter()
                    .filter_map(JsonValue::as_object)
                    .map(|obj| {
                        headers
                            .iter()
                            .map(|h| obj.get(h).map(cell_to_string).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                Some(Self::new(headers, rows))
            }
            JsonValue::String(s) => serde_json::from_str::<JsonValue>(s)
                .ok()
                .and_then(|parsed| Self::from_json(&parsed)),
            _ => None,
        }
    }
}

fn cell_to_string(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_array_of_arrays_with_header_row() {
        let t = DataTable::from_json(&json!([["Label", "Value"], ["A", 10], ["B", "2,500"]]))
            .expect("table");
        assert_eq!(t.headers, vec!["Label", "Value"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.number(0, 1), Some(10.0));
        assert_eq!(t.number(1, 1), Some(2500.0));
        assert_eq!(t.column_index("value"), Some(1));
    }

    #[test]
    fn decodes_array_of_objects() {
        let t = DataTable::from_json(&json!([
            {"year": "1990", "label": "Start"},
            {"year": "2000", "label": "Middle"}
        ]))
        .expect("table");
        let year = t.column_index("year").unwrap();
        assert_eq!(t.text(1, year), Some("2000"));
    }

    #[test]
    fn non_numeric_cells_yield_none() {
        let t = DataTable::new(vec!["a".into()], vec![vec!["n/a".into()]]);
        assert_eq!(t.number(0, 0), None);
        assert_eq!(t.number(5, 0), None);
    }
}
