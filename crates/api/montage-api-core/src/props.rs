//! Template props: a loosely-typed key → JSON value map with lenient, defaulting accessors.
//!
//! Props are authored by users and may be missing, mistyped or out of range. Every accessor
//! takes a documented default and never fails; coercions mirror the rules used for slot
//! values (numbers may arrive as strings, booleans as numbers, and so on).

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::color::Color;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(HashMap<String, JsonValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Return `self` layered over `defaults`: keys present here win.
    pub fn merged_over(&self, defaults: &Props) -> Props {
        let mut out = defaults.clone();
        for (k, v) in self.0.iter() {
            if !v.is_null() {
                out.0.insert(k.clone(), v.clone());
            }
        }
        out
    }

    /// Numeric prop, accepting numbers, numeric strings and booleans.
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        let parsed = to_number(value);
        if parsed.is_none() {
            debug!("prop '{key}' is not numeric: {value}");
        }
        parsed
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    /// Numeric prop clamped into `[min, max]`.
    pub fn number_in(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        match self.number(key) {
            Some(v) if v < min || v > max => {
                debug!("prop '{key}'={v} clamped into [{min}, {max}]");
                v.clamp(min, max)
            }
            Some(v) => v,
            None => default,
        }
    }

    /// Integer prop (rounded) clamped into `[min, max]`.
    pub fn int_in(&self, key: &str, default: i64, min: i64, max: i64) -> i64 {
        self.number(key)
            .map(|v| (v.round() as i64).clamp(min, max))
            .unwrap_or(default)
    }

    /// Frame-count prop; negative or non-finite values fall back to `default`.
    pub fn frames_or(&self, key: &str, default: u32) -> u32 {
        match self.number(key) {
            Some(v) if v >= 0.0 => v.round().min(u32::MAX as f64) as u32,
            _ => default,
        }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            other => {
                debug!("prop '{key}' is not text: {other}");
                None
            }
        }
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(JsonValue::Bool(b)) => *b,
            Some(JsonValue::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
            Some(JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => default,
            },
            _ => default,
        }
    }

    pub fn color_or(&self, key: &str, default: Color) -> Color {
        match self.get(key) {
            Some(value) => Color::from_json(value).unwrap_or_else(|err| {
                debug!("prop '{key}' is not a color ({err}); using default");
                default
            }),
            None => default,
        }
    }

    /// List of strings. Accepts a JSON array (non-string entries are stringified) or a
    /// newline/comma separated string.
    pub fn text_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    JsonValue::String(s) => Some(s.clone()),
                    JsonValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(JsonValue::String(s)) => {
                let sep = if s.contains('\n') { '\n' } else { ',' };
                s.split(sep)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// 3-vector from `[x,y,z]` or `{x,y,z}`; missing components fall back per-axis.
    pub fn vec3_or(&self, key: &str, default: [f32; 3]) -> [f32; 3] {
        let mut out = default;
        match self.get(key) {
            Some(JsonValue::Array(items)) => {
                for (slot, item) in out.iter_mut().zip(items.iter()) {
                    if let Some(v) = to_number(item) {
                        *slot = v as f32;
                    }
                }
            }
            Some(JsonValue::Object(obj)) => {
                for (slot, axis) in out.iter_mut().zip(["x", "y", "z"]) {
                    if let Some(v) = obj.get(axis).and_then(to_number) {
                        *slot = v as f32;
                    }
                }
            }
            _ => {}
        }
        out
    }
}

impl FromIterator<(String, JsonValue)> for Props {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        Props(iter.into_iter().collect())
    }
}

/// Coerce a JSON value into a finite number.
/// Rules:
/// - Number -> its value
/// - Bool -> 1.0 / 0.0
/// - String -> parsed after trimming (thousands separators removed)
/// - anything else -> None
pub fn to_number(v: &JsonValue) -> Option<f64> {
    let n = match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
