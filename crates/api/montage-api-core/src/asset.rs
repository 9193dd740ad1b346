//! Resolved slot inputs handed to templates.
//!
//! Hosts store slot inputs however they like (upload ids, literal strings). Before a template is
//! evaluated, each stored value is resolved into a [`SlotValue`]; file slots resolve into an
//! [`AssetDescriptor`] whose `source_locator` names a handle in the host's resource pool.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::table::DataTable;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub id: String,
    pub kind: AssetKind,
    /// URL or pool key for image/video payloads.
    #[serde(default)]
    pub source_locator: Option<String>,
    /// Inline content for text assets.
    #[serde(default)]
    pub text_content: Option<String>,
}

impl AssetDescriptor {
    pub fn image(id: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Image,
            source_locator: Some(locator.into()),
            text_content: None,
        }
    }

    pub fn video(id: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Video,
            source_locator: Some(locator.into()),
            text_content: None,
        }
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Text,
            source_locator: None,
            text_content: Some(content.into()),
        }
    }
}

/// A resolved slot value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SlotValue {
    Asset(AssetDescriptor),
    Text(String),
    Number(f64),
    Table(DataTable),
    Color(Color),
}

impl SlotValue {
    /// Textual view: text slots, text assets and numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            SlotValue::Asset(AssetDescriptor {
                text_content: Some(s),
                ..
            }) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SlotValue::Number(n) => Some(*n),
            SlotValue::Text(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetDescriptor> {
        match self {
            SlotValue::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&DataTable> {
        match self {
            SlotValue::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            SlotValue::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// Slot id → resolved value. Absent keys mean "unresolved".
pub type ResolvedAssets = HashMap<String, SlotValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_view_covers_text_assets() {
        let v = SlotValue::Asset(AssetDescriptor::text("t1", "Hello"));
        assert_eq!(v.as_text(), Some("Hello"));
        assert_eq!(SlotValue::Number(3.0).as_text(), None);
    }

    #[test]
    fn numbers_parse_from_text_slots() {
        assert_eq!(SlotValue::Text(" 1,024 ".into()).as_number(), Some(1024.0));
        assert_eq!(SlotValue::Text("abc".into()).as_number(), None);
    }
}
