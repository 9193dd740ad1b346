//! Linear RGBA colors and the textual/JSON shapes they are authored in.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// RGBA color with components in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color string must start with '#': {0}")]
    MissingHash(String),
    #[error("color string has unsupported length {len}: {input}")]
    BadLength { input: String, len: usize },
    #[error("invalid hex digits in color: {0}")]
    BadDigits(String),
    #[error("unsupported color shape")]
    UnsupportedShape,
}

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const TRANSPARENT: Color = Color([0.0, 0.0, 0.0, 0.0]);

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color([r, g, b, a])
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    /// Copy of this color with its alpha multiplied by `factor`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        let [r, g, b, a] = self.0;
        Color([r, g, b, a * factor.clamp(0.0, 1.0)])
    }

    /// Component-wise blend towards `other`.
    pub fn mix(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0.0; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i] + (other.0[i] - self.0[i]) * t;
        }
        Color(out)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(trimmed.to_string()))?;
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            len => {
                return Err(ColorParseError::BadLength {
                    input: trimmed.to_string(),
                    len,
                })
            }
        };
        let mut bytes = [255u8; 4];
        for (i, chunk) in expanded.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ColorParseError::BadDigits(trimmed.to_string()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ColorParseError::BadDigits(trimmed.to_string()))?;
        }
        Ok(Color([
            bytes[0] as f32 / 255.0,
            bytes[1] as f32 / 255.0,
            bytes[2] as f32 / 255.0,
            bytes[3] as f32 / 255.0,
        ]))
    }

    /// Decode a color from the JSON shapes accepted in template props:
    /// hex strings, `{r,g,b[,a]}` in `0..1`, `{h,s,l}` in `0..1`, or a 3/4 element array.
    pub fn from_json(value: &JsonValue) -> Result<Self, ColorParseError> {
        match value {
            JsonValue::String(s) => Color::from_hex(s),
            JsonValue::Array(items) if items.len() == 3 || items.len() == 4 => {
                let mut out = [1.0f32; 4];
                for (slot, item) in out.iter_mut().zip(items.iter()) {
                    *slot = item.as_f64().ok_or(ColorParseError::UnsupportedShape)? as f32;
                }
                Ok(Color(out))
            }
            JsonValue::Object(obj) => {
                let get = |k: &str| obj.get(k).and_then(JsonValue::as_f64).map(|v| v as f32);
                if let (Some(r), Some(g), Some(b)) = (get("r"), get("g"), get("b")) {
                    return Ok(Color([r, g, b, get("a").unwrap_or(1.0)]));
                }
                if let (Some(h), Some(s), Some(l)) = (get("h"), get("s"), get("l")) {
                    let (r, g, b) = hsl_to_rgb(h, s, l);
                    return Ok(Color([r, g, b, get("a").unwrap_or(1.0)]));
                }
                Err(ColorParseError::UnsupportedShape)
            }
            _ => Err(ColorParseError::UnsupportedShape),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// HSL (0..1) to RGB (0..1)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = ((h % 1.0) + 1.0) % 1.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        let c = Color::from_hex("#ff000080").unwrap();
        assert_eq!(c.0[0], 1.0);
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            Color::from_hex("ffffff"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            Color::from_hex("#12345"),
            Err(ColorParseError::BadLength { len: 5, .. })
        ));
        assert!(matches!(
            Color::from_hex("#zzzzzz"),
            Err(ColorParseError::BadDigits(_))
        ));
    }

    #[test]
    fn decodes_object_shapes() {
        let rgb = Color::from_json(&json!({"r": 0.5, "g": 0.25, "b": 1.0})).unwrap();
        assert_eq!(rgb, Color([0.5, 0.25, 1.0, 1.0]));
        let grey = Color::from_json(&json!({"h": 0.3, "s": 0.0, "l": 0.4})).unwrap();
        assert_eq!(grey, Color([0.4, 0.4, 0.4, 1.0]));
    }
}
