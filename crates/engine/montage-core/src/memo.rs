//! Memoized text measurement.
//!
//! Layouts that depend on text width (kinetic text, mind-map nodes) look widths up here by a
//! stable element id. An entry is recomputed whenever its content or font size changes, so the
//! cached value is always the one a fresh measurement would produce and evaluating frames out
//! of order gives the same layout.

use hashbrown::HashMap;

/// Host text shaping.
pub trait TextMeasurer {
    /// Rendered width of `text` at `font_size`, in the same units as the font size.
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character. Used when the host has no shaping engine.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasurer {
    /// Advance per character as a fraction of the font size.
    pub advance: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance
    }
}

#[derive(Clone, Debug)]
struct Entry {
    content: String,
    font_size: f32,
    width: f32,
}

#[derive(Clone, Debug, Default)]
pub struct MeasureArena {
    entries: HashMap<String, Entry>,
    misses: u64,
}

impl MeasureArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measure(
        &mut self,
        element_id: &str,
        text: &str,
        font_size: f32,
        measurer: &dyn TextMeasurer,
    ) -> f32 {
        if let Some(entry) = self.entries.get(element_id) {
            if entry.content == text && entry.font_size == font_size {
                return entry.width;
            }
        }
        self.misses += 1;
        let width = measurer.measure(text, font_size);
        self.entries.insert(
            element_id.to_string(),
            Entry {
                content: text.to_string(),
                font_size,
                width,
            },
        );
        width
    }

    pub fn invalidate(&mut self, element_id: &str) {
        self.entries.remove(element_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of measurements that reached the measurer.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_until_content_or_size_changes() {
        let m = MonospaceMeasurer::default();
        let mut arena = MeasureArena::new();
        let w = arena.measure("t0", "hello", 10.0, &m);
        assert!((w - 30.0).abs() < 1e-4);
        arena.measure("t0", "hello", 10.0, &m);
        assert_eq!(arena.misses(), 1);
        arena.measure("t0", "hello!", 10.0, &m);
        arena.measure("t0", "hello!", 12.0, &m);
        assert_eq!(arena.misses(), 3);
        arena.invalidate("t0");
        assert!(arena.is_empty());
    }
}
