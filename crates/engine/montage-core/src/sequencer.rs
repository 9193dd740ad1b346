//! Segment sequencer: splits a track into sub-timelines (list items, text lines, digits).
//!
//! Timing is derived from the track duration, an item count and optional explicit overrides.
//! A lead-in (`intro`) and tail (`outro`) are reserved; the remaining frames are shared by the
//! segments. Starts never pass `duration - min_reveal_window`: when explicit per-item timing
//! would overflow the track, the segments are compressed instead of pushed off-screen.

use serde::{Deserialize, Serialize};

use crate::config::SequencerConfig;
use crate::easing::Easing;
use crate::math::clamp01;

/// How the free frames are divided between segments.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    /// `count - 1` gaps: the last segment starts right as the outro begins.
    #[default]
    Between,
    /// `count` equal slots: every segment gets a full slot before the outro.
    Each,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequencerParams {
    pub duration: u32,
    pub count: u32,
    pub spacing: Spacing,
    /// Explicit frames per segment; derived from the free frames when `None`.
    pub per_item: Option<u32>,
    pub intro: Option<u32>,
    pub outro: Option<u32>,
}

impl SequencerParams {
    pub fn new(duration: u32, count: u32) -> Self {
        Self {
            duration,
            count,
            spacing: Spacing::Between,
            per_item: None,
            intro: None,
            outro: None,
        }
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn per_item(mut self, frames: Option<u32>) -> Self {
        self.per_item = frames;
        self
    }

    pub fn intro(mut self, frames: Option<u32>) -> Self {
        self.intro = frames;
        self
    }

    pub fn outro(mut self, frames: Option<u32>) -> Self {
        self.outro = frames;
        self
    }
}

/// Ephemeral view of the active sub-timeline at one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// Frames since this segment started (0 before the first start).
    pub local_frame: u32,
    /// Linear progress through the segment's span, in `[0, 1]`.
    pub progress: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentTiming {
    pub duration: u32,
    pub count: usize,
    /// Reserved lead-in after capping.
    pub intro: u32,
    pub outro: u32,
    /// Nominal frames per segment.
    pub per_item: u32,
    /// Start of the first segment (the intro, pulled earlier if needed to fit every segment).
    first: u32,
    /// Actual distance between starts; below `per_item` when compressed.
    step: f64,
    compressed: bool,
}

impl SegmentTiming {
    pub fn derive(params: &SequencerParams, cfg: &SequencerConfig) -> Self {
        let d = params.duration.max(1);
        let n = params.count.max(1);

        let max_intro = ((d as f32 * cfg.max_intro_fraction).floor() as u32).min(d);
        let intro = params
            .intro
            .unwrap_or_else(|| (d as f32 * cfg.intro_fraction).round() as u32)
            .min(max_intro);
        let outro = params
            .outro
            .unwrap_or_else(|| (d as f32 * cfg.outro_fraction).round() as u32)
            .min(d.saturating_sub(intro));

        let divisor = match params.spacing {
            Spacing::Between => (n - 1).max(1),
            Spacing::Each => n,
        };
        let free = d.saturating_sub(intro + outro);
        let per_item = match params.per_item {
            Some(explicit) => explicit.max(1),
            None => (free / divisor).max(cfg.min_item_frames).max(1),
        };

        // Latest frame any segment may start on, kept wide enough for `n` distinct starts.
        let limit = d
            .saturating_sub(cfg.min_reveal_window)
            .max((n - 1).min(d - 1))
            .min(d - 1);
        let first = intro.min(limit.saturating_sub(n - 1));
        let last_uncompressed = first as u64 + (n as u64 - 1) * per_item as u64;

        let (step, compressed) = if last_uncompressed <= limit as u64 {
            (per_item as f64, false)
        } else {
            ((limit - first) as f64 / (n - 1) as f64, true)
        };

        Self {
            duration: d,
            count: n as usize,
            intro,
            outro,
            per_item,
            first,
            step,
            compressed,
        }
    }

    /// True when explicit timing had to be squeezed to fit the track.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Frames between consecutive starts (rounded down, at least 1).
    pub fn effective_per_item(&self) -> u32 {
        (self.step.floor() as u32).max(1)
    }

    pub fn start_of(&self, index: usize) -> u32 {
        let i = index.min(self.count - 1);
        self.first + (i as f64 * self.step).floor() as u32
    }

    pub fn starts(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.count).map(|i| self.start_of(i))
    }

    /// Span of segment `index`: distance to the next start. The last segment gets one step,
    /// cut short by the end of the track.
    pub fn span_of(&self, index: usize) -> u32 {
        if index + 1 < self.count {
            self.start_of(index + 1) - self.start_of(index)
        } else {
            let remaining = self.duration.saturating_sub(self.start_of(index));
            self.effective_per_item().min(remaining).max(1)
        }
    }

    /// Active segment at `local_frame`. Before the first start this is segment 0 at progress 0;
    /// past the last span the last segment holds at progress 1.
    pub fn active(&self, local_frame: u32) -> Segment {
        if local_frame < self.first {
            return Segment {
                index: 0,
                local_frame: 0,
                progress: 0.0,
            };
        }
        let index = if self.compressed {
            (0..self.count)
                .rposition(|i| self.start_of(i) <= local_frame)
                .unwrap_or(0)
        } else {
            (((local_frame - self.first) / self.per_item) as usize).min(self.count - 1)
        };
        let local = local_frame - self.start_of(index);
        let span = self.span_of(index).max(1);
        Segment {
            index,
            local_frame: local,
            progress: clamp01(local as f32 / span as f32),
        }
    }

    /// Eased progress of item `index` revealing over `window` frames from its start.
    /// Stays at 1 once revealed, so earlier items remain on screen.
    pub fn reveal_progress(&self, local_frame: u32, index: usize, window: u32, easing: Easing) -> f32 {
        let start = self.start_of(index);
        if local_frame < start {
            return 0.0;
        }
        let window = window.max(1);
        easing.apply((local_frame - start) as f32 / window as f32)
    }
}

/// State of one counter digit while the displayed value moves through its decimal place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DigitFlip {
    pub from: u8,
    pub to: u8,
    /// 0 shows `from`, 1 shows `to`.
    pub progress: f32,
}

/// Flip state of the digit at decimal `place` (0 = ones) for a displayed `value`.
///
/// Each digit holds still for most of its cycle and only flips during the last
/// `flip_fraction` of it, so higher places flip rarely and briefly.
pub fn digit_flip(value: f64, place: u32, flip_fraction: f32) -> DigitFlip {
    let v = if value.is_finite() { value.abs() } else { 0.0 };
    let scaled = v / 10f64.powi(place as i32);
    let whole = scaled.floor();
    let phase = (scaled - whole) as f32;
    let from = (whole % 10.0) as u8;
    let to = (from + 1) % 10;
    let window = flip_fraction.clamp(f32::EPSILON, 1.0);
    let progress = clamp01((phase - (1.0 - window)) / window);
    DigitFlip { from, to, progress }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SequencerConfig {
        SequencerConfig::default()
    }

    #[test]
    fn intro_is_capped() {
        let t = SegmentTiming::derive(&SequencerParams::new(100, 3).intro(Some(80)), &cfg());
        assert_eq!(t.intro, 25);
    }

    #[test]
    fn oversized_intro_fractions_stay_inside_the_track() {
        let wild = SequencerConfig {
            intro_fraction: 1.5,
            max_intro_fraction: 2.0,
            outro_fraction: 3.0,
            ..cfg()
        };
        let t = SegmentTiming::derive(&SequencerParams::new(60, 4), &wild);
        assert_eq!(t.intro, 60);
        assert_eq!(t.outro, 0);
        for i in 0..4 {
            assert!(t.start_of(i) < 60);
        }
        assert_eq!(t.active(59).index, 3);
    }

    #[test]
    fn derived_timing_uses_floor() {
        let t = SegmentTiming::derive(&SequencerParams::new(100, 20), &cfg());
        // The free frames give under 8 per item, so the floor applies and the starts are squeezed.
        assert_eq!(t.per_item, 8);
        assert!(t.is_compressed());
        assert!(t.start_of(19) <= 100 - 12);
    }

    #[test]
    fn each_spacing_divides_by_count() {
        let p = SequencerParams::new(400, 5)
            .intro(Some(24))
            .outro(Some(18))
            .spacing(Spacing::Each);
        let t = SegmentTiming::derive(&p, &cfg());
        assert_eq!(t.per_item, 71);
    }

    #[test]
    fn last_segment_holds_at_full_progress() {
        let p = SequencerParams::new(120, 2)
            .intro(Some(0))
            .per_item(Some(30))
            .spacing(Spacing::Each);
        let t = SegmentTiming::derive(&p, &cfg());
        assert!(!t.is_compressed());
        let seg = t.active(100);
        assert_eq!(seg.index, 1);
        assert_eq!(seg.progress, 1.0);
    }

    #[test]
    fn digit_flips_only_near_the_end_of_its_cycle() {
        let hold = digit_flip(12.5, 0, 0.15);
        assert_eq!((hold.from, hold.to, hold.progress), (2, 3, 0.0));
        let mid = digit_flip(12.925, 0, 0.15);
        assert!((mid.progress - 0.5).abs() < 1e-3);
        let tens = digit_flip(19.0, 1, 0.15);
        assert_eq!(tens.from, 1);
        assert!(tens.progress > 0.0);
    }
}
