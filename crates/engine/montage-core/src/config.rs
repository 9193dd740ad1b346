//! Engine configuration.
//!
//! Every section has working defaults so hosts can decode a partial JSON document and only
//! override what they care about. The sequencer and camera constants are tuned values, kept
//! here rather than hard-coded into templates.

use serde::{Deserialize, Serialize};

use crate::error::{MontageError, Result};
use crate::scheduler::TimelineSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Clock for timelines created from this config. A loaded timeline keeps its own.
    pub fps: u32,
    pub canvas: Canvas,
    pub sequencer: SequencerConfig,
    pub camera: CameraConfig,
    pub pool: PoolConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            canvas: Canvas::default(),
            sequencer: SequencerConfig::default(),
            camera: CameraConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Auto-timing defaults for the segment sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencerConfig {
    /// Lead-in reserved before the first segment, as a fraction of the track duration.
    pub intro_fraction: f32,
    /// Upper bound for any intro, explicit or derived, as a fraction of the duration.
    pub max_intro_fraction: f32,
    /// Tail reserved after the last segment starts, as a fraction of the duration.
    pub outro_fraction: f32,
    /// Minimum frames per segment.
    pub min_item_frames: u32,
    /// No segment may start later than `duration - min_reveal_window`.
    pub min_reveal_window: u32,
    /// Fraction of a digit's decimal cycle spent flipping.
    pub digit_flip_fraction: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            intro_fraction: 0.06,
            max_intro_fraction: 0.25,
            outro_fraction: 0.045,
            min_item_frames: 8,
            min_reveal_window: 12,
            digit_flip_fraction: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Damping rates (1/s) for the smoothed pose.
    pub position_lambda: f32,
    pub target_lambda: f32,
    pub fov_lambda: f32,
    /// Damping rate for the orbit phase when the active segment changes.
    pub orbit_lambda: f32,
    /// Resting field of view in degrees.
    pub base_fov_deg: f32,
    /// Resting camera distance from the background plane.
    pub base_distance: f32,
    /// World-space z of the background plane.
    pub plane_z: f32,
    /// Margin kept between the frustum and the plane edges (world units).
    pub safe_margin: f32,
    /// Safe framing never narrows the fov below this.
    pub min_fov_deg: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position_lambda: 4.0,
            target_lambda: 5.0,
            fov_lambda: 3.0,
            orbit_lambda: 2.5,
            base_fov_deg: 50.0,
            base_distance: 10.0,
            plane_z: 0.0,
            safe_margin: 0.1,
            min_fov_deg: 12.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolConfig {
    /// Idle (zero-reference) entries kept after a sweep.
    pub idle_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { idle_capacity: 16 }
    }
}

impl Config {
    /// Decode a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(MontageError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.fps == 0 {
            return invalid("fps must be positive");
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas size must be positive");
        }
        let s = &self.sequencer;
        for (name, v) in [
            ("sequencer.introFraction", s.intro_fraction),
            ("sequencer.maxIntroFraction", s.max_intro_fraction),
            ("sequencer.outroFraction", s.outro_fraction),
            ("sequencer.digitFlipFraction", s.digit_flip_fraction),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(MontageError::InvalidConfig {
                    reason: format!("{name} must lie in [0, 1], got {v}"),
                });
            }
        }
        let c = &self.camera;
        if !(c.min_fov_deg > 0.0 && c.min_fov_deg < 180.0) {
            return invalid("camera.minFovDeg must lie in (0, 180)");
        }
        if !(c.base_fov_deg >= c.min_fov_deg && c.base_fov_deg < 180.0) {
            return invalid("camera.baseFovDeg must lie in [minFovDeg, 180)");
        }
        if !(c.base_distance > 0.0) || c.safe_margin < 0.0 {
            return invalid("camera.baseDistance must be positive and safeMargin non-negative");
        }
        Ok(())
    }

    /// Settings for a new timeline built under this config.
    pub fn timeline_settings(&self) -> TimelineSettings {
        TimelineSettings {
            fps: self.fps,
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{"fps": 60, "sequencer": {"minItemFrames": 4}}"#)
            .expect("config");
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.sequencer.min_item_frames, 4);
        assert_eq!(cfg.sequencer.min_reveal_window, 12);
        assert_eq!(cfg.canvas.width, 1920);
        let settings = cfg.timeline_settings();
        assert_eq!((settings.fps, settings.width, settings.height), (60, 1920, 1080));
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn rejects_zero_fps_and_bad_fractions() {
        assert!(Config::from_json_str(r#"{"fps": 0}"#).is_err());
        let err = Config::from_json_str(r#"{"sequencer": {"introFraction": 1.5}}"#).unwrap_err();
        assert!(err.to_string().contains("introFraction"));
    }
}
