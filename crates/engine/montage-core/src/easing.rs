//! Named easing curves.
//!
//! Every curve clamps its input into `[0, 1]` first and maps 0 to 0 and 1 to 1. Only
//! [`ease_out_back`] leaves `[0, 1]` in between.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::math::clamp01;

/// Default overshoot for [`ease_out_back`].
pub const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[inline]
pub fn linear(t: f32) -> f32 {
    clamp01(t)
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - clamp01(t);
    1.0 - u * u * u
}

#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// `1 - 2^(-10t)`, pinned to exactly 1 at `t = 1`.
#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    let t = clamp01(t);
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * t)
    }
}

/// Overshooting ease-out. Values above 1 appear shortly before `t = 1`.
#[inline]
pub fn ease_out_back(t: f32, overshoot: f32) -> f32 {
    let t = clamp01(t);
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c3 = overshoot + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u * u * u + overshoot * u * u
}

#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = clamp01(t);
    -((PI * t).cos() - 1.0) / 2.0
}

/// Easing selectable from template props.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutExpo,
    EaseOutBack {
        #[serde(default = "default_overshoot")]
        overshoot: f32,
    },
    EaseInOutSine,
}

fn default_overshoot() -> f32 {
    DEFAULT_OVERSHOOT
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => linear(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
            Easing::EaseOutExpo => ease_out_expo(t),
            Easing::EaseOutBack { overshoot } => ease_out_back(t, overshoot),
            Easing::EaseInOutSine => ease_in_out_sine(t),
        }
    }

    /// Parse a prop value such as `"easeOutBack"` or `"ease-out-cubic"`. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Easing> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Some(match key.as_str() {
            "linear" => Easing::Linear,
            "easeoutcubic" => Easing::EaseOutCubic,
            "easeinoutcubic" => Easing::EaseInOutCubic,
            "easeoutexpo" => Easing::EaseOutExpo,
            "easeoutback" | "back" => Easing::EaseOutBack {
                overshoot: DEFAULT_OVERSHOOT,
            },
            "easeinoutsine" => Easing::EaseInOutSine,
            _ => return None,
        })
    }

    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseOutExpo,
        Easing::EaseOutBack {
            overshoot: DEFAULT_OVERSHOOT,
        },
        Easing::EaseInOutSine,
    ];
}
