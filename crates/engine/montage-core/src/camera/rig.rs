//! Motion channels summed into a target camera pose.
//!
//! Channels: slow drift, orbit around the look-at point (phase supplied already damped),
//! dolly/truck across each segment, handheld sway, and short kicks at segment starts keyed to
//! the segment's transition effect. Every channel is a pure function of local time and the
//! active segment.

use std::f32::consts::{PI, TAU};

use montage_api_core::{CameraPose, Props};
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::easing::{ease_in_out_sine, ease_out_cubic, ease_out_expo};
use crate::math::{clamp01, smooth_noise};
use crate::sequencer::Segment;

/// Transition effect that kicks the camera when a segment begins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KickEffect {
    #[default]
    None,
    PunchZoom,
    WhipPan,
    Shake,
    Settle,
}

impl KickEffect {
    pub fn from_name(name: &str) -> Option<KickEffect> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Some(match key.as_str() {
            "none" | "" => KickEffect::None,
            "punchzoom" | "punch" | "zoom" => KickEffect::PunchZoom,
            "whippan" | "whip" => KickEffect::WhipPan,
            "shake" => KickEffect::Shake,
            "settle" => KickEffect::Settle,
            _ => return None,
        })
    }
}

/// Per-track rig tuning, read from template props.
#[derive(Clone, Debug, PartialEq)]
pub struct RigParams {
    /// Resting pose; saved camera props override the default framing.
    pub base: CameraPose,
    pub drift_amplitude: f32,
    pub drift_period_s: f32,
    /// Orbit advance per segment (radians).
    pub orbit_step: f32,
    pub dolly_amount: f32,
    pub truck_amount: f32,
    pub handheld_amplitude: f32,
    pub handheld_frequency: f32,
    pub kick_strength: f32,
    pub kick_frames: u32,
    pub seed: u32,
}

impl RigParams {
    pub fn from_props(props: &Props, cfg: &CameraConfig, look_at: [f32; 3]) -> Self {
        let default_position = [look_at[0], look_at[1], look_at[2] + cfg.base_distance];
        let base = CameraPose {
            position: props.vec3_or("cameraPosition", default_position),
            target: props.vec3_or("cameraTarget", look_at),
            fov_deg: props.number_in("cameraFov", cfg.base_fov_deg as f64, 5.0, 120.0) as f32,
        };
        Self {
            base,
            drift_amplitude: props.number_in("driftAmplitude", 0.25, 0.0, 5.0) as f32,
            drift_period_s: props.number_in("driftPeriod", 9.0, 0.5, 120.0) as f32,
            orbit_step: (props.number_in("orbitDegrees", 8.0, -90.0, 90.0) as f32).to_radians(),
            dolly_amount: props.number_in("dolly", 1.2, -10.0, 10.0) as f32,
            truck_amount: props.number_in("truck", 0.6, -10.0, 10.0) as f32,
            handheld_amplitude: props.number_in("handheld", 0.04, 0.0, 1.0) as f32,
            handheld_frequency: props.number_in("handheldFrequency", 1.0, 0.05, 10.0) as f32,
            kick_strength: props.number_in("kickStrength", 1.0, 0.0, 3.0) as f32,
            kick_frames: props.frames_or("kickFrames", 18).max(1),
            seed: props.number_or("seed", 7.0) as u32,
        }
    }

    /// Orbit phase the rig steers toward while `segment_index` is active.
    pub fn orbit_target(&self, segment_index: usize) -> f32 {
        let direction = if segment_index % 2 == 0 { 1.0 } else { -1.0 };
        direction * self.orbit_step * 0.5 + segment_index as f32 * self.orbit_step * 0.25
    }
}

/// Per-frame inputs to the rig.
#[derive(Copy, Clone, Debug)]
pub struct RigInput {
    /// Seconds since the track started.
    pub time: f32,
    pub segment: Segment,
    pub effect: KickEffect,
}

/// Offsets applied on top of the composed pose by a kick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct KickOffset {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_deg: f32,
}

/// Kick contribution `local_frame` frames into a segment.
pub fn kick(effect: KickEffect, local_frame: u32, params: &RigParams, time: f32, segment_index: usize) -> KickOffset {
    let k = local_frame as f32 / params.kick_frames as f32;
    if k >= 1.0 || params.kick_strength == 0.0 {
        return KickOffset::default();
    }
    let s = params.kick_strength;
    let side = if segment_index % 2 == 0 { 1.0 } else { -1.0 };
    let mut out = KickOffset::default();
    match effect {
        KickEffect::None => {}
        KickEffect::PunchZoom => {
            let envelope = (PI * ease_out_cubic(k)).sin();
            out.fov_deg = -8.0 * s * envelope;
            out.position[2] = -0.6 * s * envelope;
        }
        KickEffect::WhipPan => {
            let remaining = 1.0 - ease_out_expo(k);
            out.target[0] = side * 1.5 * s * remaining;
            out.position[0] = side * 0.4 * s * remaining;
        }
        KickEffect::Shake => {
            // Trauma model: intensity is the square of a decaying trauma.
            let trauma = 1.0 - k;
            let intensity = trauma * trauma * 0.25 * s;
            let seed = params.seed.wrapping_add(101 + segment_index as u32 * 7);
            for axis in 0..2 {
                out.position[axis] = intensity * smooth_noise(time, seed.wrapping_add(axis as u32 * 3), 9.0);
            }
            out.target[0] = intensity * 0.5 * smooth_noise(time, seed.wrapping_add(11), 9.0);
        }
        KickEffect::Settle => {
            let wobble = (-4.0 * k).exp() * (3.0 * PI * k).cos() * (1.0 - k);
            out.position[1] = 0.35 * s * wobble;
            out.fov_deg = 2.0 * s * wobble;
        }
    }
    out
}

/// Compose the target pose for one frame. `orbit_phase` is the damped phase.
pub fn compose(params: &RigParams, input: &RigInput, orbit_phase: f32) -> CameraPose {
    let base = params.base;
    let look = base.target;
    let t = input.time;
    let seg = input.segment;

    // Orbit about the look-at point in the horizontal plane.
    let rel = [
        base.position[0] - look[0],
        base.position[1] - look[1],
        base.position[2] - look[2],
    ];
    let (sin, cos) = orbit_phase.sin_cos();
    let mut position = [
        look[0] + rel[0] * cos + rel[2] * sin,
        base.position[1],
        look[2] - rel[0] * sin + rel[2] * cos,
    ];
    let mut target = look;
    let mut fov = base.fov_deg;

    // Drift.
    let period = params.drift_period_s.max(0.5);
    let dx = params.drift_amplitude * (TAU * t / period).sin();
    let dy = params.drift_amplitude * 0.5 * (TAU * t / (period * 1.3) + 1.1).sin();
    position[0] += dx;
    position[1] += dy;
    target[0] += dx * 0.5;
    target[1] += dy * 0.5;

    // Dolly in across the segment, truck sideways alternating per segment.
    let eased = ease_in_out_sine(clamp01(seg.progress));
    let side = if seg.index % 2 == 0 { 1.0 } else { -1.0 };
    position[2] -= params.dolly_amount * eased;
    let truck = side * params.truck_amount * (eased - 0.5);
    position[0] += truck;
    target[0] += truck;

    // Handheld sway.
    let amp = params.handheld_amplitude;
    let freq = params.handheld_frequency;
    for axis in 0..3 {
        let n = smooth_noise(t, params.seed.wrapping_add(axis as u32 * 17), freq);
        position[axis] += amp * n;
        if axis < 2 {
            target[axis] += amp * 0.5 * n;
        }
    }

    let k = kick(input.effect, seg.local_frame, params, t, seg.index);
    for axis in 0..3 {
        position[axis] += k.position[axis];
        target[axis] += k.target[axis];
    }
    fov += k.fov_deg;

    CameraPose {
        position,
        target,
        fov_deg: fov.clamp(1.0, 170.0),
    }
}
