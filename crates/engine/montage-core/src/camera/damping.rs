//! The camera's carried state and its per-frame damping step.

use montage_api_core::CameraPose;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::math::{damp, damp3};

/// Damped camera state carried between consecutive frames by the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub pose: CameraPose,
    /// Damped orbit phase (radians).
    pub orbit_phase: f32,
    /// False until the first frame snaps the state onto its target.
    pub primed: bool,
}

impl CameraState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Damping rates (1/s) for each channel of the camera state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DampingRates {
    pub position: f32,
    pub target: f32,
    pub fov: f32,
    pub orbit: f32,
}

impl From<&CameraConfig> for DampingRates {
    fn from(cfg: &CameraConfig) -> Self {
        Self {
            position: cfg.position_lambda,
            target: cfg.target_lambda,
            fov: cfg.fov_lambda,
            orbit: cfg.orbit_lambda,
        }
    }
}

/// Damp the orbit phase toward `target`. An unprimed state snaps.
pub fn advance_orbit(state: &CameraState, target: f32, rates: &DampingRates, dt: f32) -> f32 {
    if !state.primed {
        return target;
    }
    damp(state.orbit_phase, target, rates.orbit, dt)
}

/// One damping step of the pose toward `target`. An unprimed state snaps onto the target so
/// the first frame of a sequence never sweeps in from an arbitrary origin.
pub fn advance(state: &CameraState, target: &CameraPose, orbit_phase: f32, rates: &DampingRates, dt: f32) -> CameraState {
    if !state.primed {
        return CameraState {
            pose: *target,
            orbit_phase,
            primed: true,
        };
    }
    CameraState {
        pose: CameraPose {
            position: damp3(state.pose.position, target.position, rates.position, dt),
            target: damp3(state.pose.target, target.target, rates.target, dt),
            fov_deg: damp(state.pose.fov_deg, target.fov_deg, rates.fov, dt),
        },
        orbit_phase,
        primed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> DampingRates {
        DampingRates::from(&CameraConfig::default())
    }

    #[test]
    fn first_step_snaps() {
        let target = CameraPose {
            position: [1.0, 2.0, 3.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 40.0,
        };
        let next = advance(&CameraState::new(), &target, 0.5, &rates(), 1.0 / 30.0);
        assert_eq!(next.pose, target);
        assert!(next.primed);
    }

    #[test]
    fn later_steps_move_part_way() {
        let start = CameraState {
            pose: CameraPose::default(),
            orbit_phase: 0.0,
            primed: true,
        };
        let target = CameraPose {
            position: [4.0, 0.0, 10.0],
            ..CameraPose::default()
        };
        let next = advance(&start, &target, 0.0, &rates(), 1.0 / 30.0);
        assert!(next.pose.position[0] > 0.0 && next.pose.position[0] < 4.0);
        assert_eq!(next.pose.fov_deg, start.pose.fov_deg);
    }
}
