//! Safe framing: keep a background plane's edges out of frame.
//!
//! The plane is axis-aligned, faces +z and sits at `center[2]`. The camera looks toward it
//! from `position[2] > center[2]`. First the camera is translated laterally so the point where
//! its center ray meets the plane leaves room for the frustum; if the plane is too small for
//! the requested field of view even when centered, the fov is narrowed (never widened) down
//! to a floor.

use log::debug;
use montage_api_core::CameraPose;
use serde::{Deserialize, Serialize};

const MIN_DISTANCE: f32 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPlane {
    pub center: [f32; 3],
    pub half_width: f32,
    pub half_height: f32,
}

impl BackgroundPlane {
    pub fn new(center: [f32; 3], half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width: half_width.max(0.0),
            half_height: half_height.max(0.0),
        }
    }

    /// Plane sized to cover `cover_fov_deg` at `distance` with some bleed, keeping `aspect`.
    pub fn covering(center: [f32; 3], distance: f32, cover_fov_deg: f32, aspect: f32, bleed: f32) -> Self {
        let hh = (cover_fov_deg.to_radians() * 0.5).tan() * distance * bleed.max(1.0);
        Self::new(center, hh * aspect, hh)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramingParams {
    pub aspect: f32,
    pub margin: f32,
    pub min_fov_deg: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramingResult {
    pub pose: CameraPose,
    pub lateral_clamped: bool,
    pub fov_clamped: bool,
    /// The fov needed to fit was below the floor; the plane edge may be visible.
    pub floor_hit: bool,
}

/// Frustum half extents `(half_width, half_height)` at `distance`.
#[inline]
pub fn frustum_half_extents(fov_deg: f32, distance: f32, aspect: f32) -> (f32, f32) {
    let hh = (fov_deg.to_radians() * 0.5).tan() * distance;
    (hh * aspect, hh)
}

/// Where the camera's center ray meets the plane `z = plane_z`, as `(x, y)`.
/// Falls back to the camera's own `(x, y)` when the ray runs parallel to or away from the plane.
pub fn center_ray_hit(pose: &CameraPose, plane_z: f32) -> [f32; 2] {
    let [px, py, pz] = pose.position;
    let dir = [
        pose.target[0] - px,
        pose.target[1] - py,
        pose.target[2] - pz,
    ];
    if dir[2] >= -f32::EPSILON {
        return [px, py];
    }
    let s = (plane_z - pz) / dir[2];
    [px + s * dir[0], py + s * dir[1]]
}

/// Largest fov (degrees) whose frustum fits inside the given half extents at `distance`.
pub fn max_fov_for(avail_half_width: f32, avail_half_height: f32, distance: f32, aspect: f32) -> f32 {
    if avail_half_width <= 0.0 || avail_half_height <= 0.0 || distance <= 0.0 {
        return 0.0;
    }
    let by_height = 2.0 * (avail_half_height / distance).atan();
    let by_width = 2.0 * (avail_half_width / (distance * aspect.max(f32::EPSILON))).atan();
    by_height.min(by_width).to_degrees()
}

/// Clamp `pose` so the frustum stays inside `plane` minus `margin`.
pub fn safe_frame(pose: &CameraPose, plane: &BackgroundPlane, params: &FramingParams) -> FramingResult {
    let mut out = *pose;
    let distance = pose.position[2] - plane.center[2];
    if distance < MIN_DISTANCE {
        debug!("safe framing skipped: camera is not in front of the plane (d={distance})");
        return FramingResult {
            pose: out,
            lateral_clamped: false,
            fov_clamped: false,
            floor_hit: false,
        };
    }

    let (hw, hh) = frustum_half_extents(pose.fov_deg, distance, params.aspect);
    let hit = center_ray_hit(pose, plane.center[2]);
    let extents = [plane.half_width - params.margin, plane.half_height - params.margin];
    let frustum = [hw, hh];

    let mut lateral_clamped = false;
    let mut offsets = [0.0f32; 2];
    for axis in 0..2 {
        let offset = hit[axis] - plane.center[axis];
        let room = extents[axis] - frustum[axis];
        let clamped = if room >= 0.0 {
            offset.clamp(-room, room)
        } else {
            0.0
        };
        if clamped != offset {
            let shift = clamped - offset;
            out.position[axis] += shift;
            out.target[axis] += shift;
            lateral_clamped = true;
        }
        offsets[axis] = clamped;
    }

    let avail_w = extents[0] - offsets[0].abs();
    let avail_h = extents[1] - offsets[1].abs();
    let fov_max = max_fov_for(avail_w, avail_h, distance, params.aspect);
    let mut fov_clamped = false;
    let mut floor_hit = false;
    if out.fov_deg > fov_max {
        fov_clamped = true;
        if fov_max < params.min_fov_deg {
            floor_hit = true;
            out.fov_deg = out.fov_deg.min(params.min_fov_deg);
        } else {
            out.fov_deg = fov_max;
        }
    }

    FramingResult {
        pose: out,
        lateral_clamped,
        fov_clamped,
        floor_hit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FramingParams {
        FramingParams {
            aspect: 16.0 / 9.0,
            margin: 0.1,
            min_fov_deg: 10.0,
        }
    }

    #[test]
    fn centered_camera_inside_big_plane_is_untouched() {
        let plane = BackgroundPlane::new([0.0, 0.0, 0.0], 20.0, 12.0);
        let pose = CameraPose::default();
        let r = safe_frame(&pose, &plane, &params());
        assert_eq!(r.pose, pose);
        assert!(!r.lateral_clamped && !r.fov_clamped);
    }

    #[test]
    fn look_at_offset_is_pulled_back() {
        let plane = BackgroundPlane::new([0.0, 0.0, 0.0], 8.0, 5.0);
        let pose = CameraPose {
            position: [0.0, 0.0, 5.0],
            target: [6.0, 0.0, 0.0],
            fov_deg: 40.0,
        };
        let r = safe_frame(&pose, &plane, &params());
        assert!(r.lateral_clamped);
        let hit = center_ray_hit(&r.pose, 0.0);
        let (hw, _) = frustum_half_extents(r.pose.fov_deg, 5.0, params().aspect);
        assert!(hit[0] + hw + 0.1 <= 8.0 + 1e-4);
        // Look direction is preserved.
        assert!((r.pose.target[0] - r.pose.position[0] - 6.0).abs() < 1e-5);
    }

    #[test]
    fn small_plane_narrows_fov_but_never_widens() {
        let plane = BackgroundPlane::new([0.0, 0.0, 0.0], 3.0, 2.0);
        let pose = CameraPose {
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 50.0,
        };
        let r = safe_frame(&pose, &plane, &params());
        assert!(r.fov_clamped && !r.floor_hit);
        assert!(r.pose.fov_deg < 50.0);
        let narrow = CameraPose { fov_deg: 5.0, ..pose };
        assert_eq!(safe_frame(&narrow, &plane, &params()).pose.fov_deg, 5.0);
    }

    #[test]
    fn floor_is_reported() {
        let plane = BackgroundPlane::new([0.0, 0.0, 0.0], 0.3, 0.2);
        let r = safe_frame(&CameraPose::default(), &plane, &params());
        assert!(r.floor_hit);
        assert_eq!(r.pose.fov_deg, 10.0);
    }
}
