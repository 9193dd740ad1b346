use approx::assert_abs_diff_eq;
use montage_core::camera::framing::{center_ray_hit, frustum_half_extents, safe_frame};
use montage_core::math::SeededRng;
use montage_core::{BackgroundPlane, CameraPose, FramingParams};

fn plane() -> BackgroundPlane {
    BackgroundPlane::new([0.5, -0.25, -2.0], 8.0, 4.5)
}

fn params() -> FramingParams {
    FramingParams {
        aspect: 16.0 / 9.0,
        margin: 0.1,
        min_fov_deg: 12.0,
    }
}

fn random_pose(rng: &mut SeededRng, plane_z: f32) -> CameraPose {
    CameraPose {
        position: [
            rng.range(-6.0, 6.0),
            rng.range(-4.0, 4.0),
            plane_z + rng.range(1.0, 25.0),
        ],
        target: [rng.range(-9.0, 9.0), rng.range(-5.0, 5.0), plane_z + rng.range(-1.0, 0.5)],
        fov_deg: rng.range(5.0, 110.0),
    }
}

#[test]
fn framed_frustum_stays_inside_the_plane() {
    let plane = plane();
    let params = params();
    let mut rng = SeededRng::new(42);
    let mut floor_hits = 0;
    for _ in 0..2_000 {
        let pose = random_pose(&mut rng, plane.center[2]);
        let result = safe_frame(&pose, &plane, &params);
        let out = result.pose;

        assert!(out.fov_deg <= pose.fov_deg + 1e-4, "fov only narrows");
        if result.floor_hit {
            floor_hits += 1;
            assert_abs_diff_eq!(out.fov_deg, pose.fov_deg.min(params.min_fov_deg), epsilon = 1e-5);
            continue;
        }

        let distance = out.position[2] - plane.center[2];
        let (hw, hh) = frustum_half_extents(out.fov_deg, distance, params.aspect);
        let hit = center_ray_hit(&out, plane.center[2]);
        let eps = 1e-3;
        assert!(
            (hit[0] - plane.center[0]).abs() + hw <= plane.half_width - params.margin + eps,
            "x overflow: {pose:?} -> {out:?}"
        );
        assert!(
            (hit[1] - plane.center[1]).abs() + hh <= plane.half_height - params.margin + eps,
            "y overflow: {pose:?} -> {out:?}"
        );
        // Lateral clamping translates position and target together.
        let dir_in = [
            pose.target[0] - pose.position[0],
            pose.target[1] - pose.position[1],
        ];
        let dir_out = [
            out.target[0] - out.position[0],
            out.target[1] - out.position[1],
        ];
        assert_abs_diff_eq!(dir_in[0], dir_out[0], epsilon = 1e-3);
        assert_abs_diff_eq!(dir_in[1], dir_out[1], epsilon = 1e-3);
    }
    assert!(floor_hits < 2_000);
}

#[test]
fn framing_is_stable_on_already_safe_poses() {
    let plane = plane();
    let params = params();
    let mut rng = SeededRng::new(7);
    for _ in 0..500 {
        let once = safe_frame(&random_pose(&mut rng, plane.center[2]), &plane, &params);
        if once.floor_hit {
            continue;
        }
        let twice = safe_frame(&once.pose, &plane, &params).pose;
        for axis in 0..3 {
            assert_abs_diff_eq!(once.pose.position[axis], twice.position[axis], epsilon = 1e-3);
            assert_abs_diff_eq!(once.pose.target[axis], twice.target[axis], epsilon = 1e-3);
        }
        assert_abs_diff_eq!(once.pose.fov_deg, twice.fov_deg, epsilon = 1e-3);
    }
}

#[test]
fn tiny_plane_reports_the_fov_floor() {
    let plane = BackgroundPlane::new([0.0, 0.0, 0.0], 0.5, 0.3);
    let pose = CameraPose {
        position: [0.0, 0.0, 20.0],
        target: [0.0, 0.0, 0.0],
        fov_deg: 50.0,
    };
    let result = safe_frame(&pose, &plane, &params());
    assert!(result.floor_hit);
    assert!(result.fov_clamped);
    assert_eq!(result.pose.fov_deg, 12.0);
}
