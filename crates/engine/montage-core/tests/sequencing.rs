use approx::assert_relative_eq;
use montage_core::config::SequencerConfig;
use montage_core::easing::{ease_out_back, DEFAULT_OVERSHOOT};
use montage_core::math::SeededRng;
use montage_core::{Easing, SegmentTiming, SequencerParams, Spacing};

#[test]
fn every_easing_hits_its_endpoints() {
    for easing in Easing::ALL {
        assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1e-6);
        // Out-of-range input clamps.
        assert_relative_eq!(easing.apply(-3.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(easing.apply(7.0), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn ease_out_back_overshoots_before_settling() {
    let near_end = ease_out_back(0.9, 1.7);
    assert!(near_end > 1.0, "expected overshoot, got {near_end}");
    assert!(near_end < 1.1);
    assert_eq!(ease_out_back(1.0, 1.7), 1.0);
    assert_eq!(ease_out_back(1.0, DEFAULT_OVERSHOOT), 1.0);
}

#[test]
fn five_items_with_explicit_intro_and_outro() {
    let params = SequencerParams::new(400, 5)
        .intro(Some(24))
        .outro(Some(18));
    let timing = SegmentTiming::derive(&params, &SequencerConfig::default());
    assert_eq!(timing.per_item, 89);
    assert!(!timing.is_compressed());
    let seg = timing.active(300);
    assert_eq!(seg.index, 3);
    assert_eq!(seg.local_frame, 300 - 24 - 3 * 89);
}

#[test]
fn starts_stay_in_range_and_strictly_increase() {
    let cfg = SequencerConfig::default();
    let mut rng = SeededRng::new(0x5eed);
    for _ in 0..500 {
        let duration = rng.range(1.0, 900.0) as u32;
        let count = rng.range(1.0, 40.0) as u32;
        let spacing = if rng.next_f32() < 0.5 {
            Spacing::Between
        } else {
            Spacing::Each
        };
        let per_item = (rng.next_f32() < 0.3).then(|| rng.range(1.0, 120.0) as u32);
        let intro = (rng.next_f32() < 0.3).then(|| rng.range(0.0, 400.0) as u32);
        let params = SequencerParams::new(duration, count)
            .spacing(spacing)
            .per_item(per_item)
            .intro(intro);
        let timing = SegmentTiming::derive(&params, &cfg);
        let starts: Vec<u32> = timing.starts().collect();
        let latest = timing
            .duration
            .saturating_sub(cfg.min_reveal_window)
            .max(count.saturating_sub(1));
        for s in &starts {
            assert!(*s < timing.duration, "{params:?} -> {starts:?}");
            assert!(*s <= latest, "{params:?} -> {starts:?} (latest {latest})");
        }
        if count <= duration {
            for w in starts.windows(2) {
                assert!(w[0] < w[1], "{params:?} -> {starts:?}");
            }
        }
        assert!(timing.intro as f32 <= timing.duration as f32 * cfg.max_intro_fraction);

        // Active segment is consistent with the starts.
        for frame in 0..timing.duration {
            let seg = timing.active(frame);
            assert!(seg.index < timing.count);
            assert!((0.0..=1.0).contains(&seg.progress));
            if frame >= starts[0] {
                assert!(starts[seg.index] <= frame);
            }
        }
    }
}

#[test]
fn last_segment_holds_instead_of_wrapping() {
    let params = SequencerParams::new(300, 3)
        .spacing(Spacing::Each)
        .per_item(Some(30))
        .intro(Some(0));
    let timing = SegmentTiming::derive(&params, &SequencerConfig::default());
    let late = timing.active(250);
    assert_eq!(late.index, 2);
    assert_eq!(late.progress, 1.0);
}

#[test]
fn reveal_progress_is_monotonic_per_item() {
    let params = SequencerParams::new(240, 6).spacing(Spacing::Each);
    let timing = SegmentTiming::derive(&params, &SequencerConfig::default());
    for index in 0..6 {
        let mut prev = 0.0f32;
        for frame in 0..240 {
            let p = timing.reveal_progress(frame, index, 12, Easing::EaseOutCubic);
            assert!(p + 1e-6 >= prev);
            prev = p;
        }
        assert_relative_eq!(prev, 1.0, epsilon = 1e-6);
    }
}
