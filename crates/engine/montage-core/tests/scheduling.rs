use montage_core::{
    locate, reorder, reposition, Props, TemplateKind, Timeline, TimelineSettings, Track, TrackId,
};

fn mk_tracks(durations: &[u32]) -> Vec<Track> {
    let mut tracks: Vec<Track> = durations
        .iter()
        .enumerate()
        .map(|(i, d)| Track::new(TrackId(i as u32), TemplateKind::FadeIn, *d))
        .collect();
    reposition(&mut tracks);
    tracks
}

#[test]
fn locate_returns_local_frame_inside_single_track() {
    let tracks = mk_tracks(&[90]);
    let hit = locate(45, &tracks).expect("active track");
    assert_eq!(hit.track.id, TrackId(0));
    assert_eq!(hit.local_frame, 45);
    assert!(locate(90, &tracks).is_none());
}

#[test]
fn empty_timeline_has_no_active_track() {
    assert!(locate(0, &[]).is_none());
    let tl = Timeline::new(TimelineSettings::default());
    assert!(tl.locate(0).is_none());
    assert_eq!(tl.clamp_frame(500), 0);
}

#[test]
fn every_frame_maps_to_exactly_one_track() {
    let durations = [30, 1, 45, 12, 60];
    let tracks = mk_tracks(&durations);
    let total: u32 = durations.iter().sum();
    let mut prev: Option<(u32, u32)> = None;
    for frame in 0..total {
        let hit = locate(frame, &tracks).expect("frame inside timeline");
        let active = tracks.iter().filter(|t| t.contains(frame)).count();
        assert_eq!(active, 1, "frame {frame}");
        assert_eq!(hit.track.start_frame + hit.local_frame, frame);
        // Track order and local frames advance monotonically.
        if let Some((prev_id, prev_local)) = prev {
            if prev_id == hit.track.id.0 {
                assert_eq!(hit.local_frame, prev_local + 1);
            } else {
                assert_eq!(hit.track.id.0, prev_id + 1);
                assert_eq!(hit.local_frame, 0);
            }
        }
        prev = Some((hit.track.id.0, hit.local_frame));
    }
    assert!(locate(total, &tracks).is_none());
}

#[test]
fn reorder_recomputes_starts_and_keeps_fields() {
    let mut tracks = mk_tracks(&[10, 20, 30]);
    tracks[1].props = Props::new().with("fadeFrames", 4);
    let out = reorder(&tracks, &[TrackId(2), TrackId(0), TrackId(1)]).unwrap();
    let starts: Vec<_> = out.iter().map(|t| (t.id.0, t.start_frame)).collect();
    assert_eq!(starts, vec![(2, 0), (0, 30), (1, 40)]);
    assert_eq!(out[2].props.number_or("fadeFrames", 0.0), 4.0);
    // Source tracks are untouched.
    assert_eq!(tracks[2].start_frame, 30);
}

#[test]
fn reorder_rejects_non_permutations() {
    let tracks = mk_tracks(&[10, 20]);
    assert!(reorder(&tracks, &[TrackId(0)]).is_err());
    assert!(reorder(&tracks, &[TrackId(0), TrackId(0)]).is_err());
    assert!(reorder(&tracks, &[TrackId(0), TrackId(9)]).is_err());
}

#[test]
fn timeline_edits_keep_placement_contiguous() {
    let mut tl = Timeline::new(TimelineSettings::default());
    let a = tl.push(TemplateKind::FadeIn, 30, Props::new()).unwrap();
    let b = tl.push(TemplateKind::Counter, 60, Props::new()).unwrap();
    let c = tl.push(TemplateKind::SlideIn, 15, Props::new()).unwrap();
    assert_eq!(tl.total_duration(), 105);

    tl.set_duration(a, 10).unwrap();
    tl.move_track(c, 0).unwrap();
    tl.remove(b).unwrap();
    let starts: Vec<_> = tl.tracks().iter().map(|t| (t.id, t.start_frame)).collect();
    assert_eq!(starts, vec![(c, 0), (a, 15)]);
    assert_eq!(tl.total_duration(), 25);

    assert!(tl.set_duration(a, 0).is_err());
    assert!(tl.remove(b).is_err());
    assert_eq!(tl.clamp_frame(1_000), 24);
}
