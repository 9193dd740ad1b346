use montage_core::{
    bake_frames, parse_project_json, Config, Engine, FrameState, Host, MontageError, TemplateKind,
    TemplateRef, TrackId,
};

fn load(name: &str) -> Engine {
    let json = montage_test_fixtures::projects::json(name).expect("load project fixture");
    let timeline = parse_project_json(&json).expect("parse project fixture");
    Engine::new(Config::default(), timeline).expect("engine")
}

#[test]
fn fixture_totals_match_the_manifest() {
    for name in montage_test_fixtures::projects::keys() {
        let engine = load(&name);
        if let Some(expected) = montage_test_fixtures::projects::total_frames(&name).unwrap() {
            assert_eq!(engine.total_duration(), expected, "{name}");
        }
        // Contiguous placement regardless of stored start frames.
        let mut next = 0;
        for track in engine.timeline().tracks() {
            assert_eq!(track.start_frame, next, "{name}");
            next += track.duration;
        }
    }
}

#[test]
fn every_fixture_frame_evaluates_without_panicking() {
    let host = Host::default();
    for name in montage_test_fixtures::projects::keys() {
        let engine = load(&name);
        let baked = bake_frames(&engine, 0..engine.total_duration(), &host);
        assert_eq!(baked.len() as u32, engine.total_duration());
        for frame in &baked.frames {
            let Some(root) = &frame.root else { continue };
            for node in root.walk() {
                assert!(node.opacity.is_finite() && (0.0..=1.0).contains(&node.opacity));
                for v in node.transform.translation {
                    assert!(v.is_finite(), "{name} frame {}: {}", frame.frame, node.id);
                }
            }
        }
    }
}

#[test]
fn explainer_renders_each_template_in_turn() {
    let engine = load("explainer");
    let host = Host::default();
    let kinds: Vec<_> = engine
        .timeline()
        .tracks()
        .iter()
        .map(|t| t.template.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(TemplateKind::FadeIn),
            Some(TemplateKind::Counter),
            Some(TemplateKind::BarChart),
            Some(TemplateKind::KineticText),
        ]
    );
    for (frame, root_id) in [(30, "fade-in"), (120, "counter"), (260, "bar-chart"), (330, "kinetic-text")] {
        let out = engine.render_frame(frame, &mut FrameState::new(), &host);
        assert_eq!(out.root.as_ref().map(|r| r.id.as_str()), Some(root_id), "frame {frame}");
    }

    // Counter lands on the stored value by the end of its count.
    let out = engine.render_frame(149, &mut FrameState::new(), &host);
    let root = out.root.unwrap();
    let digits: String = root
        .walk()
        .filter(|n| n.id.starts_with("counter/digit/") && n.id.ends_with("/from"))
        .filter_map(|n| n.text_content())
        .collect();
    assert_eq!(digits, "12480");
}

#[test]
fn showcase_keeps_unknown_templates_and_drives_the_camera() {
    let engine = load("showcase");
    let host = Host::default();
    let last = engine.timeline().tracks().last().unwrap();
    assert_eq!(last.template, TemplateRef::Unknown("confetti".into()));

    let mut state = FrameState::new();
    let mut cameras = 0;
    for frame in 0..240 {
        let out = engine.render_frame(frame, &mut state, &host);
        assert_eq!(out.track, Some(TrackId(10)));
        if out.camera().is_some() {
            cameras += 1;
        }
    }
    assert_eq!(cameras, 240);
    assert!(engine.render_frame(400, &mut state, &host).is_empty());
}

#[test]
fn unordered_project_is_sorted_by_position() {
    let engine = load("unordered");
    let settings = engine.timeline().settings;
    assert_eq!((settings.fps, settings.width, settings.height), (24, 1080, 1920));
    assert_eq!(engine.fps(), 24);
    assert_eq!(engine.timeline().frame_to_seconds(48), 2.0);
    assert_eq!(bake_frames(&engine, 0..24, &Host::default()).fps, 24);
    let order: Vec<_> = engine
        .timeline()
        .tracks()
        .iter()
        .map(|t| (t.id, t.template.id().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            (TrackId(0), "slide-in".to_string()),
            (TrackId(1), "timeline-reveal".to_string()),
            (TrackId(2), "mind-map".to_string()),
        ]
    );
}

#[test]
fn vertical_config_fixture_decodes_over_defaults() {
    let json = montage_test_fixtures::configs::json("vertical").unwrap();
    let cfg = Config::from_json_str(&json).unwrap();
    assert_eq!(cfg.fps, 24);
    assert_eq!(cfg.canvas.height, 1920);
    assert_eq!(cfg.sequencer.min_item_frames, 6);
    assert_eq!(cfg.sequencer.min_reveal_window, 12);
    assert!(cfg.canvas.aspect() < 1.0);
}

#[test]
fn invalid_projects_surface_typed_errors() {
    let err = parse_project_json(r#"{"tracks":[{"id":3,"templateId":"fade-in","duration":-4}]}"#)
        .unwrap_err();
    assert_eq!(
        err,
        MontageError::InvalidDuration {
            track: Some(TrackId(3)),
            frames: -4
        }
    );
    let dup = r#"{"tracks":[
        {"id":1,"templateId":"fade-in","duration":4},
        {"id":1,"templateId":"counter","duration":4}
    ]}"#;
    assert!(matches!(parse_project_json(dup), Err(MontageError::Parse { .. })));
}
