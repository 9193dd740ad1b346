use hashbrown::HashMap;
use montage_api_core::Props;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{MontageError, Result};
use crate::ids::{IdAllocator, TrackId};
use crate::scheduler::{TemplateRef, Timeline, TimelineSettings, Track};
use crate::template::TemplateKind;

/// Parse a stored project (see fixtures/timelines/*.json) into a [`Timeline`].
///
/// Notes:
/// - Settings may be given at the top level, under `settings`, or as `{fps, canvas: {width, height}}`.
/// - Tracks are ordered by `position` when every track has one, otherwise by array order.
///   Stored `startFrame` values are ignored; placement is recomputed.
/// - Tracks without an id receive fresh ids after all explicit ids are observed.
/// - Unknown template ids are kept and render nothing.
/// - Durations must be positive integers.
pub fn parse_project_json(s: &str) -> Result<Timeline> {
    let sp: StoredProject = serde_json::from_str(s)?;
    let settings = sp.settings();

    let mut stored = sp.tracks;
    if stored.iter().all(|t| t.position.is_some()) {
        stored.sort_by_key(|t| t.position);
    }

    let mut ids = IdAllocator::new();
    for st in &stored {
        if let Some(id) = st.id {
            ids.observe(TrackId(id));
        }
    }

    let mut tracks = Vec::with_capacity(stored.len());
    for st in stored {
        let id = st.id.map(TrackId).unwrap_or_else(|| ids.alloc_track());
        let duration = to_duration(id, &st.duration)?;
        let template = match TemplateKind::from_id(&st.template_id) {
            Some(kind) => TemplateRef::Known(kind),
            None => TemplateRef::Unknown(st.template_id),
        };
        let mut track = Track::new(id, template, duration).with_props(st.template_props);
        track.slots = st.slots;
        tracks.push(track);
    }

    Timeline::from_tracks(settings, tracks)
}

fn to_duration(id: TrackId, raw: &JsonValue) -> Result<u32> {
    let invalid = |frames: i64| MontageError::InvalidDuration {
        track: Some(id),
        frames,
    };
    let value = raw.as_f64().ok_or_else(|| MontageError::Parse {
        reason: format!("track {id:?}: duration is not a number: {raw}"),
    })?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(MontageError::Parse {
            reason: format!("track {id:?}: duration must be a whole frame count, got {value}"),
        });
    }
    if value < 1.0 || value > u32::MAX as f64 {
        return Err(invalid(value as i64));
    }
    Ok(value as u32)
}

// ---------- Raw serde structs ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProject {
    #[serde(default)]
    settings: Option<StoredSettings>,
    #[serde(flatten)]
    inline: StoredSettings,
    #[serde(default)]
    tracks: Vec<StoredTrack>,
}

impl StoredProject {
    /// Nested `settings` win over top-level fields, which win over defaults.
    fn settings(&self) -> TimelineSettings {
        let defaults = TimelineSettings::default();
        let pick = |field: fn(&StoredSettings) -> Option<u32>| {
            self.settings
                .as_ref()
                .and_then(field)
                .or_else(|| field(&self.inline))
        };
        TimelineSettings {
            fps: pick(|s| s.fps).unwrap_or(defaults.fps),
            width: pick(|s| s.width.or(s.canvas.map(|c| c.width))).unwrap_or(defaults.width),
            height: pick(|s| s.height.or(s.canvas.map(|c| c.height))).unwrap_or(defaults.height),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    fps: Option<u32>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    canvas: Option<StoredCanvas>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
struct StoredCanvas {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTrack {
    #[serde(default)]
    id: Option<u32>,
    template_id: String,
    duration: JsonValue,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    template_props: Props,
    #[serde(default, alias = "assets")]
    slots: HashMap<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_position_and_repositions() {
        let json = r#"{
            "settings": {"fps": 24, "canvas": {"width": 1280, "height": 720}},
            "tracks": [
                {"id": 7, "templateId": "counter", "duration": 60, "position": 1, "startFrame": 999},
                {"templateId": "fade-in", "duration": 30, "position": 0, "slots": {"text": "Hi"}}
            ]
        }"#;
        let tl = parse_project_json(json).unwrap();
        assert_eq!(tl.settings.fps, 24);
        assert_eq!(tl.settings.width, 1280);
        let tracks = tl.tracks();
        assert_eq!(tracks[0].template.id(), "fade-in");
        assert_eq!(tracks[0].id, TrackId(8));
        assert_eq!(tracks[1].id, TrackId(7));
        assert_eq!(tracks[1].start_frame, 30);
        assert_eq!(tl.total_duration(), 90);
    }

    #[test]
    fn keeps_unknown_templates() {
        let json = r#"{"tracks": [{"templateId": "confetti", "duration": 10}]}"#;
        let tl = parse_project_json(json).unwrap();
        assert_eq!(
            tl.tracks()[0].template,
            TemplateRef::Unknown("confetti".into())
        );
    }

    #[test]
    fn rejects_bad_durations() {
        let zero = r#"{"tracks": [{"id": 1, "templateId": "counter", "duration": 0}]}"#;
        assert!(matches!(
            parse_project_json(zero),
            Err(MontageError::InvalidDuration { frames: 0, .. })
        ));
        let fractional = r#"{"tracks": [{"templateId": "counter", "duration": 12.5}]}"#;
        assert!(matches!(
            parse_project_json(fractional),
            Err(MontageError::Parse { .. })
        ));
        assert!(matches!(
            parse_project_json("{not json"),
            Err(MontageError::Parse { .. })
        ));
    }
}
