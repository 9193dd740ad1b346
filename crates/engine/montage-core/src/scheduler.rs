//! Track scheduling: which track is active at a global frame, and contiguous placement.
//!
//! Tracks are laid end to end: after every edit, `start_frame` of each track equals the sum of
//! the durations before it, so there are never gaps or overlaps and at most one track is
//! active at any frame.

use hashbrown::HashMap;
use log::trace;
use montage_api_core::Props;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{MontageError, Result};
use crate::ids::{IdAllocator, TrackId};
use crate::template::TemplateKind;

/// Template reference as stored on a track. Ids that are not part of the closed template set
/// survive decoding and simply render nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Known(TemplateKind),
    Unknown(String),
}

impl TemplateRef {
    pub fn kind(&self) -> Option<TemplateKind> {
        match self {
            TemplateRef::Known(kind) => Some(*kind),
            TemplateRef::Unknown(_) => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TemplateRef::Known(kind) => kind.id(),
            TemplateRef::Unknown(id) => id,
        }
    }
}

impl From<TemplateKind> for TemplateRef {
    fn from(kind: TemplateKind) -> Self {
        TemplateRef::Known(kind)
    }
}

/// One scheduled template instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    #[serde(rename = "templateId")]
    pub template: TemplateRef,
    #[serde(default)]
    pub start_frame: u32,
    pub duration: u32,
    #[serde(default, rename = "templateProps")]
    pub props: Props,
    /// Stored slot inputs (upload ids, literals) awaiting resolution.
    #[serde(default)]
    pub slots: HashMap<String, JsonValue>,
    #[serde(default)]
    pub position: usize,
}

impl Track {
    pub fn new(id: TrackId, template: impl Into<TemplateRef>, duration: u32) -> Self {
        Self {
            id,
            template: template.into(),
            start_frame: 0,
            duration,
            props: Props::new(),
            slots: HashMap::new(),
            position: 0,
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>, stored: impl Into<JsonValue>) -> Self {
        self.slots.insert(slot.into(), stored.into());
        self
    }

    /// Exclusive end frame.
    #[inline]
    pub fn end_frame(&self) -> u32 {
        self.start_frame.saturating_add(self.duration)
    }

    #[inline]
    pub fn contains(&self, frame: u32) -> bool {
        self.start_frame <= frame && frame < self.end_frame()
    }
}

/// Active track at a global frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Located<'a> {
    pub track: &'a Track,
    pub local_frame: u32,
}

/// Find the track active at `frame`. `None` for an empty timeline or a frame past the end.
pub fn locate(frame: u32, tracks: &[Track]) -> Option<Located<'_>> {
    let track = tracks.iter().find(|t| t.contains(frame))?;
    let local_frame = frame - track.start_frame;
    trace!("frame {frame} -> track {:?} local {local_frame}", track.id);
    Some(Located { track, local_frame })
}

/// Recompute `start_frame` and `position` as running sums in slice order.
pub fn reposition(tracks: &mut [Track]) {
    let mut cursor = 0u32;
    for (i, track) in tracks.iter_mut().enumerate() {
        track.start_frame = cursor;
        track.position = i;
        cursor = cursor.saturating_add(track.duration);
    }
}

/// Return the tracks in `new_order`, repositioned. Every other field is preserved.
pub fn reorder(tracks: &[Track], new_order: &[TrackId]) -> Result<Vec<Track>> {
    if new_order.len() != tracks.len() {
        return Err(MontageError::InvalidOrder {
            reason: format!("expected {} ids, got {}", tracks.len(), new_order.len()),
        });
    }
    let mut taken = vec![false; tracks.len()];
    let mut out = Vec::with_capacity(tracks.len());
    for id in new_order {
        let idx = tracks
            .iter()
            .position(|t| t.id == *id)
            .ok_or(MontageError::TrackNotFound(*id))?;
        if std::mem::replace(&mut taken[idx], true) {
            return Err(MontageError::InvalidOrder {
                reason: format!("track {id:?} listed twice"),
            });
        }
        out.push(tracks[idx].clone());
    }
    reposition(&mut out);
    Ok(out)
}

/// Sum of all track durations.
pub fn total_duration(tracks: &[Track]) -> u32 {
    tracks.iter().fold(0u32, |acc, t| acc.saturating_add(t.duration))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1920,
            height: 1080,
        }
    }
}

impl TimelineSettings {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Seconds per frame.
    #[inline]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Ordered tracks plus global settings. All mutators keep placement contiguous.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    pub settings: TimelineSettings,
    tracks: Vec<Track>,
    ids: IdAllocator,
}

impl Timeline {
    pub fn new(settings: TimelineSettings) -> Self {
        Self {
            settings,
            tracks: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Build from already-decoded tracks, validating durations and repositioning.
    pub fn from_tracks(settings: TimelineSettings, mut tracks: Vec<Track>) -> Result<Self> {
        let mut ids = IdAllocator::new();
        for track in &tracks {
            check_duration(Some(track.id), track.duration as i64)?;
            if tracks.iter().filter(|t| t.id == track.id).count() > 1 {
                return Err(MontageError::Parse {
                    reason: format!("duplicate track id {:?}", track.id),
                });
            }
            ids.observe(track.id);
        }
        reposition(&mut tracks);
        Ok(Self {
            settings,
            tracks,
            ids,
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Append a new track for `template`, returning its id.
    pub fn push(&mut self, template: impl Into<TemplateRef>, duration: u32, props: Props) -> Result<TrackId> {
        check_duration(None, duration as i64)?;
        let id = self.ids.alloc_track();
        self.tracks
            .push(Track::new(id, template, duration).with_props(props));
        reposition(&mut self.tracks);
        Ok(id)
    }

    /// Insert a pre-built track at `index` (clamped to the end). A fresh id is assigned when
    /// the track's id is already taken.
    pub fn insert(&mut self, index: usize, mut track: Track) -> Result<TrackId> {
        check_duration(Some(track.id), track.duration as i64)?;
        if self.track(track.id).is_some() {
            track.id = self.ids.alloc_track();
        } else {
            self.ids.observe(track.id);
        }
        let id = track.id;
        let index = index.min(self.tracks.len());
        self.tracks.insert(index, track);
        reposition(&mut self.tracks);
        Ok(id)
    }

    pub fn remove(&mut self, id: TrackId) -> Result<Track> {
        let idx = self.index_of(id)?;
        let removed = self.tracks.remove(idx);
        reposition(&mut self.tracks);
        Ok(removed)
    }

    pub fn set_duration(&mut self, id: TrackId, frames: u32) -> Result<()> {
        check_duration(Some(id), frames as i64)?;
        let idx = self.index_of(id)?;
        self.tracks[idx].duration = frames;
        reposition(&mut self.tracks);
        Ok(())
    }

    /// Move a track to `to_index` (clamped), shifting the others.
    pub fn move_track(&mut self, id: TrackId, to_index: usize) -> Result<()> {
        let from = self.index_of(id)?;
        let track = self.tracks.remove(from);
        let to = to_index.min(self.tracks.len());
        self.tracks.insert(to, track);
        reposition(&mut self.tracks);
        Ok(())
    }

    pub fn reorder(&mut self, new_order: &[TrackId]) -> Result<()> {
        self.tracks = reorder(&self.tracks, new_order)?;
        Ok(())
    }

    /// Replace a track's props.
    pub fn set_props(&mut self, id: TrackId, props: Props) -> Result<()> {
        let idx = self.index_of(id)?;
        self.tracks[idx].props = props;
        Ok(())
    }

    /// Layer `props` over a track's existing props.
    pub fn merge_props(&mut self, id: TrackId, props: &Props) -> Result<()> {
        let idx = self.index_of(id)?;
        let merged = props.merged_over(&self.tracks[idx].props);
        self.tracks[idx].props = merged;
        Ok(())
    }

    pub fn set_slot(&mut self, id: TrackId, slot: impl Into<String>, stored: JsonValue) -> Result<()> {
        let idx = self.index_of(id)?;
        self.tracks[idx].slots.insert(slot.into(), stored);
        Ok(())
    }

    pub fn locate(&self, frame: u32) -> Option<Located<'_>> {
        locate(frame, &self.tracks)
    }

    pub fn total_duration(&self) -> u32 {
        total_duration(&self.tracks)
    }

    /// Clamp a playback frame to the last valid frame (0 for an empty timeline).
    pub fn clamp_frame(&self, frame: u32) -> u32 {
        frame.min(self.total_duration().saturating_sub(1))
    }

    pub fn frame_to_seconds(&self, frame: u32) -> f32 {
        frame as f32 / self.settings.fps.max(1) as f32
    }

    fn index_of(&self, id: TrackId) -> Result<usize> {
        self.tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(MontageError::TrackNotFound(id))
    }
}

fn check_duration(track: Option<TrackId>, frames: i64) -> Result<()> {
    if frames <= 0 {
        return Err(MontageError::InvalidDuration { track, frames });
    }
    Ok(())
}
