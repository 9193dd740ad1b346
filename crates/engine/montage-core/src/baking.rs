//! Baking API: evaluate a contiguous frame range into a list of scene frames.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, FrameState, Host, SceneFrame};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakedSequence {
    pub fps: u32,
    /// First global frame of the bake.
    pub start: u32,
    pub frames: Vec<SceneFrame>,
}

impl BakedSequence {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, global: u32) -> Option<&SceneFrame> {
        let idx = global.checked_sub(self.start)? as usize;
        self.frames.get(idx)
    }
}

/// Bake `range` (clamped to the timeline) in increasing frame order, starting from a fresh
/// [`FrameState`] so camera damping is the same as live playback from `range.start`.
pub fn bake_frames(engine: &Engine, range: Range<u32>, host: &Host<'_>) -> BakedSequence {
    let end = range.end.min(engine.total_duration());
    let start = range.start.min(end);
    let mut state = FrameState::new();
    let frames = (start..end)
        .map(|frame| engine.render_frame(frame, &mut state, host))
        .collect();
    BakedSequence {
        fps: engine.fps(),
        start,
        frames,
    }
}
