//! Frame engine: global frame → active track → resolved slots → template scene.
//!
//! `render_frame` never fails. Unknown templates, missing required slots and frames outside
//! the timeline all produce an empty [`SceneFrame`].

use hashbrown::HashMap;
use log::{debug, trace, warn};
use montage_api_core::{CameraPose, Props, SceneNode};
use serde::{Deserialize, Serialize};

use crate::assets::{resolve_slots, AssetResolver, LiteralResolver, MediaLookup, NoMedia};
use crate::camera::{CameraSnapshot, CameraState};
use crate::config::Config;
use crate::error::{MontageError, Result};
use crate::ids::TrackId;
use crate::memo::{MeasureArena, MonospaceMeasurer, TextMeasurer};
use crate::scheduler::Timeline;
use crate::template::{EvalContext, RenderProps, TemplateDescriptor, TemplateKind};

const DEFAULT_MEASURER: MonospaceMeasurer = MonospaceMeasurer { advance: 0.6 };

/// Host capabilities injected into evaluation.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub resolver: &'a dyn AssetResolver,
    pub media: &'a dyn MediaLookup,
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> Host<'a> {
    pub fn new(resolver: &'a dyn AssetResolver) -> Self {
        Self {
            resolver,
            media: &NoMedia,
            measurer: &DEFAULT_MEASURER,
        }
    }

    pub fn with_media(mut self, media: &'a dyn MediaLookup) -> Self {
        self.media = media;
        self
    }

    pub fn with_measurer(mut self, measurer: &'a dyn TextMeasurer) -> Self {
        self.measurer = measurer;
        self
    }
}

impl Default for Host<'static> {
    fn default() -> Self {
        Host::new(&LiteralResolver)
    }
}

/// Caller-owned state carried between frames: the damped camera and the measurement arena.
///
/// The camera continues only when frames arrive in order on the same track. Re-evaluating the
/// last frame starts again from the state that frame started from, so it is idempotent; any
/// other jump resets the camera.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    camera: CameraState,
    camera_before: CameraState,
    last: Option<(TrackId, u32)>,
    pub measure: MeasureArena,
}

impl FrameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the camera and the last frame (sequence restart). Cached measurements stay valid.
    pub fn reset(&mut self) {
        self.camera.reset();
        self.camera_before.reset();
        self.last = None;
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Track and local frame of the last evaluation.
    pub fn last_frame(&self) -> Option<(TrackId, u32)> {
        self.last
    }

    fn prepare_camera(&mut self, track: TrackId, local: u32) {
        match self.last {
            Some((t, l)) if t == track && l == local => {
                self.camera = self.camera_before.clone();
            }
            Some((t, l)) if t == track && l.checked_add(1) == Some(local) => {
                self.camera_before = self.camera.clone();
            }
            previous => {
                if previous.is_some() {
                    debug!("camera reset at track {track:?} frame {local}");
                }
                self.camera.reset();
                self.camera_before.reset();
            }
        }
        self.last = Some((track, local));
    }
}

/// Result of evaluating one global frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    pub frame: u32,
    pub track: Option<TrackId>,
    pub local_frame: u32,
    pub root: Option<SceneNode>,
}

impl SceneFrame {
    fn empty(frame: u32, track: Option<TrackId>, local_frame: u32) -> Self {
        Self {
            frame,
            track,
            local_frame,
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn camera(&self) -> Option<&CameraPose> {
        self.root.as_ref().and_then(SceneNode::camera_pose)
    }
}

type CameraHook = Box<dyn FnMut(TrackId, Props)>;

pub struct Engine {
    config: Config,
    timeline: Timeline,
    descriptors: HashMap<TemplateKind, TemplateDescriptor>,
    camera_hook: Option<CameraHook>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("timeline", &self.timeline)
            .field("camera_hook", &self.camera_hook.is_some())
            .finish()
    }
}

impl Engine {
    /// Build an engine over `timeline`. The config is validated here since every frame relies
    /// on its invariants; fps and canvas size come from the timeline's own settings.
    pub fn new(config: Config, timeline: Timeline) -> Result<Self> {
        config.validate()?;
        let settings = &timeline.settings;
        if settings.fps == 0 || settings.width == 0 || settings.height == 0 {
            return Err(MontageError::InvalidConfig {
                reason: format!(
                    "timeline settings must be positive, got {} fps at {}x{}",
                    settings.fps, settings.width, settings.height
                ),
            });
        }
        let descriptors = TemplateKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.descriptor()))
            .collect();
        Ok(Self {
            config,
            timeline,
            descriptors,
            camera_hook: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn descriptor(&self, kind: TemplateKind) -> Option<&TemplateDescriptor> {
        self.descriptors.get(&kind)
    }

    pub fn total_duration(&self) -> u32 {
        self.timeline.total_duration()
    }

    /// Frame rate of the timeline clock.
    pub fn fps(&self) -> u32 {
        self.timeline.settings.fps.max(1)
    }

    /// Evaluate global `frame`.
    pub fn render_frame(&self, frame: u32, state: &mut FrameState, host: &Host<'_>) -> SceneFrame {
        let Some(located) = self.timeline.locate(frame) else {
            trace!("frame {frame}: no active track");
            return SceneFrame::empty(frame, None, 0);
        };
        let track = located.track;
        let local = located.local_frame;
        state.prepare_camera(track.id, local);

        let Some(kind) = track.template.kind() else {
            warn!("track {:?}: unknown template '{}'", track.id, track.template.id());
            return SceneFrame::empty(frame, Some(track.id), local);
        };
        let Some(descriptor) = self.descriptors.get(&kind) else {
            return SceneFrame::empty(frame, Some(track.id), local);
        };

        let assets = resolve_slots(descriptor, track, host.resolver);
        if let Some(slot) = descriptor.missing_required(&assets) {
            warn!("track {:?}: required slot '{}' is unresolved", track.id, slot.id);
            return SceneFrame::empty(frame, Some(track.id), local);
        }
        let props = descriptor.effective_props(&track.props);
        let input = RenderProps {
            frame: local,
            duration: track.duration,
            assets: &assets,
            props: &props,
        };
        let mut cx = EvalContext {
            config: &self.config,
            settings: self.timeline.settings,
            track: track.id,
            measure: &mut state.measure,
            measurer: host.measurer,
            media: host.media,
            camera: &mut state.camera,
        };
        let root = kind.evaluate(&input, &mut cx);
        if root.is_none() {
            debug!("track {:?}: {} rendered nothing at frame {local}", track.id, kind.id());
        }
        SceneFrame {
            frame,
            track: Some(track.id),
            local_frame: local,
            root,
        }
    }

    /// Install the hook that receives camera snapshots as track props.
    pub fn set_camera_hook(&mut self, hook: impl FnMut(TrackId, Props) + 'static) {
        self.camera_hook = Some(Box::new(hook));
    }

    pub fn clear_camera_hook(&mut self) {
        self.camera_hook = None;
    }

    /// Snapshot the current damped camera as props for the last evaluated track and pass them
    /// to the hook. Returns `None` when no camera frame has been evaluated yet.
    pub fn save_camera(&mut self, state: &FrameState) -> Option<(TrackId, Props)> {
        let (track, _) = state.last_frame()?;
        let snapshot = CameraSnapshot::from_state(state.camera())?;
        let props = snapshot.to_props();
        if let Some(hook) = self.camera_hook.as_mut() {
            hook(track, props.clone());
        }
        Some((track, props))
    }
}
