//! Montage Core (engine-agnostic)
//!
//! Frame-indexed motion graphics: a timeline of template tracks is evaluated at any global
//! frame into an abstract scene tree. This crate holds the scheduler, easing and segment
//! sequencing primitives, the closed template set, the procedural camera rig with its
//! safe-framing solver, and the engine/playback/baking entry points. Rendering, persistence
//! and asset storage belong to the host.

pub mod assets;
pub mod baking;
pub mod camera;
pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod ids;
pub mod math;
pub mod memo;
pub mod playback;
pub mod scheduler;
pub mod sequencer;
pub mod stored_project;
pub mod template;
pub mod templates;

// Re-exports for hosts
pub use assets::{
    resolve_slots, AssetResolver, LiteralResolver, MapResolver, MediaInfo, MediaLookup, NoMedia,
    ResourcePool,
};
pub use baking::{bake_frames, BakedSequence};
pub use camera::{
    BackgroundPlane, CameraOutput, CameraRig, CameraSnapshot, CameraState, FramingParams,
    FramingResult, KickEffect, RigInput, RigParams,
};
pub use config::{CameraConfig, Canvas, Config, PoolConfig, SequencerConfig};
pub use easing::Easing;
pub use engine::{Engine, FrameState, Host, SceneFrame};
pub use error::{MontageError, Result};
pub use ids::{IdAllocator, TrackId};
pub use memo::{MeasureArena, MonospaceMeasurer, TextMeasurer};
pub use playback::{LoopMode, PlaybackCommand, PlaybackDriver, PlaybackEvent, PlaybackState};
pub use scheduler::{locate, reorder, reposition, Located, TemplateRef, Timeline, TimelineSettings, Track};
pub use sequencer::{digit_flip, DigitFlip, Segment, SegmentTiming, SequencerParams, Spacing};
pub use stored_project::parse_project_json;
pub use template::{
    EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateDescriptor, TemplateKind,
};
pub use montage_api_core::{
    AssetDescriptor, AssetKind, CameraPose, Color, DataTable, NodeKind, Props, ResolvedAssets,
    SceneNode, SlotValue, Transform,
};
