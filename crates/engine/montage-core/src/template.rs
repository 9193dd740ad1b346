//! Template evaluation contract and the closed set of template kinds.
//!
//! A template is a pure function of [`RenderProps`] plus the explicitly threaded
//! [`EvalContext`]: the same inputs always give the same scene, and any frame may be evaluated
//! without evaluating the frames before it. The camera state in the context is the one
//! deliberate exception, used only by templates that drive the camera rig.

use montage_api_core::{AssetDescriptor, Color, DataTable, Props, ResolvedAssets, SceneNode};
use serde::{Deserialize, Serialize};

use crate::assets::MediaLookup;
use crate::camera::CameraState;
use crate::config::Config;
use crate::easing::Easing;
use crate::ids::TrackId;
use crate::memo::{MeasureArena, TextMeasurer};
use crate::scheduler::TimelineSettings;
use crate::sequencer::{SegmentTiming, SequencerParams, Spacing};
use crate::templates::{
    bar_chart::BarChart, counter::Counter, fade::FadeIn, kinetic_text::KineticText,
    list_reveal::ListReveal, media_showcase::MediaShowcase, mind_map::MindMap, slide::SlideIn,
    timeline_reveal::TimelineReveal,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    FadeIn,
    SlideIn,
    Counter,
    BarChart,
    KineticText,
    TimelineReveal,
    MindMap,
    ListReveal,
    MediaShowcase,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 9] = [
        TemplateKind::FadeIn,
        TemplateKind::SlideIn,
        TemplateKind::Counter,
        TemplateKind::BarChart,
        TemplateKind::KineticText,
        TemplateKind::TimelineReveal,
        TemplateKind::MindMap,
        TemplateKind::ListReveal,
        TemplateKind::MediaShowcase,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::FadeIn => "fade-in",
            TemplateKind::SlideIn => "slide-in",
            TemplateKind::Counter => "counter",
            TemplateKind::BarChart => "bar-chart",
            TemplateKind::KineticText => "kinetic-text",
            TemplateKind::TimelineReveal => "timeline-reveal",
            TemplateKind::MindMap => "mind-map",
            TemplateKind::ListReveal => "list-reveal",
            TemplateKind::MediaShowcase => "media-showcase",
        }
    }

    pub fn from_id(id: &str) -> Option<TemplateKind> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn descriptor(self) -> TemplateDescriptor {
        match self {
            TemplateKind::FadeIn => describe::<FadeIn>(),
            TemplateKind::SlideIn => describe::<SlideIn>(),
            TemplateKind::Counter => describe::<Counter>(),
            TemplateKind::BarChart => describe::<BarChart>(),
            TemplateKind::KineticText => describe::<KineticText>(),
            TemplateKind::TimelineReveal => describe::<TimelineReveal>(),
            TemplateKind::MindMap => describe::<MindMap>(),
            TemplateKind::ListReveal => describe::<ListReveal>(),
            TemplateKind::MediaShowcase => describe::<MediaShowcase>(),
        }
    }

    /// Evaluate this template. `input.props` should already be layered over the defaults.
    pub fn evaluate(self, input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        match self {
            TemplateKind::FadeIn => FadeIn::evaluate(input, cx),
            TemplateKind::SlideIn => SlideIn::evaluate(input, cx),
            TemplateKind::Counter => Counter::evaluate(input, cx),
            TemplateKind::BarChart => BarChart::evaluate(input, cx),
            TemplateKind::KineticText => KineticText::evaluate(input, cx),
            TemplateKind::TimelineReveal => TimelineReveal::evaluate(input, cx),
            TemplateKind::MindMap => MindMap::evaluate(input, cx),
            TemplateKind::ListReveal => ListReveal::evaluate(input, cx),
            TemplateKind::MediaShowcase => MediaShowcase::evaluate(input, cx),
        }
    }

    /// True when evaluation reads or advances the camera state.
    pub fn uses_camera(self) -> bool {
        matches!(self, TemplateKind::MediaShowcase)
    }
}

/// Shared capability of every template kind.
pub trait Template {
    const KIND: TemplateKind;
    const NAME: &'static str;

    fn slots() -> Vec<SlotDefinition>;
    fn default_props() -> Props;
    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode>;
}

fn describe<T: Template>() -> TemplateDescriptor {
    TemplateDescriptor {
        kind: T::KIND,
        name: T::NAME,
        slots: T::slots(),
        default_props: T::default_props(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotType {
    File,
    Text,
    Number,
    DataTable,
    Color,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub slot_type: SlotType,
    pub required: bool,
}

impl SlotDefinition {
    pub fn new(id: &'static str, slot_type: SlotType) -> Self {
        Self {
            id,
            label: id,
            slot_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

/// Immutable description of a template: ordered slots and default props.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub kind: TemplateKind,
    pub name: &'static str,
    pub slots: Vec<SlotDefinition>,
    pub default_props: Props,
}

impl TemplateDescriptor {
    pub fn slot(&self, id: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// First required slot with no resolved value.
    pub fn missing_required(&self, assets: &ResolvedAssets) -> Option<&SlotDefinition> {
        self.slots
            .iter()
            .find(|s| s.required && !assets.contains_key(s.id))
    }

    /// Track props layered over this template's defaults.
    pub fn effective_props(&self, props: &Props) -> Props {
        props.merged_over(&self.default_props)
    }
}

/// Inputs for one evaluation. Built fresh per frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderProps<'a> {
    /// Frame local to the track, 0-based.
    pub frame: u32,
    pub duration: u32,
    pub assets: &'a ResolvedAssets,
    pub props: &'a Props,
}

impl<'a> RenderProps<'a> {
    pub fn text(&self, slot: &str) -> Option<&'a str> {
        self.assets.get(slot).and_then(|v| v.as_text())
    }

    pub fn number(&self, slot: &str) -> Option<f64> {
        self.assets.get(slot).and_then(|v| v.as_number())
    }

    pub fn table(&self, slot: &str) -> Option<&'a DataTable> {
        self.assets.get(slot).and_then(|v| v.as_table())
    }

    pub fn asset(&self, slot: &str) -> Option<&'a AssetDescriptor> {
        self.assets.get(slot).and_then(|v| v.as_asset())
    }

    /// Slot color, then prop color, then `default`.
    pub fn color(&self, slot: &str, prop: &str, default: Color) -> Color {
        self.assets
            .get(slot)
            .and_then(|v| v.as_color())
            .unwrap_or_else(|| self.props.color_or(prop, default))
    }

    /// Text from the slot, falling back to a prop of the same meaning.
    pub fn text_or_prop(&self, slot: &str, prop: &str) -> Option<String> {
        self.text(slot)
            .map(str::to_string)
            .or_else(|| self.props.text(prop))
            .filter(|s| !s.trim().is_empty())
    }

    /// Non-empty lines from a text slot, or the prop list when the slot is empty.
    pub fn lines(&self, slot: &str, prop: &str) -> Vec<String> {
        match self.text(slot) {
            Some(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            None => self.props.text_list(prop),
        }
    }

    pub fn easing(&self, prop: &str, default: Easing) -> Easing {
        let easing = self
            .props
            .text(prop)
            .and_then(|name| Easing::from_name(&name))
            .unwrap_or(default);
        match easing {
            Easing::EaseOutBack { .. } => Easing::EaseOutBack {
                overshoot: self.props.number_in("overshoot", crate::easing::DEFAULT_OVERSHOOT as f64, 0.0, 10.0) as f32,
            },
            other => other,
        }
    }

    /// Seconds since the track started.
    pub fn time(&self, fps: u32) -> f32 {
        self.frame as f32 / fps.max(1) as f32
    }

    /// Sequencer timing for `count` segments using the common timing props
    /// (`introFrames`, `outroFrames`, `perItemFrames`).
    pub fn segments(&self, count: usize, spacing: Spacing, cx: &EvalContext<'_>) -> SegmentTiming {
        let explicit = |key: &str| self.props.contains(key).then(|| self.props.frames_or(key, 0));
        let params = SequencerParams::new(self.duration, count as u32)
            .spacing(spacing)
            .intro(explicit("introFrames"))
            .outro(explicit("outroFrames"))
            .per_item(explicit("perItemFrames").filter(|f| *f > 0));
        SegmentTiming::derive(&params, &cx.config.sequencer)
    }
}

/// Capabilities threaded through an evaluation.
pub struct EvalContext<'a> {
    pub config: &'a Config,
    /// Clock and canvas of the timeline being rendered.
    pub settings: TimelineSettings,
    pub track: TrackId,
    pub measure: &'a mut MeasureArena,
    pub measurer: &'a dyn TextMeasurer,
    pub media: &'a dyn MediaLookup,
    pub camera: &'a mut CameraState,
}

impl<'a> EvalContext<'a> {
    pub fn fps(&self) -> u32 {
        self.settings.fps.max(1)
    }

    pub fn aspect(&self) -> f32 {
        self.settings.aspect()
    }

    pub fn frame_dt(&self) -> f32 {
        self.settings.frame_dt()
    }

    /// Memoized text width for a stable element id.
    pub fn text_width(&mut self, element_id: &str, text: &str, font_size: f32) -> f32 {
        self.measure.measure(element_id, text, font_size, self.measurer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_id(kind.id()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
        assert_eq!(TemplateKind::from_id("confetti"), None);
    }

    #[test]
    fn descriptors_declare_ordered_slots() {
        for kind in TemplateKind::ALL {
            let d = kind.descriptor();
            assert_eq!(d.kind, kind);
            assert!(!d.slots.is_empty(), "{kind:?} has no slots");
            let mut ids: Vec<_> = d.slots.iter().map(|s| s.id).collect();
            ids.dedup();
            assert_eq!(ids.len(), d.slots.len());
        }
    }

    #[test]
    fn missing_required_slot_is_reported() {
        let d = TemplateKind::FadeIn.descriptor();
        let empty = ResolvedAssets::new();
        assert_eq!(d.missing_required(&empty).map(|s| s.id), Some("text"));
    }
}
