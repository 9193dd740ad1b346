//! `fade-in`: a single text block fading in (and optionally out).

use montage_api_core::{Color, Props, SceneNode, Transform};

use crate::easing::Easing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct FadeIn;

impl Template for FadeIn {
    const KIND: TemplateKind = TemplateKind::FadeIn;
    const NAME: &'static str = "Fade In";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("text", SlotType::Text).required().label("Text"),
            SlotDefinition::new("color", SlotType::Color).label("Text color"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("fadeFrames", 20)
            .with("fadeOut", true)
            .with("fontSize", 96)
            .with("color", "#ffffff")
            .with("easing", "easeOutCubic")
            .with("drift", 12)
    }

    fn evaluate(input: &RenderProps<'_>, _cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let text = input.text_or_prop("text", "text")?;
        let p = input.props;
        let fade = p.frames_or("fadeFrames", 20).min(input.duration / 2);
        let exit = if p.bool_or("fadeOut", true) { fade } else { 0 };
        let easing = input.easing("easing", Easing::EaseOutCubic);
        let opacity = envelope(input.frame, input.duration, fade, exit, easing);

        // Slight upward drift while fading in.
        let drift = p.number_in("drift", 12.0, 0.0, 200.0) as f32;
        let rise = if fade == 0 {
            1.0
        } else {
            easing.apply(input.frame as f32 / fade as f32)
        };
        let font_size = p.number_in("fontSize", 96.0, 4.0, 600.0) as f32;
        let color = input.color("color", "color", Color::WHITE);

        let label = SceneNode::text("fade-in/text", text, font_size, color)
            .with_transform(Transform::from_translation([0.0, -drift * (1.0 - rise), 0.0]))
            .with_opacity(opacity);
        Some(SceneNode::group("fade-in").with_child(label))
    }
}
