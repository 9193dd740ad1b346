//! `slide-in`: text sliding in from an edge with an overshooting ease.

use montage_api_core::{Color, Props, SceneNode, Transform};

use crate::easing::Easing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct SlideIn;

fn direction(name: &str) -> [f32; 2] {
    match name.trim().to_ascii_lowercase().as_str() {
        "right" => [1.0, 0.0],
        "up" | "top" => [0.0, 1.0],
        "down" | "bottom" => [0.0, -1.0],
        _ => [-1.0, 0.0],
    }
}

impl Template for SlideIn {
    const KIND: TemplateKind = TemplateKind::SlideIn;
    const NAME: &'static str = "Slide In";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("text", SlotType::Text).required().label("Text"),
            SlotDefinition::new("subtitle", SlotType::Text).label("Subtitle"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("direction", "left")
            .with("distance", 600)
            .with("slideFrames", 24)
            .with("easing", "easeOutBack")
            .with("overshoot", 1.7)
            .with("fontSize", 88)
            .with("color", "#ffffff")
            .with("subtitleDelay", 8)
    }

    fn evaluate(input: &RenderProps<'_>, _cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let text = input.text_or_prop("text", "text")?;
        let p = input.props;
        let dir = direction(&p.text_or("direction", "left"));
        let distance = p.number_in("distance", 600.0, 0.0, 4000.0) as f32;
        let slide = p.frames_or("slideFrames", 24).max(1);
        let easing = input.easing("easing", Easing::EaseOutBack { overshoot: 1.7 });
        let font_size = p.number_in("fontSize", 88.0, 4.0, 600.0) as f32;
        let color = p.color_or("color", Color::WHITE);

        let slide_in = |delay: u32| -> (f32, f32) {
            let local = input.frame.saturating_sub(delay);
            let t = local as f32 / slide as f32;
            let offset = 1.0 - easing.apply(t);
            let opacity = if input.frame < delay {
                0.0
            } else {
                envelope(local, input.duration.saturating_sub(delay), slide / 2, 0, Easing::Linear)
            };
            (offset, opacity)
        };

        let mut root = SceneNode::group("slide-in");
        let (offset, opacity) = slide_in(0);
        root.push(
            SceneNode::text("slide-in/text", text, font_size, color)
                .with_transform(Transform::from_translation([
                    dir[0] * distance * offset,
                    dir[1] * distance * offset,
                    0.0,
                ]))
                .with_opacity(opacity),
        );

        if let Some(subtitle) = input.text_or_prop("subtitle", "subtitle") {
            let delay = p.frames_or("subtitleDelay", 8);
            let (offset, opacity) = slide_in(delay);
            root.push(
                SceneNode::text("slide-in/subtitle", subtitle, font_size * 0.45, color.with_alpha_scaled(0.8))
                    .with_transform(Transform::from_translation([
                        dir[0] * distance * offset,
                        -font_size * 0.9 + dir[1] * distance * offset,
                        0.0,
                    ]))
                    .with_opacity(opacity),
            );
        }
        Some(root)
    }
}
