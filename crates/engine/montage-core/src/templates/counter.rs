//! `counter`: a number counting up to its target with per-digit flips.
//!
//! Each digit flips only during the last slice of its decimal place's cycle (see
//! [`digit_flip`]), so the ones digit flickers through values while higher places hold still
//! and tick over briefly.

use montage_api_core::{Color, Props, SceneNode, Transform};

use crate::easing::Easing;
use crate::math::clamp01;
use crate::sequencer::digit_flip;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct Counter;

/// Number of integer digits needed for `v` (at least 1).
fn digit_count(v: f64) -> u32 {
    let v = v.abs().floor();
    if v < 1.0 {
        1
    } else {
        v.log10().floor() as u32 + 1
    }
}

impl Template for Counter {
    const KIND: TemplateKind = TemplateKind::Counter;
    const NAME: &'static str = "Counter";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("value", SlotType::Number).required().label("Target value"),
            SlotDefinition::new("label", SlotType::Text).label("Label"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("from", 0)
            .with("decimals", 0)
            .with("prefix", "")
            .with("suffix", "")
            .with("countFraction", 0.8)
            .with("easing", "easeOutExpo")
            .with("fontSize", 160)
            .with("color", "#ffffff")
            .with("flip", true)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let target = input
            .number("value")
            .or_else(|| input.props.number("value"))?;
        let p = input.props;
        let from = p.number_or("from", 0.0);
        let decimals = p.int_in("decimals", 0, 0, 4) as u32;
        let count_frames = ((input.duration as f64 * p.number_in("countFraction", 0.8, 0.05, 1.0))
            .round() as u32)
            .max(1);
        let easing = input.easing("easing", Easing::EaseOutExpo);
        let t = clamp01(input.frame as f32 / count_frames as f32);
        let shown = from + (target - from) * easing.apply(t) as f64;

        let font_size = p.number_in("fontSize", 160.0, 8.0, 800.0) as f32;
        let color = p.color_or("color", Color::WHITE);
        let flip = p.bool_or("flip", true);
        let flip_fraction = cx.config.sequencer.digit_flip_fraction;

        let scale = 10f64.powi(decimals as i32);
        let scaled = (shown * scale).abs();
        let total_places = digit_count(target.abs().max(from.abs()) * scale).max(decimals + 1);
        let visible_places = digit_count(scaled).max(decimals + 1);

        let advance = font_size * 0.62;
        let prefix = p.text_or("prefix", "");
        let suffix = p.text_or("suffix", "");
        let negative = shown < 0.0;
        let mut glyphs: Vec<SceneNode> = Vec::new();

        if !prefix.is_empty() {
            glyphs.push(SceneNode::text("counter/prefix", prefix, font_size, color));
        }
        if negative {
            glyphs.push(SceneNode::text("counter/sign", "-", font_size, color));
        }
        for place in (0..total_places).rev() {
            if place >= visible_places {
                continue;
            }
            let id = format!("counter/digit/{place}");
            let state = digit_flip(scaled, place, flip_fraction);
            let progress = if flip { state.progress } else { 0.0 };
            let shift = font_size * progress;
            // Outgoing digit slides up and fades; incoming digit rises from below.
            let mut cell = SceneNode::group(id.clone());
            cell.push(
                SceneNode::text(format!("{id}/from"), state.from.to_string(), font_size, color)
                    .at([0.0, shift, 0.0])
                    .with_opacity(1.0 - progress),
            );
            if progress > 0.0 {
                cell.push(
                    SceneNode::text(format!("{id}/to"), state.to.to_string(), font_size, color)
                        .at([0.0, shift - font_size, 0.0])
                        .with_opacity(progress),
                );
            }
            glyphs.push(cell);
            if decimals > 0 && place == decimals {
                glyphs.push(SceneNode::text("counter/point", ".", font_size, color));
            }
        }
        if !suffix.is_empty() {
            glyphs.push(SceneNode::text("counter/suffix", suffix, font_size, color));
        }

        // Lay glyphs out left to right, centered.
        let width = advance * glyphs.len() as f32;
        let mut number = SceneNode::group("counter/number");
        for (i, glyph) in glyphs.into_iter().enumerate() {
            let x = -width / 2.0 + advance * (i as f32 + 0.5);
            number.push(glyph.with_transform(Transform::from_translation([x, 0.0, 0.0])));
        }

        let opacity = envelope(input.frame, input.duration, 6, 0, Easing::Linear);
        let mut root = SceneNode::group("counter").with_opacity(opacity);
        root.push(number);
        if let Some(label) = input.text_or_prop("label", "label") {
            root.push(
                SceneNode::text("counter/label", label, font_size * 0.3, color.with_alpha_scaled(0.75))
                    .at([0.0, -font_size * 0.85, 0.0]),
            );
        }
        Some(root)
    }
}
