//! `mind-map`: a central topic with branches growing out radially, one at a time.
//!
//! Node boxes are sized from measured text widths, cached per element id in the
//! measurement arena.

use std::f32::consts::{FRAC_PI_2, TAU};

use montage_api_core::{Color, NodeKind, Props, SceneNode, Transform};

use crate::easing::{ease_out_back, ease_out_cubic, Easing};
use crate::math::{clamp01, lerp};
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::since;

pub struct MindMap;

/// Rounded box with a centered label.
fn labeled_box(id: &str, label: &str, width: f32, font_size: f32, fill: Color, text: Color) -> SceneNode {
    let height = font_size * 1.9;
    SceneNode::group(id)
        .with_child(SceneNode::new(
            format!("{id}/box"),
            NodeKind::Rect {
                width,
                height,
                color: fill,
                corner_radius: height / 2.0,
            },
        ))
        .with_child(SceneNode::text(format!("{id}/label"), label, font_size, text).at([0.0, 0.0, 0.1]))
}

/// Position of branch `i` of `n` on a circle, starting at the top and going clockwise.
pub(crate) fn branch_position(i: usize, n: usize, radius_x: f32, radius_y: f32) -> [f32; 2] {
    let angle = FRAC_PI_2 - TAU * i as f32 / n.max(1) as f32;
    [radius_x * angle.cos(), radius_y * angle.sin()]
}

impl Template for MindMap {
    const KIND: TemplateKind = TemplateKind::MindMap;
    const NAME: &'static str = "Mind Map";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("center", SlotType::Text).required().label("Central topic"),
            SlotDefinition::new("branches", SlotType::Text).label("Branches (one per line)"),
            SlotDefinition::new("accent", SlotType::Color).label("Accent color"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("radiusX", 560)
            .with("radiusY", 320)
            .with("fontSize", 34)
            .with("revealFrames", 20)
            .with("overshoot", 1.4)
            .with("accent", "#7c5cff")
            .with("nodeColor", "#23263a")
            .with("textColor", "#ffffff")
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let center = input.text_or_prop("center", "center")?;
        let branches = input.lines("branches", "branches");
        let p = input.props;
        let rx = p.number_in("radiusX", 560.0, 50.0, 4000.0) as f32;
        let ry = p.number_in("radiusY", 320.0, 50.0, 4000.0) as f32;
        let font_size = p.number_in("fontSize", 34.0, 6.0, 300.0) as f32;
        let reveal = p.frames_or("revealFrames", 20).max(2);
        let overshoot = p.number_in("overshoot", 1.4, 0.0, 10.0) as f32;
        let accent = input.color("accent", "accent", Color::rgba(0.49, 0.36, 1.0, 1.0));
        let node_fill = p.color_or("nodeColor", Color::rgba(0.14, 0.15, 0.23, 1.0));
        let text_color = p.color_or("textColor", Color::WHITE);
        let padding = font_size * 1.6;

        let mut root = SceneNode::group("mind-map");

        let timing = input.segments(branches.len().max(1), Spacing::Between, cx);
        let center_t = input.frame as f32 / timing.intro.max(reveal / 2).max(1) as f32;
        let center_w = cx.text_width("mind-map/center", &center, font_size * 1.3) + padding * 1.3;
        root.push(
            labeled_box("mind-map/center", &center, center_w, font_size * 1.3, accent, text_color)
                .with_transform(Transform::IDENTITY.with_uniform_scale(ease_out_back(center_t, overshoot).max(0.0)))
                .with_opacity(clamp01(center_t * 2.0)),
        );

        let half = reveal / 2;
        for (i, branch) in branches.iter().enumerate() {
            let Some(local) = since(input.frame, timing.start_of(i)) else {
                continue;
            };
            let [x, y] = branch_position(i, branches.len(), rx, ry);
            let id = format!("mind-map/branch/{i}");

            // Connector grows first, then the node pops at its end.
            let grow = ease_out_cubic(local as f32 / half as f32);
            root.push(SceneNode::new(
                format!("{id}/link"),
                NodeKind::Line {
                    from: [0.0, 0.0, -0.1],
                    to: [lerp(0.0, x, grow), lerp(0.0, y, grow), -0.1],
                    width: 3.0,
                    color: accent.with_alpha_scaled(0.8),
                },
            ));
            if local < half {
                continue;
            }
            let t = (local - half) as f32 / (reveal - half).max(1) as f32;
            let width = cx.text_width(&id, branch, font_size) + padding;
            root.push(
                labeled_box(&id, branch, width, font_size, node_fill, text_color)
                    .with_transform(Transform::from_translation([x, y, 0.0]).with_uniform_scale(ease_out_back(t, overshoot).max(0.0)))
                    .with_opacity(Easing::EaseOutCubic.apply(t * 1.5)),
            );
        }
        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_start_at_the_top_and_go_clockwise() {
        let top = branch_position(0, 4, 100.0, 50.0);
        assert!(top[0].abs() < 1e-4 && (top[1] - 50.0).abs() < 1e-4);
        let right = branch_position(1, 4, 100.0, 50.0);
        assert!((right[0] - 100.0).abs() < 1e-3 && right[1].abs() < 1e-3);
    }
}
