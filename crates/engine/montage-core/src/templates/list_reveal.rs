//! `list-reveal`: a titled bullet list whose items slide in one by one.

use montage_api_core::{Color, NodeKind, Props, SceneNode, TextAlign};

use crate::easing::Easing;
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct ListReveal;

fn left_aligned(node: SceneNode) -> SceneNode {
    let mut node = node;
    if let NodeKind::Text { align, .. } = &mut node.kind {
        *align = TextAlign::Left;
    }
    node
}

impl Template for ListReveal {
    const KIND: TemplateKind = TemplateKind::ListReveal;
    const NAME: &'static str = "List Reveal";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("title", SlotType::Text).label("Title"),
            SlotDefinition::new("items", SlotType::Text).label("Items (one per line)"),
            SlotDefinition::new("accent", SlotType::Color).label("Bullet color"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("fontSize", 48)
            .with("lineHeight", 1.6)
            .with("revealFrames", 16)
            .with("slideDistance", 80)
            .with("easing", "easeOutCubic")
            .with("highlightActive", false)
            .with("accent", "#36d399")
            .with("textColor", "#ffffff")
            .with("left", -640)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let items = input.lines("items", "items");
        let title = input.text_or_prop("title", "title");
        if items.is_empty() && title.is_none() {
            return None;
        }
        let p = input.props;
        let font_size = p.number_in("fontSize", 48.0, 6.0, 400.0) as f32;
        let line_height = font_size * p.number_in("lineHeight", 1.6, 0.8, 4.0) as f32;
        let reveal = p.frames_or("revealFrames", 16).max(1);
        let distance = p.number_in("slideDistance", 80.0, 0.0, 2000.0) as f32;
        let easing = input.easing("easing", Easing::EaseOutCubic);
        let highlight = p.bool_or("highlightActive", false);
        let accent = input.color("accent", "accent", Color::rgba(0.21, 0.83, 0.6, 1.0));
        let text_color = p.color_or("textColor", Color::WHITE);
        let left = p.number_in("left", -640.0, -8000.0, 8000.0) as f32;

        let mut root = SceneNode::group("list-reveal");
        let title_h = if title.is_some() { font_size * 2.2 } else { 0.0 };
        let block_h = title_h + line_height * items.len() as f32;
        let top = block_h / 2.0;

        if let Some(title) = title {
            root.push(
                left_aligned(SceneNode::text("list-reveal/title", title, font_size * 1.4, text_color))
                    .at([left, top - font_size * 0.7, 0.0])
                    .with_opacity(envelope(input.frame, input.duration, reveal, 0, easing)),
            );
        }
        if items.is_empty() {
            return Some(root);
        }

        let timing = input.segments(items.len(), Spacing::Each, cx);
        let active = timing.active(input.frame).index;
        for (i, item) in items.iter().enumerate() {
            let t = timing.reveal_progress(input.frame, i, reveal, easing);
            if input.frame < timing.start_of(i) {
                continue;
            }
            let y = top - title_h - line_height * (i as f32 + 0.5);
            let dim = if highlight && i != active { 0.45 } else { 1.0 };
            let id = format!("list-reveal/item/{i}");
            root.push(
                SceneNode::group(id.clone())
                    .at([left - distance * (1.0 - t), y, 0.0])
                    .with_opacity(t.clamp(0.0, 1.0) * dim)
                    .with_child(
                        SceneNode::new(
                            format!("{id}/bullet"),
                            NodeKind::Circle {
                                radius: font_size * 0.16,
                                color: accent,
                            },
                        )
                        .at([font_size * 0.2, 0.0, 0.0]),
                    )
                    .with_child(
                        left_aligned(SceneNode::text(format!("{id}/text"), item.clone(), font_size, text_color))
                            .at([font_size * 0.8, 0.0, 0.0]),
                    ),
            );
        }
        Some(root)
    }
}
