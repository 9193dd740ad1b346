//! `timeline-reveal`: a horizontal axis drawn left to right with dated events popping in.

use montage_api_core::{Color, DataTable, NodeKind, Props, SceneNode, Transform};

use crate::easing::{ease_out_back, Easing};
use crate::math::{clamp01, lerp};
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::since;

pub struct TimelineReveal;

#[derive(Clone, Debug, PartialEq)]
struct Event {
    date: String,
    title: String,
    detail: Option<String>,
}

fn first_column(table: &DataTable, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| table.column_index(n))
}

fn events_from_table(table: &DataTable) -> Vec<Event> {
    let date = first_column(table, &["date", "year", "when"]).unwrap_or(0);
    let title = first_column(table, &["title", "label", "event", "name"]).unwrap_or(1);
    let detail = first_column(table, &["description", "detail", "details"]);
    (0..table.row_count())
        .filter_map(|row| {
            let title = table.text(row, title).unwrap_or_default().trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(Event {
                date: table.text(row, date).unwrap_or_default().trim().to_string(),
                title,
                detail: detail
                    .and_then(|c| table.text(row, c))
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            })
        })
        .collect()
}

/// `"1990: Founded"` style entries from a text list.
fn events_from_lines(lines: &[String]) -> Vec<Event> {
    lines
        .iter()
        .map(|line| match line.split_once(':') {
            Some((date, title)) => Event {
                date: date.trim().to_string(),
                title: title.trim().to_string(),
                detail: None,
            },
            None => Event {
                date: String::new(),
                title: line.trim().to_string(),
                detail: None,
            },
        })
        .collect()
}

impl Template for TimelineReveal {
    const KIND: TemplateKind = TemplateKind::TimelineReveal;
    const NAME: &'static str = "Timeline Reveal";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("events", SlotType::DataTable).label("Events"),
            SlotDefinition::new("accent", SlotType::Color).label("Accent color"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("width", 1600)
            .with("revealFrames", 18)
            .with("overshoot", 1.7)
            .with("accent", "#ffb347")
            .with("textColor", "#ffffff")
            .with("dotRadius", 14)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let events = match input.table("events") {
            Some(table) => events_from_table(table),
            None => events_from_lines(&input.props.text_list("events")),
        };
        if events.is_empty() {
            return None;
        }
        let p = input.props;
        let width = p.number_in("width", 1600.0, 100.0, 8000.0) as f32;
        let reveal = p.frames_or("revealFrames", 18).max(1);
        let overshoot = p.number_in("overshoot", 1.7, 0.0, 10.0) as f32;
        let accent = input.color("accent", "accent", Color::rgba(1.0, 0.7, 0.28, 1.0));
        let text_color = p.color_or("textColor", Color::WHITE);
        let radius = p.number_in("dotRadius", 14.0, 1.0, 200.0) as f32;

        let timing = input.segments(events.len(), Spacing::Between, cx);
        let n = events.len();
        let x_of = |i: usize| {
            if n == 1 {
                0.0
            } else {
                lerp(-width / 2.0, width / 2.0, i as f32 / (n - 1) as f32)
            }
        };

        // The axis grows during the intro, then keeps pace with the newest revealed event.
        let intro_t = clamp01(input.frame as f32 / timing.intro.max(1) as f32);
        let seg = timing.active(input.frame);
        let head = if input.frame < timing.start_of(0) {
            lerp(-width / 2.0, x_of(0), Easing::EaseOutCubic.apply(intro_t))
        } else {
            let next = x_of((seg.index + 1).min(n - 1));
            lerp(x_of(seg.index), next, Easing::EaseInOutCubic.apply(seg.progress))
        };

        let mut root = SceneNode::group("timeline-reveal");
        root.push(SceneNode::new(
            "timeline-reveal/axis",
            NodeKind::Line {
                from: [-width / 2.0, 0.0, 0.0],
                to: [head.max(-width / 2.0), 0.0, 0.0],
                width: 4.0,
                color: text_color.with_alpha_scaled(0.6),
            },
        ));

        for (i, event) in events.iter().enumerate() {
            let Some(local) = since(input.frame, timing.start_of(i)) else {
                continue;
            };
            let t = local as f32 / reveal as f32;
            let pop = ease_out_back(t, overshoot).max(0.0);
            let fade = Easing::EaseOutCubic.apply(t);
            let id = format!("timeline-reveal/event/{i}");
            let above = i % 2 == 0;
            let dir = if above { 1.0 } else { -1.0 };

            let mut node = SceneNode::group(id.clone()).at([x_of(i), 0.0, 0.0]);
            node.push(
                SceneNode::new(format!("{id}/dot"), NodeKind::Circle { radius, color: accent })
                    .with_transform(Transform::IDENTITY.with_uniform_scale(pop)),
            );
            if !event.date.is_empty() {
                node.push(
                    SceneNode::text(format!("{id}/date"), event.date.clone(), 40.0, accent)
                        .at([0.0, dir * (radius + 40.0 + 20.0 * (1.0 - fade)), 0.0])
                        .with_opacity(fade),
                );
            }
            node.push(
                SceneNode::text(format!("{id}/title"), event.title.clone(), 30.0, text_color)
                    .at([0.0, dir * (radius + 90.0) - dir * 16.0 * (1.0 - fade), 0.0])
                    .with_opacity(fade),
            );
            if let Some(detail) = &event.detail {
                node.push(
                    SceneNode::text(format!("{id}/detail"), detail.clone(), 22.0, text_color.with_alpha_scaled(0.7))
                        .at([0.0, dir * (radius + 130.0), 0.0])
                        .with_opacity(fade * 0.9),
                );
            }
            root.push(node);
        }
        Some(root)
    }
}
