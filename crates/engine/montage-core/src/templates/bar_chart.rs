//! `bar-chart`: bars growing one after another from a data table.

use montage_api_core::{Color, DataTable, NodeKind, Props, SceneNode, Transform};

use crate::easing::Easing;
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct BarChart;

/// `(label, value)` pairs from the configured columns. Rows without a numeric value are skipped.
fn bars(table: &DataTable, label_col: &str, value_col: &str) -> Vec<(String, f64)> {
    let label_idx = table.column_index(label_col).unwrap_or(0);
    let value_idx = table
        .column_index(value_col)
        .unwrap_or(if table.headers.len() > 1 { 1 } else { 0 });
    (0..table.row_count())
        .filter_map(|row| {
            let value = table.number(row, value_idx)?;
            let label = table.text(row, label_idx).unwrap_or_default().to_string();
            Some((label, value))
        })
        .collect()
}

impl Template for BarChart {
    const KIND: TemplateKind = TemplateKind::BarChart;
    const NAME: &'static str = "Bar Chart";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("data", SlotType::DataTable).required().label("Data"),
            SlotDefinition::new("title", SlotType::Text).label("Title"),
            SlotDefinition::new("barColor", SlotType::Color).label("Bar color"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("labelColumn", "label")
            .with("valueColumn", "value")
            .with("growFrames", 24)
            .with("easing", "easeOutCubic")
            .with("chartWidth", 1400)
            .with("chartHeight", 600)
            .with("gap", 0.25)
            .with("barColor", "#4f8cff")
            .with("textColor", "#ffffff")
            .with("showValues", true)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let table = input.table("data")?;
        let p = input.props;
        let data = bars(
            table,
            &p.text_or("labelColumn", "label"),
            &p.text_or("valueColumn", "value"),
        );
        let mut root = SceneNode::group("bar-chart");
        if data.is_empty() {
            return Some(root);
        }

        let timing = input.segments(data.len(), Spacing::Each, cx);
        let grow = p.frames_or("growFrames", 24).max(1);
        let easing = input.easing("easing", Easing::EaseOutCubic);
        let chart_w = p.number_in("chartWidth", 1400.0, 10.0, 8000.0) as f32;
        let chart_h = p.number_in("chartHeight", 600.0, 10.0, 8000.0) as f32;
        let gap = p.number_in("gap", 0.25, 0.0, 0.9) as f32;
        let bar_color = input.color("barColor", "barColor", Color::rgba(0.31, 0.55, 1.0, 1.0));
        let text_color = p.color_or("textColor", Color::WHITE);
        let show_values = p.bool_or("showValues", true);

        let max = p
            .number("maxValue")
            .filter(|m| *m > 0.0)
            .unwrap_or_else(|| data.iter().map(|(_, v)| *v).fold(0.0, f64::max))
            .max(f64::EPSILON);
        let slot_w = chart_w / data.len() as f32;
        let bar_w = slot_w * (1.0 - gap);
        let baseline = -chart_h / 2.0;
        let label_size = (slot_w * 0.18).clamp(14.0, 42.0);

        root.push(
            SceneNode::new(
                "bar-chart/axis",
                NodeKind::Line {
                    from: [-chart_w / 2.0, baseline, 0.0],
                    to: [chart_w / 2.0, baseline, 0.0],
                    width: 3.0,
                    color: text_color.with_alpha_scaled(0.5),
                },
            )
            .with_opacity(envelope(input.frame, input.duration, 10, 0, Easing::Linear)),
        );

        for (i, (label, value)) in data.iter().enumerate() {
            let reveal = timing.reveal_progress(input.frame, i, grow, easing);
            let full_h = (value.max(0.0) / max) as f32 * chart_h;
            let h = full_h * reveal;
            let x = -chart_w / 2.0 + slot_w * (i as f32 + 0.5);
            let id = format!("bar-chart/bar/{i}");
            let opacity = reveal.clamp(0.0, 1.0);

            let mut bar = SceneNode::group(id.clone())
                .with_transform(Transform::from_translation([x, baseline, 0.0]))
                .with_opacity(if reveal > 0.0 { 1.0 } else { 0.0 });
            bar.push(
                SceneNode::new(
                    format!("{id}/rect"),
                    NodeKind::Rect {
                        width: bar_w,
                        height: h.max(0.0),
                        color: bar_color,
                        corner_radius: (bar_w * 0.06).min(12.0),
                    },
                )
                .at([0.0, h.max(0.0) / 2.0, 0.0]),
            );
            bar.push(
                SceneNode::text(format!("{id}/label"), label.clone(), label_size, text_color)
                    .at([0.0, -label_size * 1.2, 0.0])
                    .with_opacity(opacity),
            );
            if show_values {
                let shown = value * reveal.clamp(0.0, 1.0) as f64;
                bar.push(
                    SceneNode::text(format!("{id}/value"), format_value(shown, *value), label_size, text_color)
                        .at([0.0, h.max(0.0) + label_size, 0.0])
                        .with_opacity(opacity),
                );
            }
            root.push(bar);
        }

        if let Some(title) = input.text_or_prop("title", "title") {
            root.push(
                SceneNode::text("bar-chart/title", title, 56.0, text_color)
                    .at([0.0, chart_h / 2.0 + 90.0, 0.0])
                    .with_opacity(envelope(input.frame, input.duration, 12, 0, Easing::EaseOutCubic)),
            );
        }
        Some(root)
    }
}

/// Format the animated value with the precision of the final value.
fn format_value(shown: f64, target: f64) -> String {
    if target.fract() == 0.0 {
        format!("{}", shown.round() as i64)
    } else {
        format!("{shown:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bars_skip_non_numeric_rows() {
        let t = DataTable::from_json(&json!([["label", "value"], ["A", 3], ["B", "n/a"], ["C", "4.5"]]))
            .unwrap();
        let b = bars(&t, "label", "value");
        assert_eq!(b, vec![("A".to_string(), 3.0), ("C".to_string(), 4.5)]);
    }

    #[test]
    fn values_format_like_their_target() {
        assert_eq!(format_value(2.6, 10.0), "3");
        assert_eq!(format_value(2.66, 4.5), "2.7");
    }
}
