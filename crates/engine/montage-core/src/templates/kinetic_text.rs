//! `kinetic-text`: lines of text played one after another, word by word.
//!
//! Effects: `pop` (scale up with overshoot), `slide` (rise from below) and `glitch` (jitter
//! plus color-split ghosts). Glitch jitter is seeded from the frame hash, so evaluating a frame
//! twice yields the same offsets.

use montage_api_core::{Color, Props, SceneNode, Transform};

use crate::easing::{ease_out_back, ease_out_cubic, Easing};
use crate::math::{clamp01, hash_frame, seeded_random, seeded_signed};
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::since;

pub struct KineticText;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Effect {
    Pop,
    Slide,
    Glitch,
}

impl Effect {
    fn from_prop(name: &str) -> Effect {
        match name.trim().to_ascii_lowercase().as_str() {
            "slide" => Effect::Slide,
            "glitch" => Effect::Glitch,
            _ => Effect::Pop,
        }
    }
}

const GHOST_A: Color = Color([1.0, 0.2, 0.35, 1.0]);
const GHOST_B: Color = Color([0.2, 0.9, 1.0, 1.0]);

impl Template for KineticText {
    const KIND: TemplateKind = TemplateKind::KineticText;
    const NAME: &'static str = "Kinetic Text";

    fn slots() -> Vec<SlotDefinition> {
        vec![SlotDefinition::new("text", SlotType::Text).required().label("Lines")]
    }

    fn default_props() -> Props {
        Props::new()
            .with("effect", "pop")
            .with("fontSize", 110)
            .with("color", "#ffffff")
            .with("wordStagger", 4)
            .with("popFrames", 12)
            .with("overshoot", 1.7)
            .with("exitFrames", 8)
            .with("glitchFrames", 14)
            .with("glitchAmount", 1.0)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let lines = input.lines("text", "lines");
        if lines.is_empty() {
            return None;
        }
        let p = input.props;
        let effect = Effect::from_prop(&p.text_or("effect", "pop"));
        let font_size = p.number_in("fontSize", 110.0, 8.0, 600.0) as f32;
        let color = p.color_or("color", Color::WHITE);
        let stagger = p.frames_or("wordStagger", 4);
        let pop = p.frames_or("popFrames", 12).max(1);
        let overshoot = p.number_in("overshoot", 1.7, 0.0, 10.0) as f32;
        let exit = p.frames_or("exitFrames", 8);

        let timing = input.segments(lines.len(), Spacing::Each, cx);
        let seg = timing.active(input.frame);
        let mut root = SceneNode::group("kinetic-text");

        // The previous line lingers briefly while the next one begins.
        let mut visible = vec![(seg.index, 1.0f32)];
        if seg.index > 0 && exit > 0 && seg.local_frame < exit && input.frame >= timing.start_of(seg.index) {
            let fade = 1.0 - ease_out_cubic(seg.local_frame as f32 / exit as f32);
            visible.insert(0, (seg.index - 1, fade));
        }

        for (line_idx, line_opacity) in visible {
            let start = timing.start_of(line_idx);
            let Some(local) = since(input.frame, start) else {
                continue;
            };
            let words: Vec<&str> = lines[line_idx].split_whitespace().collect();
            let space = font_size * 0.3;
            let widths: Vec<f32> = words
                .iter()
                .enumerate()
                .map(|(j, w)| cx.text_width(&format!("kinetic-text/{line_idx}/{j}"), w, font_size))
                .collect();
            let total = widths.iter().sum::<f32>() + space * words.len().saturating_sub(1) as f32;

            let line_id = format!("kinetic-text/line/{line_idx}");
            let mut line = SceneNode::group(line_id.clone()).with_opacity(line_opacity);
            let mut cursor = -total / 2.0;
            for (j, word) in words.iter().enumerate() {
                let x = cursor + widths[j] / 2.0;
                cursor += widths[j] + space;
                let word_local = local as i64 - j as i64 * stagger as i64;
                if word_local < 0 {
                    continue;
                }
                let t = word_local as f32 / pop as f32;
                let id = format!("{line_id}/word/{j}");
                let node = match effect {
                    Effect::Pop => {
                        let s = ease_out_back(t, overshoot);
                        SceneNode::text(id, *word, font_size, color)
                            .with_transform(Transform::from_translation([x, 0.0, 0.0]).with_uniform_scale(s.max(0.0)))
                            .with_opacity(clamp01(t * 2.0))
                    }
                    Effect::Slide => {
                        let e = Easing::EaseOutCubic.apply(t);
                        SceneNode::text(id, *word, font_size, color)
                            .at([x, -font_size * 0.6 * (1.0 - e), 0.0])
                            .with_opacity(e)
                    }
                    Effect::Glitch => glitch_word(
                        id,
                        word,
                        [x, 0.0],
                        word_local as u32,
                        input.frame,
                        (line_idx * 131 + j) as u32,
                        font_size,
                        color,
                        p,
                    ),
                };
                line.push(node);
            }
            root.push(line);
        }
        Some(root)
    }
}

#[allow(clippy::too_many_arguments)]
fn glitch_word(
    id: String,
    word: &str,
    at: [f32; 2],
    word_local: u32,
    frame: u32,
    salt: u32,
    font_size: f32,
    color: Color,
    props: &Props,
) -> SceneNode {
    let window = props.frames_or("glitchFrames", 14).max(1);
    let amount = props.number_in("glitchAmount", 1.0, 0.0, 5.0) as f32;
    let intensity = (1.0 - word_local as f32 / window as f32).max(0.0) * amount;

    let seed = hash_frame(frame, salt);
    let jx = seeded_signed(seed) * font_size * 0.18 * intensity;
    let jy = seeded_signed(seed.wrapping_add(1)) * font_size * 0.06 * intensity;
    let dropout = seeded_random(seed.wrapping_add(2)) < 0.2 * intensity.min(1.0);
    let opacity = if dropout { 0.3 } else { 1.0 };

    let mut group = SceneNode::group(id.clone()).at([at[0] + jx, at[1] + jy, 0.0]);
    if intensity > 0.0 {
        let split = font_size * 0.05 * intensity;
        group.push(
            SceneNode::text(format!("{id}/ghost-a"), word, font_size, GHOST_A)
                .at([-split, 0.0, -0.1])
                .with_opacity(0.6 * intensity.min(1.0)),
        );
        group.push(
            SceneNode::text(format!("{id}/ghost-b"), word, font_size, GHOST_B)
                .at([split, 0.0, -0.1])
                .with_opacity(0.6 * intensity.min(1.0)),
        );
    }
    group.push(SceneNode::text(format!("{id}/glyphs"), word, font_size, color).with_opacity(opacity));
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_names_fall_back_to_pop() {
        assert_eq!(Effect::from_prop("Glitch"), Effect::Glitch);
        assert_eq!(Effect::from_prop("wobble"), Effect::Pop);
    }

    #[test]
    fn glitch_settles_after_its_window() {
        let props = Props::new();
        let a = glitch_word("w".into(), "hey", [0.0, 0.0], 20, 33, 1, 100.0, Color::WHITE, &props);
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.transform.translation, [0.0, 0.0, 0.0]);
        let b = glitch_word("w".into(), "hey", [0.0, 0.0], 2, 33, 1, 100.0, Color::WHITE, &props);
        let c = glitch_word("w".into(), "hey", [0.0, 0.0], 2, 33, 1, 100.0, Color::WHITE, &props);
        assert_eq!(b, c);
        assert_eq!(b.children.len(), 3);
    }
}
