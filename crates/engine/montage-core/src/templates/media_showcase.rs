//! `media-showcase`: a camera moving over a background image or video, with further media
//! items shown as floating cards, one segment per item.
//!
//! The first media item is the background plane the camera is safe-framed against. Each
//! segment starts with the transition kick named in the `effects` prop (cycled). This is the
//! only template that advances the camera state in its context.

use log::warn;
use montage_api_core::{AssetDescriptor, AssetKind, Color, NodeKind, Props, SceneNode};
use serde_json::json;

use crate::assets::MediaInfo;
use crate::camera::{BackgroundPlane, CameraRig, KickEffect, RigInput, RigParams};
use crate::easing::Easing;
use crate::sequencer::Spacing;
use crate::template::{EvalContext, RenderProps, SlotDefinition, SlotType, Template, TemplateKind};
use crate::templates::envelope;

pub struct MediaShowcase;

const MEDIA_SLOTS: [&str; 4] = ["media", "media2", "media3", "media4"];

/// Transition effect for segment `index`, cycling through the `effects` prop.
pub(crate) fn effect_for(props: &Props, index: usize) -> KickEffect {
    let names = props.text_list("effects");
    if names.is_empty() {
        return KickEffect::None;
    }
    let name = &names[index % names.len()];
    KickEffect::from_name(name).unwrap_or_else(|| {
        warn!("unknown camera effect '{name}'");
        KickEffect::None
    })
}

/// Media node sized `width` x `height`; videos loop through their frames.
fn media_node(id: String, asset: &AssetDescriptor, info: Option<MediaInfo>, width: f32, height: f32, frame: u32) -> SceneNode {
    let kind = match asset.kind {
        AssetKind::Video => NodeKind::Video {
            asset_id: asset.id.clone(),
            source: asset.source_locator.clone(),
            width,
            height,
            playback_frame: info.map(|i| i.loop_frame(frame)).unwrap_or(frame),
        },
        _ => NodeKind::Image {
            asset_id: asset.id.clone(),
            source: asset.source_locator.clone(),
            width,
            height,
        },
    };
    SceneNode::new(id, kind)
}

impl Template for MediaShowcase {
    const KIND: TemplateKind = TemplateKind::MediaShowcase;
    const NAME: &'static str = "Media Showcase";

    fn slots() -> Vec<SlotDefinition> {
        vec![
            SlotDefinition::new("media", SlotType::File).required().label("Background media"),
            SlotDefinition::new("media2", SlotType::File).label("Media 2"),
            SlotDefinition::new("media3", SlotType::File).label("Media 3"),
            SlotDefinition::new("media4", SlotType::File).label("Media 4"),
            SlotDefinition::new("caption", SlotType::Text).label("Caption"),
        ]
    }

    fn default_props() -> Props {
        Props::new()
            .with("effects", json!(["punch-zoom", "whip-pan", "shake", "settle"]))
            .with("bleed", 1.25)
            .with("cardScale", 0.45)
            .with("cardDepth", 1.5)
            .with("captionSize", 0.35)
    }

    fn evaluate(input: &RenderProps<'_>, cx: &mut EvalContext<'_>) -> Option<SceneNode> {
        let items: Vec<&AssetDescriptor> = MEDIA_SLOTS
            .iter()
            .filter_map(|slot| input.asset(slot))
            .filter(|a| matches!(a.kind, AssetKind::Image | AssetKind::Video))
            .collect();
        let background = *items.first()?;
        let p = input.props;
        let cam = cx.config.camera;
        let canvas_aspect = cx.aspect();
        let info_of = |asset: &AssetDescriptor| {
            asset
                .source_locator
                .as_deref()
                .and_then(|loc| cx.media.media_info(loc))
        };

        // Background plane covers the resting frustum with some bleed, at the media's aspect.
        let bg_info = info_of(background);
        let media_aspect = bg_info.map(|i| i.aspect()).unwrap_or(canvas_aspect);
        let bleed = p.number_in("bleed", 1.25, 1.0, 4.0) as f32;
        let hh = (cam.base_fov_deg.to_radians() * 0.5).tan() * cam.base_distance * bleed;
        let (quad_w, quad_h) = if media_aspect >= canvas_aspect {
            (2.0 * hh * media_aspect, 2.0 * hh)
        } else {
            let w = 2.0 * hh * canvas_aspect;
            (w, w / media_aspect)
        };
        let center = [0.0, 0.0, cam.plane_z];
        let plane = BackgroundPlane::new(center, quad_w / 2.0, quad_h / 2.0);

        let timing = input.segments(items.len(), Spacing::Each, cx);
        let segment = timing.active(input.frame);
        let rig = CameraRig::new(RigParams::from_props(p, &cam, center), plane, canvas_aspect, &cam);
        let rig_input = RigInput {
            time: input.time(cx.fps()),
            segment,
            effect: effect_for(p, segment.index),
        };
        let dt = cx.frame_dt();
        let camera = rig.step(cx.camera, &rig_input, dt);

        let mut root = SceneNode::group("media-showcase");
        root.push(SceneNode::camera("media-showcase/camera", camera.pose));
        root.push(
            media_node("media-showcase/background".into(), background, bg_info, quad_w, quad_h, input.frame)
                .at(center),
        );

        let card_h = quad_h * p.number_in("cardScale", 0.45, 0.05, 1.0) as f32;
        let depth = p.number_in("cardDepth", 1.5, 0.0, cam.base_distance as f64 * 0.8) as f32;
        for (i, &asset) in items.iter().enumerate().skip(1) {
            let start = timing.start_of(i);
            if input.frame < start {
                continue;
            }
            let span = timing.span_of(i);
            let last = i + 1 == items.len();
            let local = input.frame - start;
            let exit = if last { 0 } else { 8.min(span / 3) };
            let opacity = if !last && local >= span {
                0.0
            } else {
                envelope(local, if last { timing.duration - start } else { span }, 10, exit, Easing::EaseOutCubic)
            };
            if opacity <= 0.0 {
                continue;
            }
            let info = info_of(asset);
            let aspect = info.map(|m| m.aspect()).unwrap_or(canvas_aspect);
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            root.push(
                media_node(format!("media-showcase/card/{i}"), asset, info, card_h * aspect, card_h, local)
                    .at([side * quad_w * 0.12, 0.0, center[2] + depth])
                    .with_opacity(opacity),
            );
        }

        if let Some(caption) = input.text_or_prop("caption", "caption") {
            let size = p.number_in("captionSize", 0.35, 0.05, 3.0) as f32;
            root.push(
                SceneNode::text("media-showcase/caption", caption, size, Color::WHITE)
                    .at([0.0, -quad_h * 0.3, center[2] + depth + 0.5])
                    .with_opacity(envelope(input.frame, input.duration, 15, 15, Easing::EaseOutCubic)),
            );
        }
        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_cycle_and_tolerate_unknown_names() {
        let props = Props::new().with("effects", json!(["shake", "bogus"]));
        assert_eq!(effect_for(&props, 0), KickEffect::Shake);
        assert_eq!(effect_for(&props, 1), KickEffect::None);
        assert_eq!(effect_for(&props, 2), KickEffect::Shake);
        assert_eq!(effect_for(&Props::new(), 0), KickEffect::None);
    }

    #[test]
    fn video_nodes_loop() {
        let asset = AssetDescriptor::video("v", "clip.mp4");
        let info = MediaInfo {
            width: 100,
            height: 100,
            frame_count: 10,
        };
        let node = media_node("n".into(), &asset, Some(info), 1.0, 1.0, 25);
        assert!(matches!(node.kind, NodeKind::Video { playback_frame: 5, .. }));
    }
}
