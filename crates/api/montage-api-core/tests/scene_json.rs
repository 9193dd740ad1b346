use approx::assert_relative_eq;
use montage_api_core::{
    AssetDescriptor, AssetKind, CameraPose, Color, DataTable, NodeKind, Props, SceneNode,
    SlotValue, Transform,
};
use serde_json::json;

#[test]
fn scene_nodes_serialize_with_tagged_kinds() {
    let node = SceneNode::group("root")
        .with_child(
            SceneNode::text("title", "Hello", 48.0, Color::WHITE)
                .with_transform(Transform::from_translation([10.0, -5.0, 0.0]).with_uniform_scale(2.0))
                .with_opacity(0.5),
        )
        .with_child(SceneNode::camera("cam", CameraPose::default()));
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["kind"]["type"], "group");
    assert_eq!(value["children"][0]["kind"]["type"], "text");
    assert_eq!(value["children"][0]["kind"]["content"], "Hello");
    assert_eq!(value["children"][1]["kind"]["fovDeg"], 50.0);

    let back: SceneNode = serde_json::from_value(value).unwrap();
    assert_eq!(back, node);
}

#[test]
fn leaf_nodes_omit_children() {
    let leaf = SceneNode::new(
        "dot",
        NodeKind::Circle {
            radius: 4.0,
            color: Color::BLACK,
        },
    );
    let value = serde_json::to_value(&leaf).unwrap();
    assert!(value.get("children").is_none());
}

#[test]
fn asset_descriptors_use_camel_case() {
    let asset: AssetDescriptor = serde_json::from_value(json!({
        "id": "clip",
        "kind": "video",
        "sourceLocator": "mem://clip.mp4"
    }))
    .unwrap();
    assert_eq!(asset.kind, AssetKind::Video);
    assert_eq!(asset.source_locator.as_deref(), Some("mem://clip.mp4"));
    assert_eq!(asset.text_content, None);
    assert!(SlotValue::Asset(asset).as_text().is_none());
}

#[test]
fn props_and_colors_degrade_to_defaults() {
    let props: Props = serde_json::from_value(json!({
        "accent": "#33669980",
        "broken": "#12",
        "hsl": {"h": 0.0, "s": 1.0, "l": 0.5},
        "size": "64px"
    }))
    .unwrap();
    let accent = props.color_or("accent", Color::WHITE);
    assert_relative_eq!(accent.0[0], 0.2, epsilon = 1e-6);
    assert_relative_eq!(accent.alpha(), 128.0 / 255.0, epsilon = 1e-6);
    assert_eq!(props.color_or("broken", Color::BLACK), Color::BLACK);
    let red = props.color_or("hsl", Color::BLACK);
    assert_relative_eq!(red.0[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(red.0[1], 0.0, epsilon = 1e-6);
    assert_eq!(props.number_or("size", 32.0), 32.0);
}

#[test]
fn tables_parse_percent_and_separator_cells() {
    let table = DataTable::from_json(&json!("[[\"k\",\"v\"],[\"a\",\"12%\"],[\"b\",\"1_000\"]]")).unwrap();
    assert_eq!(table.number(0, 1), Some(12.0));
    assert_eq!(table.number(1, 1), Some(1000.0));
}
