//! Abstract scene description produced by template evaluation.
//!
//! The tree only says *what* is visible at a frame (content, transform, opacity, camera);
//! how it is rasterized is decided by the host's rendering surface.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Translation / euler rotation (radians, XYZ) / scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [1.0, 1.0, 1.0],
    };

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = [s, s, s];
        self
    }

    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation_z(mut self, radians: f32) -> Self {
        self.rotation[2] = radians;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Camera pose: eye position, look-at target and vertical field of view in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_deg: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 50.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Text {
        content: String,
        font_size: f32,
        color: Color,
        align: TextAlign,
    },
    Image {
        asset_id: String,
        source: Option<String>,
        width: f32,
        height: f32,
    },
    Video {
        asset_id: String,
        source: Option<String>,
        width: f32,
        height: f32,
        /// Frame of the source video to present.
        playback_frame: u32,
    },
    Rect {
        width: f32,
        height: f32,
        color: Color,
        corner_radius: f32,
    },
    Line {
        from: [f32; 3],
        to: [f32; 3],
        width: f32,
        color: Color,
    },
    Circle {
        radius: f32,
        color: Color,
    },
    Camera(CameraPose),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Stable id, unique within one evaluated tree.
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub transform: Transform,
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            transform: Transform::IDENTITY,
            opacity: 1.0,
            children: Vec::new(),
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Group)
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self::new(
            id,
            NodeKind::Text {
                content: content.into(),
                font_size,
                color,
                align: TextAlign::Center,
            },
        )
    }

    pub fn camera(id: impl Into<String>, pose: CameraPose) -> Self {
        Self::new(id, NodeKind::Camera(pose))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, translation: [f32; 3]) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Depth-first pre-order iterator over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &SceneNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        self.walk().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// First camera pose found in the tree.
    pub fn camera_pose(&self) -> Option<&CameraPose> {
        self.walk().find_map(|n| match &n.kind {
            NodeKind::Camera(pose) => Some(pose),
            _ => None,
        })
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}
