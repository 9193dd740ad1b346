//! montage-api-core: shared props, asset and scene-description vocabulary (engine-agnostic).
//!
//! The motion engine consumes [`Props`] and [`ResolvedAssets`] and produces a tree of
//! [`SceneNode`]s. Nothing in this crate performs I/O; hosts decode their own storage
//! formats into these types and hand the result to the engine.

pub mod asset;
pub mod color;
pub mod props;
pub mod scene;
pub mod table;

pub use asset::{AssetDescriptor, AssetKind, ResolvedAssets, SlotValue};
pub use color::{Color, ColorParseError};
pub use props::Props;
pub use scene::{CameraPose, NodeKind, SceneNode, TextAlign, Transform};
pub use table::DataTable;
