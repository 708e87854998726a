//! Per-volume viewport display settings.

use serde::{Deserialize, Serialize};

/// How a volume's wireframe is drawn in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WireframeType {
    /// No wireframe. The wireframe accessor returns nothing.
    None,
    /// A single box around the active voxels.
    Bounds,
    /// One box per tree node.
    #[default]
    Boxes,
    /// One point per node or voxel.
    Points,
}

/// Level of the tree visited when generating wireframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WireframeDetail {
    /// Internal nodes for boxes, leaf centers for points.
    #[default]
    Coarse,
    /// Leaf nodes for boxes, voxel centers for points.
    Fine,
}

/// Display settings stored on a volume object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VolumeDisplay {
    pub wireframe_type: WireframeType,
    pub wireframe_detail: WireframeDetail,
}
