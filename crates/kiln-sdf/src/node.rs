//! Scene node types
//!
//! Nodes live in a [`SceneGraph`](crate::SceneGraph) arena and are addressed
//! by [`NodeId`]. Shapes are leaves; operations own an ordered list of
//! children whose order decides statement emission order.

use std::fmt;

use glam::Vec3;

use crate::error::{Error, Result};
use crate::glsl_gen::MAX_SMOOTHNESS;

/// Stable handle to a node inside one scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of node kinds.
///
/// Code generation matches on this exhaustively, so adding a variant is a
/// compile error until the generator handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Shapes
    Sphere {
        position: Vec3,
        color: Vec3,
        radius: f32,
    },
    Box {
        position: Vec3,
        color: Vec3,
        half_extents: Vec3,
    },

    // Operations
    Union {
        children: Vec<NodeId>,
    },
    SmoothUnion {
        children: Vec<NodeId>,
        smoothness: f32,
    },
}

impl NodeKind {
    /// Short lowercase label used in logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Sphere { .. } => "sphere",
            NodeKind::Box { .. } => "box",
            NodeKind::Union { .. } => "union",
            NodeKind::SmoothUnion { .. } => "smooth union",
        }
    }

    pub fn is_operation(&self) -> bool {
        matches!(self, NodeKind::Union { .. } | NodeKind::SmoothUnion { .. })
    }

    pub fn is_shape(&self) -> bool {
        !self.is_operation()
    }

    /// Ordered children of an operation; empty for shapes
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Union { children } | NodeKind::SmoothUnion { children, .. } => {
                children.as_slice()
            }
            NodeKind::Sphere { .. } | NodeKind::Box { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Union { children } | NodeKind::SmoothUnion { children, .. } => {
                Some(children)
            }
            NodeKind::Sphere { .. } | NodeKind::Box { .. } => None,
        }
    }
}

/// A node in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            parent: None,
            kind,
        }
    }

    /// Unique identifier, reused verbatim as the GLSL variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning operation, `None` for the root and for detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        self.kind.children()
    }

    pub fn is_operation(&self) -> bool {
        self.kind.is_operation()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }
}

// ============================================================================
// Parameter validation
// ============================================================================

pub(crate) fn validate_vec3(label: &str, v: Vec3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{label} must be finite, got {v}"
        )))
    }
}

pub(crate) fn validate_radius(radius: f32) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "radius must be finite and positive, got {radius}"
        )))
    }
}

pub(crate) fn validate_half_extents(half_extents: Vec3) -> Result<()> {
    validate_vec3("half extents", half_extents)?;
    if half_extents.min_element() > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "half extents must all be positive, got {half_extents}"
        )))
    }
}

pub(crate) fn validate_smoothness(smoothness: f32) -> Result<()> {
    if smoothness.is_finite() && (0.0..MAX_SMOOTHNESS).contains(&smoothness) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "smoothness must be in [0, {MAX_SMOOTHNESS}), got {smoothness}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_has_no_children() {
        let kind = NodeKind::Sphere {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            radius: 1.0,
        };
        assert!(kind.is_shape());
        assert!(kind.children().is_empty());
    }

    #[test]
    fn test_operation_children() {
        let kind = NodeKind::SmoothUnion {
            children: vec![NodeId::new(3), NodeId::new(1)],
            smoothness: 0.5,
        };
        assert!(kind.is_operation());
        assert_eq!(kind.children(), &[NodeId::new(3), NodeId::new(1)]);
    }

    #[test]
    fn test_radius_validation() {
        assert!(validate_radius(0.5).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f32::NAN).is_err());
        assert!(validate_radius(f32::INFINITY).is_err());
    }

    #[test]
    fn test_half_extents_validation() {
        assert!(validate_half_extents(Vec3::new(1.0, 0.1, 2.0)).is_ok());
        assert!(validate_half_extents(Vec3::new(1.0, 0.0, 2.0)).is_err());
        assert!(validate_half_extents(Vec3::new(1.0, f32::NAN, 2.0)).is_err());
    }

    #[test]
    fn test_smoothness_validation() {
        assert!(validate_smoothness(0.0).is_ok());
        assert!(validate_smoothness(0.5).is_ok());
        assert!(validate_smoothness(-0.1).is_err());
        assert!(validate_smoothness(f32::NAN).is_err());
        assert!(validate_smoothness(f32::INFINITY).is_err());
    }

    #[test]
    fn test_smoothness_upper_bound() {
        assert!(validate_smoothness(MAX_SMOOTHNESS - 0.5).is_ok());
        assert!(validate_smoothness(MAX_SMOOTHNESS).is_err());
        assert!(validate_smoothness(3000.0).is_err());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
    }
}
