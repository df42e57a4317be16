//! Scene builder - the only place nodes are created
//!
//! Every node gets a name minted from a per-builder counter: shapes are
//! `s0, s1, ...` and operations `op0, op1, ...` with `op0` reserved for the
//! root. Names double as GLSL identifiers, so they must be unique within the
//! tree and must never start with `gl_` or contain `__`.

use glam::Vec3;
use tracing::debug;

use crate::error::Result;
use crate::glsl_gen::FragmentGenerator;
use crate::graph::SceneGraph;
use crate::node::{
    NodeId, NodeKind, validate_half_extents, validate_radius, validate_smoothness, validate_vec3,
};

/// Name prefix for shape nodes
pub const SHAPE_PREFIX: &str = "s";

/// Name prefix for operation nodes
pub const OPERATION_PREFIX: &str = "op";

/// Mutation facade over a [`SceneGraph`] that mints unique node names
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    graph: SceneGraph,
    next_shape: u32,
    next_operation: u32,
}

impl SceneBuilder {
    /// Create a builder whose graph holds only the root union `op0`
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(format!("{OPERATION_PREFIX}0")),
            next_shape: 0,
            next_operation: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access for structural and parameter edits on existing nodes
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    // ========================================================================
    // Node creation
    // ========================================================================

    /// Add a sphere under the root
    pub fn add_sphere(&mut self, position: Vec3, radius: f32, color: Vec3) -> Result<NodeId> {
        validate_vec3("position", position)?;
        validate_vec3("color", color)?;
        validate_radius(radius)?;

        let name = self.next_shape_name();
        Ok(self.attach_to_root(
            name,
            NodeKind::Sphere {
                position,
                color,
                radius,
            },
        ))
    }

    /// Add a box under the root. `dimensions` are half-extents per axis.
    pub fn add_box(&mut self, position: Vec3, dimensions: Vec3, color: Vec3) -> Result<NodeId> {
        validate_vec3("position", position)?;
        validate_vec3("color", color)?;
        validate_half_extents(dimensions)?;

        let name = self.next_shape_name();
        Ok(self.attach_to_root(
            name,
            NodeKind::Box {
                position,
                color,
                half_extents: dimensions,
            },
        ))
    }

    /// Add an empty hard union under the root
    pub fn add_union(&mut self) -> NodeId {
        let name = self.next_operation_name();
        self.attach_to_root(
            name,
            NodeKind::Union {
                children: Vec::new(),
            },
        )
    }

    /// Add an empty smooth union under the root. A smoothness of zero is a hard union.
    pub fn add_smooth_union(&mut self, smoothness: f32) -> Result<NodeId> {
        validate_smoothness(smoothness)?;

        let name = self.next_operation_name();
        Ok(self.attach_to_root(
            name,
            NodeKind::SmoothUnion {
                children: Vec::new(),
                smoothness,
            },
        ))
    }

    // ========================================================================
    // Graph passthroughs
    // ========================================================================

    /// See [`SceneGraph::add_children`]
    pub fn add_children(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<()> {
        self.graph.add_children(parent, nodes)
    }

    /// See [`SceneGraph::remove_child`]
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.graph.remove_child(parent, node)
    }

    /// Generate the GLSL fragment for the whole tree
    pub fn generate_fragment(&self) -> String {
        FragmentGenerator::new(&self.graph).generate_root()
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn next_shape_name(&mut self) -> String {
        let name = format!("{SHAPE_PREFIX}{}", self.next_shape);
        self.next_shape += 1;
        name
    }

    fn next_operation_name(&mut self) -> String {
        let name = format!("{OPERATION_PREFIX}{}", self.next_operation);
        self.next_operation += 1;
        name
    }

    fn attach_to_root(&mut self, name: String, kind: NodeKind) -> NodeId {
        debug!(name = name.as_str(), kind = kind.label(), "Created node");
        let root = self.graph.root();
        self.graph.insert(root, name, kind)
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MAX_SMOOTHNESS};

    #[test]
    fn test_names_are_minted_per_family() {
        let mut builder = SceneBuilder::new();
        let s0 = builder.add_sphere(Vec3::ZERO, 1.0, Vec3::Z).unwrap();
        let op1 = builder.add_smooth_union(0.5).unwrap();
        let s1 = builder.add_box(Vec3::ZERO, Vec3::ONE, Vec3::X).unwrap();
        let op2 = builder.add_union();

        let graph = builder.graph();
        assert_eq!(graph.node(builder.root()).unwrap().name(), "op0");
        assert_eq!(graph.node(s0).unwrap().name(), "s0");
        assert_eq!(graph.node(op1).unwrap().name(), "op1");
        assert_eq!(graph.node(s1).unwrap().name(), "s1");
        assert_eq!(graph.node(op2).unwrap().name(), "op2");
    }

    #[test]
    fn test_new_nodes_attach_to_root_in_order() {
        let mut builder = SceneBuilder::new();
        let a = builder.add_sphere(Vec3::ZERO, 1.0, Vec3::ONE).unwrap();
        let b = builder.add_union();
        let c = builder.add_box(Vec3::ONE, Vec3::ONE, Vec3::ONE).unwrap();

        assert_eq!(builder.graph().children(builder.root()).unwrap(), &[a, b, c]);
    }

    #[test]
    fn test_invalid_parameters_rejected_without_side_effects() {
        let mut builder = SceneBuilder::new();

        assert!(matches!(
            builder.add_sphere(Vec3::ZERO, 0.0, Vec3::ONE),
            Err(Error::InvalidParameter(_))
        ));
        assert!(builder.add_box(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0), Vec3::ONE).is_err());
        assert!(builder.add_smooth_union(-0.5).is_err());
        assert!(builder.add_smooth_union(MAX_SMOOTHNESS).is_err());
        assert!(builder.add_sphere(Vec3::splat(f32::NAN), 1.0, Vec3::ONE).is_err());

        assert_eq!(builder.graph().len(), 1);
        assert_eq!(builder.graph().revision(), 0);

        // Rejected calls must not burn a name
        let s = builder.add_sphere(Vec3::ZERO, 1.0, Vec3::ONE).unwrap();
        assert_eq!(builder.graph().node(s).unwrap().name(), "s0");
    }

    #[test]
    fn test_zero_smoothness_accepted() {
        let mut builder = SceneBuilder::new();
        assert!(builder.add_smooth_union(0.0).is_ok());
    }
}
