//! Arena-backed scene graph
//!
//! Parent and child links are stored as [`NodeId`] indices, so reparenting is
//! a table update and the cycle check is a walk up the parent chain. Slots are
//! never freed: a removed node is only detached and can be attached again.

use std::iter;

use glam::Vec3;
use tracing::debug;

use crate::error::{Error, Result};
use crate::glsl_gen::is_register_name;
use crate::node::{
    Node, NodeId, NodeKind, validate_half_extents, validate_radius, validate_smoothness,
    validate_vec3,
};

/// A tree of shapes and boolean operations with a single operation root
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
    revision: u64,
}

impl SceneGraph {
    /// Create a graph whose root is an empty union called `root_name`.
    /// Names are minted by [`SceneBuilder`](crate::SceneBuilder).
    pub(crate) fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        debug_assert!(is_register_name(&root_name), "{root_name}");
        let root = Node::new(
            root_name,
            NodeKind::Union {
                children: Vec::new(),
            },
        );
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
            revision: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Counter bumped by every edit that changes the generated shader
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of nodes ever created, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(Error::UnknownNode(id))
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent())
    }

    /// Look a node up by its unique name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name() == name)
            .map(NodeId::new)
    }

    /// Owners of `id`, nearest first. Empty for the root and detached nodes.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.nodes.get(id.index()).and_then(|n| n.parent());
        iter::successors(start, |p| self.nodes[p.index()].parent())
    }

    /// `id` and its whole subtree in pre-order
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.node(id)?;
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.nodes[current.index()].children().iter().rev());
        }
        Ok(order)
    }

    /// Whether `id` is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    /// Move each node under `parent`, appending in the given order.
    ///
    /// A node owned by another operation is detached from it first. A node
    /// already owned by `parent` keeps its position. The call is
    /// all-or-nothing: every node is checked before anything is moved.
    pub fn add_children(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<()> {
        let parent_node = self.node(parent)?;
        if !parent_node.is_operation() {
            return Err(Error::WrongKind {
                name: parent_node.name().to_string(),
                expected: "an operation",
            });
        }

        for &child in nodes {
            let child_node = self.node(child)?;
            if child == parent || self.ancestors(parent).any(|a| a == child) {
                return Err(Error::Cycle {
                    parent: self.nodes[parent.index()].name().to_string(),
                    child: child_node.name().to_string(),
                });
            }
            if child == self.root {
                return Err(Error::RootReparent(child_node.name().to_string()));
            }
        }

        let mut changed = false;
        for &child in nodes {
            let previous = self.nodes[child.index()].parent();
            if previous == Some(parent) {
                continue;
            }
            if let Some(previous) = previous {
                self.unlink(previous, child);
            }
            self.link(parent, child);
            changed = true;

            debug!(
                child = self.nodes[child.index()].name(),
                parent = self.nodes[parent.index()].name(),
                "Attached node"
            );
        }

        if changed {
            self.revision += 1;
        }
        Ok(())
    }

    /// Detach `node` from `parent`. Does nothing if it is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(node)?;

        if self.nodes[node.index()].parent() != Some(parent) {
            return Ok(());
        }

        self.unlink(parent, node);
        self.revision += 1;

        debug!(
            child = self.nodes[node.index()].name(),
            parent = self.nodes[parent.index()].name(),
            "Detached node"
        );
        Ok(())
    }

    // ========================================================================
    // Parameter edits
    // ========================================================================

    pub fn set_position(&mut self, id: NodeId, value: Vec3) -> Result<()> {
        validate_vec3("position", value)?;
        let node = self.node_mut(id)?;
        match node.kind_mut() {
            NodeKind::Sphere { position, .. } | NodeKind::Box { position, .. } => {
                *position = value;
            }
            NodeKind::Union { .. } | NodeKind::SmoothUnion { .. } => {
                return Err(wrong_kind(node, "a shape"));
            }
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_color(&mut self, id: NodeId, value: Vec3) -> Result<()> {
        validate_vec3("color", value)?;
        let node = self.node_mut(id)?;
        match node.kind_mut() {
            NodeKind::Sphere { color, .. } | NodeKind::Box { color, .. } => {
                *color = value;
            }
            NodeKind::Union { .. } | NodeKind::SmoothUnion { .. } => {
                return Err(wrong_kind(node, "a shape"));
            }
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_radius(&mut self, id: NodeId, value: f32) -> Result<()> {
        validate_radius(value)?;
        let node = self.node_mut(id)?;
        match node.kind_mut() {
            NodeKind::Sphere { radius, .. } => *radius = value,
            _ => return Err(wrong_kind(node, "a sphere")),
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_half_extents(&mut self, id: NodeId, value: Vec3) -> Result<()> {
        validate_half_extents(value)?;
        let node = self.node_mut(id)?;
        match node.kind_mut() {
            NodeKind::Box { half_extents, .. } => *half_extents = value,
            _ => return Err(wrong_kind(node, "a box")),
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_smoothness(&mut self, id: NodeId, value: f32) -> Result<()> {
        validate_smoothness(value)?;
        let node = self.node_mut(id)?;
        match node.kind_mut() {
            NodeKind::SmoothUnion { smoothness, .. } => *smoothness = value,
            _ => return Err(wrong_kind(node, "a smooth union")),
        }
        self.revision += 1;
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Append a new node under `parent`. Names are minted by the builder.
    pub(crate) fn insert(&mut self, parent: NodeId, name: String, kind: NodeKind) -> NodeId {
        debug_assert!(is_register_name(&name), "{name}");
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(name, kind));
        self.link(parent, id);
        self.revision += 1;
        id
    }

    /// Index a node reached through this graph's own links
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(Error::UnknownNode(id))
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent.index()].kind_mut().children_mut() {
            children.push(child);
            self.nodes[child.index()].set_parent(Some(parent));
        }
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent.index()].kind_mut().children_mut() {
            children.retain(|&c| c != child);
        }
        self.nodes[child.index()].set_parent(None);
    }
}

fn wrong_kind(node: &Node, expected: &'static str) -> Error {
    Error::WrongKind {
        name: node.name().to_string(),
        expected,
    }
}
