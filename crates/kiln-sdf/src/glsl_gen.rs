//! Scene graph to GLSL code generator
//!
//! Walks the tree in pre-order and emits one statement block per node into
//! the body of the template's `map(vec3 p)` function. Each node declares a
//! `MaterialDist` register named after the node and merges it into the
//! register it was handed by its parent:
//!
//! ```text
//! MaterialDist s0 = MaterialDist(color, true, sd_sphere(p - pos, r));
//! if (s0.dist < op0.dist) { op0.color = s0.color; op0.is_lit = s0.is_lit; }
//! op0.dist = min(op0.dist, s0.dist);      // folded by the owning operation
//! ```
//!
//! Operations start from a sentinel register that is never closer than a
//! real shape, so empty operations merge as a no-op.

// String writing is infallible, so .unwrap() is safe here
#![allow(clippy::unwrap_used)]

use std::fmt::Write;

use glam::Vec3;

use crate::error::Result;
use crate::graph::SceneGraph;
use crate::literal::{float_literal, vec3_literal};
use crate::node::{NodeId, NodeKind};

/// Register declared by the template that the tree root merges into
pub const RESULT_REGISTER: &str = "res";

/// Distance an empty operation reports
pub const SENTINEL_DISTANCE: f32 = 1000.0;

/// Exclusive upper bound for smooth union smoothness.
///
/// Smooth folds start from the sentinel, and `op_smooth_min` only blends
/// inputs closer than `k` to each other. Keeping `k` well below the sentinel
/// leaves any shape nearer than `SENTINEL_DISTANCE - MAX_SMOOTHNESS`
/// untouched by it.
pub const MAX_SMOOTHNESS: f32 = SENTINEL_DISTANCE / 10.0;

/// Names the template already declares inside `map`
const RESERVED_NAMES: [&str; 2] = ["p", RESULT_REGISTER];

/// Whether `name` can be declared as a register inside `map`
pub(crate) fn is_register_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("gl_")
        && !name.contains("__")
        && !RESERVED_NAMES.contains(&name)
}

/// How an operation combines its children's distances
#[derive(Debug, Clone, Copy, PartialEq)]
enum Fold {
    Hard,
    Smooth(f32),
}

/// Generates the `map` body for a scene graph
pub struct FragmentGenerator<'a> {
    graph: &'a SceneGraph,
}

impl<'a> FragmentGenerator<'a> {
    pub fn new(graph: &'a SceneGraph) -> Self {
        Self { graph }
    }

    /// Generate the fragment for the subtree at `root`, merged into [`RESULT_REGISTER`]
    pub fn generate(&self, root: NodeId) -> Result<String> {
        self.graph.node(root)?;
        Ok(self.emit_root(root))
    }

    pub(crate) fn generate_root(&self) -> String {
        self.emit_root(self.graph.root())
    }

    fn emit_root(&self, root: NodeId) -> String {
        let mut code = self.visit(root, RESULT_REGISTER);
        let name = self.graph.get(root).name();
        writeln!(
            code,
            "    {r}.dist = min({r}.dist, {n}.dist);",
            r = RESULT_REGISTER,
            n = name
        )
        .unwrap();
        code
    }

    /// Dispatch on node kind. Every kind has a case; there is no fallback.
    pub fn visit(&self, id: NodeId, dest: &str) -> String {
        let node = self.graph.get(id);
        match node.kind() {
            NodeKind::Sphere {
                position,
                color,
                radius,
            } => self.visit_sphere(node.name(), *position, *color, *radius, dest),
            NodeKind::Box {
                position,
                color,
                half_extents,
            } => self.visit_box(node.name(), *position, *color, *half_extents, dest),
            NodeKind::Union { children } => self.visit_union(node.name(), children, dest),
            NodeKind::SmoothUnion {
                children,
                smoothness,
            } => self.visit_smooth_union(node.name(), children, *smoothness, dest),
        }
    }

    pub fn visit_sphere(
        &self,
        name: &str,
        position: Vec3,
        color: Vec3,
        radius: f32,
        dest: &str,
    ) -> String {
        let distance = format!(
            "sd_sphere(p - {}, {})",
            vec3_literal(position),
            float_literal(radius)
        );
        emit_shape(name, color, &distance, dest)
    }

    pub fn visit_box(
        &self,
        name: &str,
        position: Vec3,
        color: Vec3,
        half_extents: Vec3,
        dest: &str,
    ) -> String {
        let distance = format!(
            "sd_box(p - {}, {})",
            vec3_literal(position),
            vec3_literal(half_extents)
        );
        emit_shape(name, color, &distance, dest)
    }

    pub fn visit_union(&self, name: &str, children: &[NodeId], dest: &str) -> String {
        self.emit_operation(name, children, Fold::Hard, dest)
    }

    pub fn visit_smooth_union(
        &self,
        name: &str,
        children: &[NodeId],
        smoothness: f32,
        dest: &str,
    ) -> String {
        self.emit_operation(name, children, Fold::Smooth(smoothness), dest)
    }

    fn emit_operation(&self, name: &str, children: &[NodeId], fold: Fold, dest: &str) -> String {
        let mut code = String::new();
        writeln!(
            code,
            "    MaterialDist {} = MaterialDist({}, true, {});",
            name,
            vec3_literal(Vec3::ZERO),
            float_literal(SENTINEL_DISTANCE)
        )
        .unwrap();

        for &child in children {
            // Children merge into this node's register, not the caller's
            code.push_str(&self.visit(child, name));

            let child_name = self.graph.get(child).name();
            let folded = match fold {
                Fold::Hard => format!("min({}.dist, {}.dist)", name, child_name),
                Fold::Smooth(k) => format!(
                    "op_smooth_min({}.dist, {}.dist, {})",
                    name,
                    child_name,
                    float_literal(k)
                ),
            };
            writeln!(code, "    {}.dist = {};", name, folded).unwrap();
        }

        code.push_str(&emit_merge(name, dest));
        code
    }
}

fn emit_shape(name: &str, color: Vec3, distance: &str, dest: &str) -> String {
    let mut code = String::new();
    writeln!(
        code,
        "    MaterialDist {} = MaterialDist({}, true, {});",
        name,
        vec3_literal(color),
        distance
    )
    .unwrap();
    code.push_str(&emit_merge(name, dest));
    code
}

/// Closer wins: copy color and lighting from `src` when it is nearer than `dest`.
/// Distances are folded separately by the owning operation.
fn emit_merge(src: &str, dest: &str) -> String {
    let mut code = String::new();
    writeln!(code, "    if ({s}.dist < {d}.dist) {{", s = src, d = dest).unwrap();
    writeln!(code, "        {d}.color = {s}.color;", s = src, d = dest).unwrap();
    writeln!(code, "        {d}.is_lit = {s}.is_lit;", s = src, d = dest).unwrap();
    writeln!(code, "    }}").unwrap();
    code
}

/// Generate the GLSL fragment for the tree rooted at `root`
pub fn generate_fragment(graph: &SceneGraph, root: NodeId) -> Result<String> {
    FragmentGenerator::new(graph).generate(root)
}
