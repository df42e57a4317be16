//! Kiln SDF - Scene graph and GLSL fragment generation
//!
//! A scene is a tree of shapes (spheres, boxes) under boolean operations
//! (union, smooth union). The tree compiles into the body of a GLSL
//! `map(vec3 p)` function that the ray-marching template calls for every
//! sample point.
//!
//! ## Key Types
//!
//! - [`SceneBuilder`] - Creates uniquely named nodes and attaches them to the root
//! - [`SceneGraph`] - Arena tree with reparenting and cycle rejection
//! - [`FragmentGenerator`] - Converts a tree into GLSL statements
//! - [`ShaderConfig`] - Render constants baked into the template
//!
//! ## Example
//!
//! ```rust
//! use kiln_sdf::{SceneBuilder, ShaderConfig, build_fragment_shader};
//! use glam::Vec3;
//!
//! let mut scene = SceneBuilder::new();
//! let blend = scene.add_smooth_union(0.5)?;
//! let a = scene.add_sphere(Vec3::new(1.0, 0.0, 0.0), 1.0, Vec3::X)?;
//! let b = scene.add_box(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, Vec3::Y)?;
//! scene.add_children(blend, &[a, b])?;
//!
//! let fragment = scene.generate_fragment();
//! assert!(fragment.contains("op_smooth_min(op1.dist, s0.dist, 0.5)"));
//!
//! let shader = build_fragment_shader(scene.graph(), scene.root(), &ShaderConfig::default())?;
//! assert!(shader.starts_with("#version 300 es"));
//! # Ok::<(), kiln_sdf::Error>(())
//! ```

mod builder;
mod error;
mod glsl_gen;
mod graph;
mod literal;
mod node;
mod shader;
mod uniforms;

pub use builder::{OPERATION_PREFIX, SHAPE_PREFIX, SceneBuilder};
pub use error::{Error, Result};
pub use glsl_gen::{
    FragmentGenerator, MAX_SMOOTHNESS, RESULT_REGISTER, SENTINEL_DISTANCE, generate_fragment,
};
pub use graph::SceneGraph;
pub use literal::{float_literal, vec2_literal, vec3_literal};
pub use node::{Node, NodeId, NodeKind};
pub use shader::{
    CONFIG_MARKER, FORMULAS_MARKER, SCENE_MARKER, ShaderConfig, build_fragment_shader,
    get_fragment_template, splice, vertex_shader,
};
pub use uniforms::{FRAME_BLOCK, FRAME_MEMBERS, FrameUniforms};
