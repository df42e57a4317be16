//! Kiln Math - Geometry value types and single source of truth SDF formulas
//!
//! Vectors are [`glam`] types: immutable `Copy` values with the usual
//! arithmetic (`+`, `-`, scalar `*`, `length`, `dot`, `cross`). Use
//! `normalize_or_zero` when a degenerate input must not produce NaN.
//!
//! The distance formulas are defined once in TOML specification files and
//! code is generated for both the CPU and the shader template so the two
//! never drift apart.
//!
//! # Architecture
//!
//! ```text
//! formulas/*.toml  →  [build.rs]  →  Rust code (this crate)
//!                                 →  GLSL code (for shaders)
//!                                 →  Test vectors
//!                                 →  Documentation
//! ```
//!
//! # Example
//!
//! ```rust
//! use kiln_math::{Vec3, sd_sphere, smooth_min};
//!
//! let d = sd_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0);
//! assert!((d - 1.0).abs() < 1e-6);
//!
//! // The blend never reports more than the hard minimum
//! assert!(smooth_min(0.2, 0.4, 0.5) <= 0.2);
//! ```

pub use glam::{Vec2, Vec3};

// Include the auto-generated Rust implementations
#[allow(clippy::doc_markdown)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/formulas.rs"));
}
pub use generated::*;

/// Get the GLSL code for all formulas
///
/// The code is generated from the same TOML specs as the Rust
/// implementations and is spliced into the fragment shader template.
pub fn get_glsl_code() -> &'static str {
    include_str!(concat!(env!("OUT_DIR"), "/formulas.glsl"))
}

/// Get the markdown documentation for all formulas
pub fn get_docs() -> &'static str {
    include_str!(concat!(env!("OUT_DIR"), "/FORMULAS.md"))
}
