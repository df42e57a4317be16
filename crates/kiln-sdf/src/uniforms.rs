//! Per-frame uniform data
//!
//! The host owns camera math and uploads this block after every program
//! rebuild, since uniform locations do not survive recompilation.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Name of the std140 uniform block in the fragment template
pub const FRAME_BLOCK: &str = "Frame";

/// Member names inside [`FRAME_BLOCK`], in layout order
pub const FRAME_MEMBERS: [&str; 3] = ["iResolution", "iCameraOrigin", "iLookAt"];

/// GPU-ready frame uniforms
/// This struct must match the std140 `Frame` block layout exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    _pad0: [f32; 2],
    pub camera_origin: [f32; 3],
    _pad1: f32,
    pub look_at: [f32; 3],
    _pad2: f32,
}

impl FrameUniforms {
    pub fn new(resolution: Vec2, camera_origin: Vec3, look_at: Vec3) -> Self {
        Self {
            resolution: resolution.to_array(),
            _pad0: [0.0; 2],
            camera_origin: camera_origin.to_array(),
            _pad1: 0.0,
            look_at: look_at.to_array(),
            _pad2: 0.0,
        }
    }

    /// Raw bytes ready for a uniform buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        // Startup camera: looking at the origin from above and behind
        Self::new(
            Vec2::new(1280.0, 720.0),
            Vec3::new(3.0, 3.0, -3.0),
            Vec3::ZERO,
        )
    }
}
