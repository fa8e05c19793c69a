//! CPU reference of the planet and atmosphere fragment programs.
//!
//! Each function here has a line-for-line counterpart in `shaders/planet.wgsl` or
//! `shaders/atmosphere.wgsl`. The GPU path is what the window shows; this path is what
//! tests and the CPU preview evaluate.

pub mod atmosphere;
pub mod surface;

use glam::Vec3;

pub use atmosphere::AtmosphereShader;
pub use surface::{SnowCap, SurfaceSample, SurfaceShader};

/// Axis the rim terms measure view-space normals against: +Z points at the camera.
/// Terminator and sun tint stay in world space.
pub const VIEW_FORWARD: Vec3 = Vec3::Z;

/// Hermite interpolation between `edge0` and `edge1`, clamped to [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend `a + (b - a) * t`
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
