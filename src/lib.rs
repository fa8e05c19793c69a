//! Globe - a procedural planet renderer
//!
//! Noise-driven ocean, land and snow, a day/night terminator and an additive
//! atmosphere rim, orbiting camera and a static star field.

pub mod camera;
pub mod cli;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod preview;
pub mod rendering;
pub mod scene;
pub mod session;
pub mod shader;
pub mod shading;
pub mod stars;
