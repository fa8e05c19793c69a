//! Planet, atmosphere and sun parameters.

use glam::Vec3;

use super::hex_rgb;

/// Planet body: geometry and spin
#[derive(Debug, Clone)]
pub struct PlanetParams {
    /// Sphere radius (world units)
    pub radius: f32,

    /// Longitudinal segments of the surface mesh
    pub width_segments: u32,

    /// Latitudinal segments of the surface mesh
    pub height_segments: u32,

    /// Spin about the vertical axis (radians per second of elapsed time)
    pub spin_rate_rad_per_s: f32,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            width_segments: 192, // Fine enough that the terminator never shows facets
            height_segments: 192,
            spin_rate_rad_per_s: 0.05,
        }
    }
}

/// Surface shading inputs shared by the planet and its atmosphere
///
/// The sun direction is stored once here; both shading models read it from this struct
/// so they can never disagree.
#[derive(Debug, Clone)]
pub struct ShadingParams {
    /// Deep water base color (linear RGB)
    pub ocean_color: [f32; 3],

    /// Lowland base color (linear RGB)
    pub land_color: [f32; 3],

    /// Snow cap base color (linear RGB)
    pub snow_color: [f32; 3],

    /// Direction toward the sun, not necessarily normalized
    pub sun_direction: [f32; 3],
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            ocean_color: hex_rgb(0x001a33),
            land_color: hex_rgb(0x2d4f2f),
            snow_color: hex_rgb(0xffffff),
            sun_direction: [1.0, 0.1, 0.1],
        }
    }
}

impl ShadingParams {
    /// Unit vector toward the sun
    pub fn sun_direction(&self) -> Vec3 {
        Vec3::from_array(self.sun_direction)
            .try_normalize()
            .unwrap_or(Vec3::X)
    }
}

/// Atmosphere shell geometry
#[derive(Debug, Clone)]
pub struct AtmosphereParams {
    /// Shell radius (world units), slightly above the planet surface
    pub radius: f32,

    /// Longitudinal segments of the shell mesh
    pub width_segments: u32,

    /// Latitudinal segments of the shell mesh
    pub height_segments: u32,
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self {
            radius: 5.1,
            width_segments: 64,
            height_segments: 64,
        }
    }
}

/// Sun body: an unlit sphere far from the planet
#[derive(Debug, Clone)]
pub struct SunParams {
    /// Sphere radius (world units)
    pub radius: f32,

    /// Sphere tessellation (both axes)
    pub segments: u32,

    /// World position of the sun's center
    pub position: [f32; 3],

    /// Flat emissive color (linear RGB)
    pub color: [f32; 3],
}

impl Default for SunParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            segments: 32,
            position: [100.0, 10.0, 10.0],
            color: hex_rgb(0xffff00),
        }
    }
}
