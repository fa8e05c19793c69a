//! Parameter definitions with units and documented semantics.
//!
//! All tunable constants of the globe live here:
//! - World units (the planet radius is 5 units)
//! - Seconds and radians for anything animated
//! - Linear RGB in [0, 1] for colors

mod camera;
mod planet;
mod render;
mod stars;

// Re-export all types
pub use camera::OrbitControlsParams;
pub use planet::{AtmosphereParams, PlanetParams, ShadingParams, SunParams};
pub use render::RenderConfig;
pub use stars::StarFieldParams;

/// Complete configuration of a globe session
#[derive(Debug, Clone, Default)]
pub struct GlobeConfig {
    pub planet: PlanetParams,
    pub shading: ShadingParams,
    pub atmosphere: AtmosphereParams,
    pub sun: SunParams,
    pub stars: StarFieldParams,
    pub controls: OrbitControlsParams,
    pub render: RenderConfig,
}

/// Convert a `0xRRGGBB` literal to linear RGB components in [0, 1]
pub const fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hex_rgb_channels() {
        assert_eq!(hex_rgb(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(hex_rgb(0x000000), [0.0, 0.0, 0.0]);

        let ocean = hex_rgb(0x001a33);
        assert_eq!(ocean[0], 0.0);
        assert!((ocean[1] - 26.0 / 255.0).abs() < 1e-6);
        assert!((ocean[2] - 51.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_sun_direction_points_at_sun() {
        let config = GlobeConfig::default();
        let toward_sun = Vec3::from_array(config.sun.position).normalize();
        let direction = config.shading.sun_direction();

        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.dot(toward_sun) > 0.9999);
    }

    #[test]
    fn test_atmosphere_shell_encloses_planet() {
        let config = GlobeConfig::default();
        assert!(config.atmosphere.radius > config.planet.radius);
    }
}
