//! Atmosphere shell glow, drawn on back faces with additive blending.

use glam::{Vec3, Vec4};

use super::VIEW_FORWARD;
use crate::params::ShadingParams;

/// `dot(view_normal, VIEW_FORWARD)` at which the glow fades out
pub const GLOW_FALLOFF: f32 = 0.7;

pub const SKY_COLOR: Vec3 = Vec3::new(0.3, 0.6, 1.0);
pub const SUNLIT_SKY_COLOR: Vec3 = Vec3::new(0.8, 0.9, 1.0);

/// Atmosphere shading model
#[derive(Debug, Clone)]
pub struct AtmosphereShader {
    sun_direction: Vec3,
}

impl AtmosphereShader {
    pub fn new(params: &ShadingParams) -> Self {
        Self {
            sun_direction: params.sun_direction(),
        }
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    /// Glow strength from the view-space normal; grows toward grazing angles
    pub fn intensity(&self, view_normal: Vec3) -> f32 {
        let base = (GLOW_FALLOFF - view_normal.dot(VIEW_FORWARD)).max(0.0);
        base * base
    }

    /// Sky tint from the world-space normal, brighter on the sun-facing hemisphere
    pub fn tint(&self, normal: Vec3) -> Vec3 {
        let sun_effect = normal.dot(self.sun_direction).max(0.0);
        SKY_COLOR.lerp(SUNLIT_SKY_COLOR, sun_effect)
    }

    /// Fragment output of one shell fragment, alpha included
    pub fn shade(&self, normal: Vec3, view_normal: Vec3) -> Vec4 {
        self.tint(normal).extend(1.0) * self.intensity(view_normal)
    }

    /// Additive blend onto `dst` as the GPU does it: the fragment is clamped to the
    /// target's [0, 1] range, then `dst + rgb * a`
    pub fn blend_over(&self, dst: Vec3, normal: Vec3, view_normal: Vec3) -> Vec3 {
        let src = self.shade(normal, view_normal).clamp(Vec4::ZERO, Vec4::ONE);
        dst + src.truncate() * src.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader() -> AtmosphereShader {
        AtmosphereShader::new(&ShadingParams::default())
    }

    /// Unit normal with the given `dot(normal, VIEW_FORWARD)`, used as both normals
    fn normal_with_facing(facing: f32) -> Vec3 {
        let lateral = (1.0 - facing * facing).max(0.0).sqrt();
        Vec3::new(0.0, lateral, facing)
    }

    #[test]
    fn test_intensity_grows_toward_grazing() {
        let s = shader();
        let mut previous = s.intensity(normal_with_facing(1.0));
        for step in 1..=200 {
            let facing = 1.0 - 2.0 * step as f32 / 200.0;
            let intensity = s.intensity(normal_with_facing(facing));
            assert!(
                intensity >= previous,
                "intensity fell from {} to {} at facing {}",
                previous,
                intensity,
                facing
            );
            previous = intensity;
        }
        assert!(previous > 2.8); // (0.7 + 1)^2
    }

    #[test]
    fn test_sun_side_is_brighter() {
        let s = shader();
        let toward = s.tint(s.sun_direction());
        let away = s.tint(-s.sun_direction());
        assert!((toward - SUNLIT_SKY_COLOR).abs().max_element() < 1e-5);
        assert_eq!(away, SKY_COLOR);
    }

    #[test]
    fn test_shade_scales_alpha_with_intensity() {
        let s = shader();
        let normal = normal_with_facing(-0.5);
        let rgba = s.shade(normal, normal);
        assert!((rgba.w - s.intensity(normal)).abs() < 1e-6);
    }

    #[test]
    fn test_glow_follows_view_normal_and_tint_follows_world_normal() {
        let s = shader();
        let view_normal = normal_with_facing(-0.2);
        let toward = s.shade(s.sun_direction(), view_normal);
        let away = s.shade(-s.sun_direction(), view_normal);

        // Same viewing angle, same glow strength wherever the fragment sits in the world
        assert_eq!(toward.w, away.w);
        assert!((toward.w - 0.81).abs() < 1e-5); // (0.7 + 0.2)^2
        assert!(toward.x > away.x);
    }

    #[test]
    fn test_blend_adds_nothing_facing_viewer() {
        let s = shader();
        let dst = Vec3::new(0.1, 0.2, 0.3);
        // Past the falloff the glow is exactly zero
        let normal = normal_with_facing(0.9);
        assert_eq!(s.blend_over(dst, normal, normal), dst);
    }

    #[test]
    fn test_blend_clamps_bright_fragments() {
        let s = shader();
        let normal = normal_with_facing(-1.0);
        let added = s.blend_over(Vec3::ZERO, normal, normal);
        // Intensity is ~2.89 but the clamped fragment can add at most its tint
        assert!(added.max_element() <= 1.0 + 1e-6);
        assert!(added.min_element() > 0.0);
    }
}
