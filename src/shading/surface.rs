//! Planet surface: elevation classification, tinting, day/night and rim haze.

use glam::{Vec2, Vec3, Vec4};

use super::{mix, smoothstep, VIEW_FORWARD};
use crate::noise::noise3;
use crate::params::ShadingParams;

/// Spatial frequency of the continent-scale elevation noise
pub const ELEVATION_FREQUENCY: f32 = 0.4;
/// Exponent biasing elevation low (more ocean than land)
pub const ELEVATION_EXPONENT: f32 = 1.5;

/// UV frequency of the ocean shimmer
pub const WAVE_UV_SCALE: f32 = 100.0;
/// Time scale of the ocean shimmer
pub const WAVE_TIME_SCALE: f32 = 0.05;
/// Brightness the ocean shimmers toward
pub const WAVE_BRIGHTNESS: f32 = 1.2;

pub const LAND_FREQUENCY: f32 = 2.0;
pub const LAND_BRIGHTNESS: f32 = 0.8;

pub const SNOW_FREQUENCY: f32 = 4.0;
pub const SNOW_BRIGHTNESS: f32 = 0.9;
pub const SNOW_LINE: f32 = 0.8;
pub const SNOW_LINE_JITTER: f32 = 0.05;
/// Width of the snow blend band above the (jittered) snow line
pub const SNOW_BAND: f32 = 0.05;

/// Coastline blend band in elevation space
pub const COAST_LOW: f32 = 0.4;
pub const COAST_HIGH: f32 = 0.5;

/// Terminator band in `dot(normal, sun)` space
pub const TERMINATOR_LOW: f32 = -0.2;
pub const TERMINATOR_HIGH: f32 = 0.5;
pub const NIGHT_BRIGHTNESS: f32 = 0.2;
pub const DAY_BRIGHTNESS: f32 = 1.2;

pub const HAZE_COLOR: Vec3 = Vec3::new(0.6, 0.8, 1.0);
pub const HAZE_EXPONENT: i32 = 4;
pub const HAZE_STRENGTH: f32 = 0.5;

/// One shaded surface point. Built per fragment and thrown away.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    /// World-space position
    pub position: Vec3,
    /// World-space unit normal
    pub normal: Vec3,
    /// Sphere texture coordinates
    pub uv: Vec2,
    /// Elevation in [0, 1]
    pub elevation: f32,
    /// Final lit color
    pub color: Vec3,
}

impl SurfaceSample {
    pub fn rgba(&self) -> Vec4 {
        self.color.extend(1.0)
    }
}

/// Snow tint together with the local snow line it applies above
#[derive(Debug, Clone, Copy)]
pub struct SnowCap {
    pub tint: Vec3,
    pub threshold: f32,
}

/// Surface shading model with its material colors and sun direction
#[derive(Debug, Clone)]
pub struct SurfaceShader {
    ocean: Vec3,
    land: Vec3,
    snow: Vec3,
    sun_direction: Vec3,
}

impl SurfaceShader {
    pub fn new(params: &ShadingParams) -> Self {
        Self {
            ocean: Vec3::from_array(params.ocean_color),
            land: Vec3::from_array(params.land_color),
            snow: Vec3::from_array(params.snow_color),
            sun_direction: params.sun_direction(),
        }
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    /// Elevation in [0, 1], biased toward 0
    pub fn elevation(&self, position: Vec3) -> f32 {
        let raw = noise3(position * ELEVATION_FREQUENCY) * 0.5 + 0.5;
        // Noise overshoots [-1, 1] slightly; powf of a negative base is NaN
        raw.clamp(0.0, 1.0).powf(ELEVATION_EXPONENT)
    }

    /// Ocean color with the time-driven shimmer
    pub fn ocean_tint(&self, uv: Vec2, time_s: f32) -> Vec3 {
        let wave = noise3((uv * WAVE_UV_SCALE).extend(time_s * WAVE_TIME_SCALE));
        self.ocean.lerp(self.ocean * WAVE_BRIGHTNESS, wave)
    }

    pub fn land_tint(&self, position: Vec3) -> Vec3 {
        let pattern = noise3(position * LAND_FREQUENCY);
        self.land.lerp(self.land * LAND_BRIGHTNESS, pattern)
    }

    pub fn snow_cap(&self, position: Vec3) -> SnowCap {
        let pattern = noise3(position * SNOW_FREQUENCY);
        SnowCap {
            tint: self.snow.lerp(self.snow * SNOW_BRIGHTNESS, pattern),
            threshold: SNOW_LINE + pattern * SNOW_LINE_JITTER,
        }
    }

    /// Blend ocean → land across the coastline band, then → snow above the snow line
    pub fn composite(&self, elevation: f32, ocean: Vec3, land: Vec3, snow: SnowCap) -> Vec3 {
        let color = ocean.lerp(land, smoothstep(COAST_LOW, COAST_HIGH, elevation));
        color.lerp(
            snow.tint,
            smoothstep(snow.threshold, snow.threshold + SNOW_BAND, elevation),
        )
    }

    /// Day fraction in [0, 1]: 0 on the night side, 1 in full sun
    pub fn daylight(&self, normal: Vec3) -> f32 {
        smoothstep(
            TERMINATOR_LOW,
            TERMINATOR_HIGH,
            normal.dot(self.sun_direction),
        )
    }

    /// Brightness multiplier from `NIGHT_BRIGHTNESS` to `DAY_BRIGHTNESS`
    pub fn brightness(&self, normal: Vec3) -> f32 {
        mix(NIGHT_BRIGHTNESS, DAY_BRIGHTNESS, self.daylight(normal))
    }

    /// Weight of the sky-blue haze blended in toward the disc edge.
    /// Reads the view-space normal, so it is at most `HAZE_STRENGTH` on the visible side.
    pub fn haze(&self, view_normal: Vec3) -> f32 {
        let rim = (1.0 - view_normal.dot(VIEW_FORWARD)).max(0.0);
        rim.powi(HAZE_EXPONENT) * HAZE_STRENGTH
    }

    /// Shade one surface point. `normal` is world space, `view_normal` the same normal
    /// rotated into the camera's frame.
    pub fn shade(
        &self,
        position: Vec3,
        normal: Vec3,
        view_normal: Vec3,
        uv: Vec2,
        time_s: f32,
    ) -> SurfaceSample {
        let elevation = self.elevation(position);
        let base = self.composite(
            elevation,
            self.ocean_tint(uv, time_s),
            self.land_tint(position),
            self.snow_cap(position),
        );
        let lit = base * self.brightness(normal);
        let color = lit.lerp(HAZE_COLOR, self.haze(view_normal));

        SurfaceSample {
            position,
            normal,
            uv,
            elevation,
            color,
        }
    }
}
