//! Scene composition: the planet aggregate, the sun and the star field.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::frame::FrameContext;
use crate::mesh::SphereMesh;
use crate::params::{
    AtmosphereParams, GlobeConfig, PlanetParams, ShadingParams, StarFieldParams, SunParams,
};
use crate::shader::{AtmosphereUniforms, PlanetUniforms, StarUniforms, SunUniforms};
use crate::shading::{AtmosphereShader, SurfaceShader};
use crate::stars::StarField;

/// Planet surface together with its atmosphere shell
///
/// The shell is only ever created, updated and dropped with the planet.
pub struct Planet {
    pub surface: SphereMesh,
    pub atmosphere: SphereMesh,
    shading: ShadingParams,
    rotation_rad: f32,
    time_s: f32,
}

impl Planet {
    pub fn new(
        planet: &PlanetParams,
        atmosphere: &AtmosphereParams,
        shading: &ShadingParams,
    ) -> Self {
        Self {
            surface: SphereMesh::new(
                planet.radius,
                planet.width_segments,
                planet.height_segments,
            ),
            atmosphere: SphereMesh::new(
                atmosphere.radius,
                atmosphere.width_segments,
                atmosphere.height_segments,
            ),
            shading: shading.clone(),
            rotation_rad: 0.0,
            time_s: 0.0,
        }
    }

    pub fn rotation_rad(&self) -> f32 {
        self.rotation_rad
    }

    pub fn time_s(&self) -> f32 {
        self.time_s
    }

    pub fn shading(&self) -> &ShadingParams {
        &self.shading
    }

    /// Surface transform: spin about +Y
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_rad)
    }

    /// The shell is radially symmetric and stays unrotated
    pub fn atmosphere_model(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    pub fn surface_shader(&self) -> SurfaceShader {
        SurfaceShader::new(&self.shading)
    }

    pub fn atmosphere_shader(&self) -> AtmosphereShader {
        AtmosphereShader::new(&self.shading)
    }
}

/// Unlit sphere marking where the light comes from
pub struct Sun {
    pub mesh: SphereMesh,
    pub position: Vec3,
    pub color: Vec3,
}

impl Sun {
    pub fn new(params: &SunParams) -> Self {
        Self {
            mesh: SphereMesh::new(params.radius, params.segments, params.segments),
            position: Vec3::from_array(params.position),
            color: Vec3::from_array(params.color),
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

/// Every uniform block of one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneUniforms {
    pub planet: PlanetUniforms,
    pub atmosphere: AtmosphereUniforms,
    pub sun: SunUniforms,
    pub stars: StarUniforms,
}

/// Everything drawn each frame
pub struct Scene {
    pub planet: Planet,
    pub sun: Sun,
    pub stars: StarField,
    star_params: StarFieldParams,
}

impl Scene {
    /// Build all entities once. `rng` only feeds the star field.
    pub fn compose<R: Rng + ?Sized>(config: &GlobeConfig, rng: &mut R) -> Self {
        let planet = Planet::new(&config.planet, &config.atmosphere, &config.shading);
        let sun = Sun::new(&config.sun);
        let stars = StarField::generate(&config.stars, rng);

        log::info!(
            "Scene composed: planet {} verts, atmosphere {} verts, sun {} verts, {} stars",
            planet.surface.vertices.len(),
            planet.atmosphere.vertices.len(),
            sun.mesh.vertices.len(),
            stars.len()
        );

        Self {
            planet,
            sun,
            stars,
            star_params: config.stars.clone(),
        }
    }

    pub fn star_params(&self) -> &StarFieldParams {
        &self.star_params
    }

    /// Apply the frame's time-derived state: planet rotation and the shimmer clock
    pub fn update(&mut self, frame: &FrameContext) {
        self.planet.rotation_rad = frame.rotation_rad;
        self.planet.time_s = frame.elapsed_s;
    }

    /// Build this frame's uniform blocks for a camera and a viewport in pixels
    pub fn uniforms(&self, camera: &PerspectiveCamera, viewport: [f32; 2]) -> SceneUniforms {
        let view = camera.view();
        let proj = camera.projection();
        let view_proj = (proj * view).to_cols_array_2d();
        let view_cols = view.to_cols_array_2d();

        // One value feeds both the surface and the shell
        let shading = self.planet.shading();
        let sun_direction = shading.sun_direction().to_array();

        SceneUniforms {
            planet: PlanetUniforms {
                view_proj,
                view: view_cols,
                model: self.planet.model().to_cols_array_2d(),
                sun_direction,
                time: self.planet.time_s,
                ocean_color: shading.ocean_color,
                _padding0: 0.0,
                land_color: shading.land_color,
                _padding1: 0.0,
                snow_color: shading.snow_color,
                _padding2: 0.0,
            },
            atmosphere: AtmosphereUniforms {
                view_proj,
                view: view_cols,
                model: self.planet.atmosphere_model().to_cols_array_2d(),
                sun_direction,
                _padding: 0.0,
            },
            sun: SunUniforms {
                view_proj,
                model: self.sun.model().to_cols_array_2d(),
                color: self.sun.color.to_array(),
                _padding: 0.0,
            },
            stars: StarUniforms {
                view: view_cols,
                proj: proj.to_cols_array_2d(),
                color: self.star_params.color,
                size: self.star_params.size,
                viewport,
                min_pixel_size: self.star_params.min_pixel_size,
                _padding: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RenderConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> GlobeConfig {
        let mut config = GlobeConfig::default();
        config.planet.width_segments = 32;
        config.planet.height_segments = 16;
        config.stars.count = 100;
        config
    }

    fn scene() -> Scene {
        Scene::compose(&small_config(), &mut StdRng::seed_from_u64(11))
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(Vec3::new(0.0, 0.0, 15.0), &RenderConfig::default())
    }

    #[test]
    fn test_compose_builds_every_entity() {
        let s = scene();
        assert_eq!(s.planet.surface.vertices.len(), 33 * 17);
        assert_eq!(s.planet.atmosphere.radius, 5.1);
        assert_eq!(s.sun.mesh.radius, 10.0);
        assert_eq!(s.sun.position, Vec3::new(100.0, 10.0, 10.0));
        assert_eq!(s.stars.len(), 100);
    }

    #[test]
    fn test_update_sets_rotation_and_time() {
        let mut s = scene();
        let frame = FrameContext::new(20.0, 0.05, 3);
        s.update(&frame);

        assert!((s.planet.rotation_rad() - 1.0).abs() < 1e-6);
        assert_eq!(s.planet.time_s(), 20.0);

        let uniforms = s.uniforms(&camera(), [1280.0, 720.0]);
        assert_eq!(uniforms.planet.time, 20.0);
        let expected = Mat4::from_rotation_y(s.planet.rotation_rad()).to_cols_array_2d();
        assert_eq!(uniforms.planet.model, expected);
    }

    #[test]
    fn test_surface_and_atmosphere_share_sun_direction() {
        let s = scene();
        let uniforms = s.uniforms(&camera(), [800.0, 600.0]);

        assert_eq!(uniforms.planet.sun_direction, uniforms.atmosphere.sun_direction);
        let direction = Vec3::from_array(uniforms.planet.sun_direction);
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(direction, s.planet.surface_shader().sun_direction());
        assert_eq!(direction, s.planet.atmosphere_shader().sun_direction());
    }

    #[test]
    fn test_atmosphere_does_not_spin() {
        let mut s = scene();
        s.update(&FrameContext::new(40.0, 0.05, 0));
        let uniforms = s.uniforms(&camera(), [800.0, 600.0]);
        assert_eq!(uniforms.atmosphere.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_rim_terms_get_the_camera_view() {
        let s = scene();
        let behind = PerspectiveCamera::new(Vec3::new(0.0, 0.0, -15.0), &RenderConfig::default());
        let uniforms = s.uniforms(&behind, [800.0, 600.0]);

        let expected = behind.view().to_cols_array_2d();
        assert_eq!(uniforms.planet.view, expected);
        assert_eq!(uniforms.atmosphere.view, expected);

        // The normal facing this camera maps onto the rim axis
        let view = Mat4::from_cols_array_2d(&uniforms.planet.view);
        let facing = view.transform_vector3(-Vec3::Z);
        assert!((facing - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_star_uniforms_carry_viewport() {
        let s = scene();
        let uniforms = s.uniforms(&camera(), [1024.0, 768.0]);
        assert_eq!(uniforms.stars.viewport, [1024.0, 768.0]);
        assert_eq!(uniforms.stars.size, 0.1);
        assert_eq!(uniforms.stars.color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_sun_is_off_screen_right_in_default_view() {
        let s = scene();
        let uniforms = s.uniforms(&camera(), [1280.0, 720.0]);
        let view_proj = Mat4::from_cols_array_2d(&uniforms.sun.view_proj);
        let clip = view_proj.project_point3(s.sun.position);
        assert!(clip.x > 1.0);
    }
}
