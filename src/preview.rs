//! Headless CPU render of one frame to a PNG.
//!
//! Ray-casts the spheres and splats the stars, shading with the same CPU models the
//! fragment programs mirror. Useful for checking a look without a GPU, and as the CPU
//! side of CPU/GPU comparisons.

use std::path::Path;

use glam::{Mat3, Vec2, Vec3};
use image::{Rgb, RgbImage};

use crate::camera::PerspectiveCamera;
use crate::error::PreviewError;
use crate::mesh::direction_to_uv;
use crate::scene::Scene;
use crate::shading::{AtmosphereShader, SurfaceShader};

/// Nearest opaque thing seen along a pixel's ray
#[derive(Debug, Clone, Copy)]
struct Fragment {
    color: Vec3,
    /// View-space depth (distance along the camera's forward axis)
    depth: f32,
}

/// Entry and exit distances of a ray through a sphere, if it hits in front of the origin
fn intersect_sphere(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<(f32, f32)> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let (near, far) = (-b - root, -b + root);
    (far > 0.0).then_some((near, far))
}

fn to_rgb8(color: Vec3) -> Rgb<u8> {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    Rgb([c.x.round() as u8, c.y.round() as u8, c.z.round() as u8])
}

/// CPU renderer for one scene state seen through one camera
pub struct PreviewRenderer<'a> {
    scene: &'a Scene,
    camera: &'a PerspectiveCamera,
    surface: SurfaceShader,
    atmosphere: AtmosphereShader,
    /// World → planet object space, for surface UVs
    inverse_rotation: Mat3,
    /// World → camera space, for the rim terms
    view_rotation: Mat3,
    forward: Vec3,
    clear_color: Vec3,
}

impl<'a> PreviewRenderer<'a> {
    pub fn new(scene: &'a Scene, camera: &'a PerspectiveCamera, clear_color: [f64; 3]) -> Self {
        Self {
            scene,
            camera,
            surface: scene.planet.surface_shader(),
            atmosphere: scene.planet.atmosphere_shader(),
            inverse_rotation: Mat3::from_rotation_y(-scene.planet.rotation_rad()),
            view_rotation: Mat3::from_mat4(camera.view()),
            forward: (camera.target - camera.position).normalize_or_zero(),
            clear_color: Vec3::new(
                clear_color[0] as f32,
                clear_color[1] as f32,
                clear_color[2] as f32,
            ),
        }
    }

    /// Render a `width` × `height` image
    pub fn render(&self, width: u32, height: u32) -> Result<RgbImage, PreviewError> {
        if width == 0 || height == 0 {
            return Err(PreviewError::EmptyImage { width, height });
        }

        let stars = self.splat_stars(width, height);
        let mut image = RgbImage::new(width, height);

        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let ndc = Vec2::new(
                (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
            );
            let background = stars[(y * width + x) as usize];
            *pixel = to_rgb8(self.trace(ndc, background));
        }

        Ok(image)
    }

    /// Render and write a PNG
    pub fn write(&self, path: &Path, width: u32, height: u32) -> Result<(), PreviewError> {
        let image = self.render(width, height)?;
        image.save(path)?;
        log::info!("Wrote {}x{} preview to {}", width, height, path.display());
        Ok(())
    }

    /// Rasterize stars as squares into a per-pixel buffer, nearest star wins
    fn splat_stars(&self, width: u32, height: u32) -> Vec<Option<Fragment>> {
        let mut buffer = vec![None; (width * height) as usize];
        let view_proj = self.camera.view_proj();
        let params = self.scene.star_params();
        let color = Vec3::from_array(params.color);

        for star in &self.scene.stars.stars {
            let clip = view_proj * Vec3::from_array(star.position).extend(1.0);
            if clip.w <= self.camera.near {
                continue;
            }
            let ndc = clip.truncate() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z > 1.0 {
                continue;
            }

            let pixels = (params.size * height as f32 * 0.5 / clip.w).max(params.min_pixel_size);
            let half = (pixels * 0.5).max(0.5);
            let cx = (ndc.x + 1.0) * 0.5 * width as f32;
            let cy = (1.0 - ndc.y) * 0.5 * height as f32;

            let x0 = (cx - half).round().max(0.0) as u32;
            let x1 = ((cx + half).round() as u32).min(width);
            let y0 = (cy - half).round().max(0.0) as u32;
            let y1 = ((cy + half).round() as u32).min(height);

            for y in y0..y1 {
                for x in x0..x1 {
                    let slot = &mut buffer[(y * width + x) as usize];
                    if slot.map_or(true, |f: Fragment| clip.w < f.depth) {
                        *slot = Some(Fragment {
                            color,
                            depth: clip.w,
                        });
                    }
                }
            }
        }

        buffer
    }

    /// Shade the ray through `ndc` over an optional star fragment
    fn trace(&self, ndc: Vec2, background: Option<Fragment>) -> Vec3 {
        let origin = self.camera.position;
        let direction = self.camera.ray_direction(ndc);
        let depth_of = |t: f32| t * direction.dot(self.forward);

        let mut nearest = background.unwrap_or(Fragment {
            color: self.clear_color,
            depth: f32::INFINITY,
        });

        let sun = &self.scene.sun;
        if let Some((t, _)) = intersect_sphere(origin, direction, sun.position, sun.mesh.radius) {
            if t > 0.0 && depth_of(t) < nearest.depth {
                nearest = Fragment {
                    color: sun.color,
                    depth: depth_of(t),
                };
            }
        }

        let planet = &self.scene.planet;
        let planet_hit = intersect_sphere(origin, direction, Vec3::ZERO, planet.surface.radius);
        if let Some((t, _)) = planet_hit {
            if t > 0.0 && depth_of(t) < nearest.depth {
                let position = origin + direction * t;
                let normal = position.normalize();
                let view_normal = self.view_rotation * normal;
                let uv = direction_to_uv(self.inverse_rotation * normal);
                let sample = self
                    .surface
                    .shade(position, normal, view_normal, uv, planet.time_s());
                nearest = Fragment {
                    color: sample.color,
                    depth: depth_of(t),
                };
            }
        }

        // Unorm target clamps every write
        let mut color = nearest.color.clamp(Vec3::ZERO, Vec3::ONE);

        // Only the shell's far side is drawn; it glows where nothing nearer is in front
        if let Some((_, t_far)) =
            intersect_sphere(origin, direction, Vec3::ZERO, planet.atmosphere.radius)
        {
            if depth_of(t_far) < nearest.depth {
                let normal = (origin + direction * t_far).normalize();
                color = self
                    .atmosphere
                    .blend_over(color, normal, self.view_rotation * normal);
            }
        }

        color.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameContext;
    use crate::params::{GlobeConfig, RenderConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> GlobeConfig {
        let mut config = GlobeConfig::default();
        config.planet.width_segments = 24;
        config.planet.height_segments = 12;
        config.stars.count = 0;
        config
    }

    fn square_camera() -> PerspectiveCamera {
        let mut camera =
            PerspectiveCamera::new(Vec3::new(0.0, 0.0, 15.0), &RenderConfig::default());
        camera.set_viewport(1, 1);
        camera
    }

    fn luminance(c: Vec3) -> f32 {
        c.x + c.y + c.z
    }

    #[test]
    fn test_ray_sphere_hits_and_misses() {
        let hit = intersect_sphere(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z, Vec3::ZERO, 5.0);
        let (near, far) = hit.unwrap();
        assert!((near - 10.0).abs() < 1e-5);
        assert!((far - 20.0).abs() < 1e-5);

        let behind = intersect_sphere(Vec3::new(0.0, 0.0, 15.0), Vec3::Z, Vec3::ZERO, 5.0);
        assert!(behind.is_none());
        let wide = intersect_sphere(Vec3::new(0.0, 6.0, 15.0), Vec3::NEG_Z, Vec3::ZERO, 5.0);
        assert!(wide.is_none());
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let scene = Scene::compose(&config(), &mut StdRng::seed_from_u64(1));
        let camera = square_camera();
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        assert!(matches!(
            preview.render(0, 10),
            Err(PreviewError::EmptyImage { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_center_pixel_matches_surface_shader() {
        let mut scene = Scene::compose(&config(), &mut StdRng::seed_from_u64(2));
        scene.update(&FrameContext::new(12.0, 0.05, 0));
        let camera = square_camera();
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        let image = preview.render(33, 33).unwrap();
        let pixel = image.get_pixel(16, 16);

        let position = Vec3::new(0.0, 0.0, 5.0);
        let uv = direction_to_uv(Mat3::from_rotation_y(-scene.planet.rotation_rad()) * Vec3::Z);
        let expected = scene
            .planet
            .surface_shader()
            .shade(position, Vec3::Z, Vec3::Z, uv, 12.0)
            .color;

        let expected = to_rgb8(expected);
        for (got, want) in pixel.0.iter().zip(expected.0) {
            assert!(got.abs_diff(want) <= 1, "{:?} vs {:?}", pixel, expected);
        }
    }

    #[test]
    fn test_sun_side_of_disc_is_brighter() {
        let mut config = config();
        let gray = [0.5, 0.5, 0.5];
        config.shading.ocean_color = gray;
        config.shading.land_color = gray;
        config.shading.snow_color = gray;
        let scene = Scene::compose(&config, &mut StdRng::seed_from_u64(3));
        let camera = square_camera();
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        let day = preview.trace(Vec2::new(0.25, 0.0), None);
        let night = preview.trace(Vec2::new(-0.25, 0.0), None);
        assert!(luminance(day) > 2.0 * luminance(night));
    }

    #[test]
    fn test_atmosphere_glows_just_outside_limb() {
        let scene = Scene::compose(&config(), &mut StdRng::seed_from_u64(4));
        let camera = square_camera();
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        // Between the planet's edge (ndc ~0.461) and the shell's (~0.471)
        let glow = preview.trace(Vec2::new(0.0, 0.466), None);
        assert!(glow.z > 0.0);
        // Well outside the shell nothing but the clear color remains
        assert_eq!(preview.trace(Vec2::new(0.0, 0.9), None), Vec3::ZERO);
    }

    #[test]
    fn test_far_side_is_not_washed_out_from_behind() {
        let mut scene = Scene::compose(&config(), &mut StdRng::seed_from_u64(6));
        scene.update(&FrameContext::new(30.0, 0.05, 0));
        let mut camera =
            PerspectiveCamera::new(Vec3::new(0.0, 0.0, -15.0), &RenderConfig::default());
        camera.set_viewport(1, 1);
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        // Head-on from behind the disc centre gets no haze at all
        let position = Vec3::new(0.0, 0.0, -5.0);
        let uv = direction_to_uv(Mat3::from_rotation_y(-scene.planet.rotation_rad()) * -Vec3::Z);
        let expected = scene
            .planet
            .surface_shader()
            .shade(position, -Vec3::Z, Vec3::Z, uv, 30.0)
            .color;

        let color = preview.trace(Vec2::ZERO, None);
        assert!((color - expected.clamp(Vec3::ZERO, Vec3::ONE)).abs().max_element() < 1e-4);
        assert!(color.max_element() < 1.0, "{:?}", color);
    }

    #[test]
    fn test_limb_glow_is_the_same_from_either_side() {
        let scene = Scene::compose(&config(), &mut StdRng::seed_from_u64(7));
        let front = square_camera();
        let mut back =
            PerspectiveCamera::new(Vec3::new(0.0, 0.0, -15.0), &RenderConfig::default());
        back.set_viewport(1, 1);

        let ndc = Vec2::new(0.0, 0.466);
        let from_front = PreviewRenderer::new(&scene, &front, [0.0; 3]).trace(ndc, None);
        let from_back = PreviewRenderer::new(&scene, &back, [0.0; 3]).trace(ndc, None);

        // Blue is 1.0 in both sky tints, so it carries the glow strength alone
        assert!(from_back.z > 0.0);
        assert!((from_front.z - from_back.z).abs() < 1e-4);
    }

    #[test]
    fn test_stars_show_only_where_nothing_is_in_front() {
        let mut config = config();
        config.stars.count = 3000;
        let scene = Scene::compose(&config, &mut StdRng::seed_from_u64(5));
        let camera = square_camera();
        let preview = PreviewRenderer::new(&scene, &camera, [0.0; 3]);

        let image = preview.render(64, 64).unwrap();
        let white = image.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(white > 0, "no stars visible");

        // A star fragment behind the planet loses to it
        let hidden = Fragment {
            color: Vec3::ONE,
            depth: 100.0,
        };
        assert_ne!(preview.trace(Vec2::ZERO, Some(hidden)), Vec3::ONE);
    }
}
