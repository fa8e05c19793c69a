//! Perspective camera and a damped orbit controller around the planet.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::params::{OrbitControlsParams, RenderConfig};

/// Keeps the polar angle off the poles so `look_at` never degenerates
const POLAR_EPSILON: f32 = 1e-3;

/// Per-notch wheel zoom factor, raised to `zoom_speed`
const WHEEL_ZOOM_BASE: f32 = 0.95;

/// Perspective camera looking at a target
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, render_config: &RenderConfig) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: render_config.fov_degrees,
            aspect: render_config.aspect_ratio(),
            near: render_config.near_plane,
            far: render_config.far_plane,
        }
    }

    /// Update aspect ratio after a resize; zero-sized viewports are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit-length ray direction through a normalized device coordinate
    pub fn ray_direction(&self, ndc: Vec2) -> Vec3 {
        let inverse = self.view_proj().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        (far - near).normalize()
    }
}

/// Pointer button as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Input events the orbit controller reacts to, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    PointerDown { button: PointerButton, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { button: PointerButton },
    /// Wheel notches; positive is scroll-up (zoom in)
    Wheel { delta: f32 },
}

/// Spherical coordinates around the target: polar angle from +Y, azimuth about +Y
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Damped orbit controller
///
/// Input accumulates a pending rotation; each `advance()` applies `damping_factor` of it
/// and decays the rest, so a released drag coasts to a stop. Wheel zoom applies in full
/// on the next advance. The target never moves.
pub struct OrbitControls {
    camera: PerspectiveCamera,
    params: OrbitControlsParams,
    viewport_height: f32,
    pending: Vec2,
    pending_scale: f32,
    drag_from: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(
        camera: PerspectiveCamera,
        params: OrbitControlsParams,
        viewport_height: u32,
    ) -> Self {
        Self {
            camera,
            params,
            viewport_height: viewport_height.max(1) as f32,
            pending: Vec2::ZERO,
            pending_scale: 1.0,
            drag_from: None,
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Track a new viewport; rotation speed is relative to its height
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    pub fn handle_input(&mut self, input: ControlInput) {
        match input {
            ControlInput::PointerDown {
                button: PointerButton::Primary,
                x,
                y,
            } => self.drag_from = Some(Vec2::new(x, y)),
            ControlInput::PointerDown { .. } => {}
            ControlInput::PointerMove { x, y } => {
                let Some(from) = self.drag_from else {
                    return;
                };
                let to = Vec2::new(x, y);
                let delta = (to - from) * self.params.rotate_speed;
                // Both axes scale by height so horizontal and vertical drags feel alike
                self.rotate_left(TAU * delta.x / self.viewport_height);
                self.rotate_up(TAU * delta.y / self.viewport_height);
                self.drag_from = Some(to);
            }
            ControlInput::PointerUp {
                button: PointerButton::Primary,
            } => self.drag_from = None,
            ControlInput::PointerUp { .. } => {}
            ControlInput::Wheel { delta } => {
                let zoom = WHEEL_ZOOM_BASE.powf(self.params.zoom_speed * delta.abs());
                if delta > 0.0 {
                    self.pending_scale *= zoom;
                } else if delta < 0.0 {
                    self.pending_scale /= zoom;
                }
            }
        }
    }

    fn rotate_left(&mut self, angle: f32) {
        self.pending.x -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.pending.y -= angle;
    }

    /// One damping step: move the camera, then decay the pending rotation
    pub fn advance(&mut self) {
        let damping = self.params.damping_factor.clamp(0.0, 1.0);
        let mut spherical = Spherical::from_offset(self.camera.position - self.camera.target);

        spherical.theta = (spherical.theta + self.pending.x * damping).rem_euclid(TAU);
        spherical.phi =
            (spherical.phi + self.pending.y * damping).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.pending_scale)
            .clamp(self.params.min_distance, self.params.max_distance);

        self.camera.position = self.camera.target + spherical.to_offset();
        self.pending *= 1.0 - damping;
        self.pending_scale = 1.0;
    }

    /// Distance from the camera to the orbit target
    pub fn distance(&self) -> f32 {
        (self.camera.position - self.camera.target).length()
    }
}
