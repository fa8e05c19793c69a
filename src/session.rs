//! Session lifecycle: build everything on a window, tick it, tear it down as a unit.

use std::sync::Arc;

use glam::Vec3;
use winit::window::Window;

use crate::camera::{ControlInput, OrbitControls, PerspectiveCamera};
use crate::error::{FrameError, InitError};
use crate::frame::{FrameContext, FrameTarget, LoopHandle, LoopState, RenderLoop, TickOutcome};
use crate::params::GlobeConfig;
use crate::rendering::RenderSystem;
use crate::scene::Scene;

/// Scene, camera controller and GPU resources of a live session
pub struct Stage {
    renderer: RenderSystem,
    scene: Scene,
    controls: OrbitControls,
}

impl FrameTarget for Stage {
    fn update(&mut self, frame: &FrameContext) {
        self.scene.update(frame);
    }

    fn advance_camera(&mut self) {
        self.controls.advance();
    }

    fn render(&mut self) -> Result<(), FrameError> {
        let (width, height) = self.renderer.size();
        let uniforms = self
            .scene
            .uniforms(self.controls.camera(), [width as f32, height as f32]);
        self.renderer.upload(&uniforms);
        self.renderer.render()
    }
}

/// A running globe bound to one window
///
/// Generic over the per-frame target so the lifecycle can run without a GPU.
pub struct Session<T: FrameTarget = Stage> {
    stage: Option<T>,
    render_loop: RenderLoop,
    handle: LoopHandle,
}

impl Session<Stage> {
    /// Build the scene, controller and GPU pipelines on `window`
    pub fn initialize(window: Arc<Window>, config: &GlobeConfig) -> Result<Self, InitError> {
        let scene = Scene::compose(config, &mut rand::rng());
        // Elapsed time counts from scene construction
        let render_loop = RenderLoop::new(config.planet.spin_rate_rad_per_s);

        let size = window.inner_size();
        let mut camera = PerspectiveCamera::new(
            Vec3::from_array(config.controls.initial_position),
            &config.render,
        );
        camera.set_viewport(size.width, size.height);
        let controls = OrbitControls::new(camera, config.controls.clone(), size.height);

        let renderer = pollster::block_on(RenderSystem::new(window, &scene, &config.render))?;
        log::info!("Session initialized at {}x{}", size.width, size.height);

        Ok(Self::with_target(
            Stage {
                renderer,
                scene,
                controls,
            },
            render_loop,
        ))
    }

    /// Forward pointer or wheel input to the orbit controller
    pub fn handle_input(&mut self, input: ControlInput) {
        if let Some(stage) = self.stage.as_mut() {
            stage.controls.handle_input(input);
        }
    }

    /// Track a new window size. Shading state is untouched.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize ({}x{})", width, height);
            return;
        }
        log::info!("Resized to {}x{}", width, height);
        stage.renderer.resize(width, height);
        stage.controls.set_viewport(width, height);
    }
}

impl<T: FrameTarget> Session<T> {
    fn with_target(target: T, render_loop: RenderLoop) -> Self {
        let handle = render_loop.handle();
        Self {
            stage: Some(target),
            render_loop,
            handle,
        }
    }

    /// Run one frame. A frame error tears the session down before it is returned.
    pub fn tick(&mut self) -> Result<TickOutcome, FrameError> {
        let Some(stage) = self.stage.as_mut() else {
            return Ok(TickOutcome::Inert);
        };
        let result = self.render_loop.tick(stage);
        if let Err(err) = &result {
            log::error!("Frame failed: {}", err);
            self.teardown();
        }
        result
    }

    pub fn state(&self) -> LoopState {
        if self.handle.is_cancelled() {
            LoopState::Stopped
        } else {
            self.render_loop.state()
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage.is_some()
    }

    /// Cancel the loop and release every resource. Later calls do nothing.
    pub fn teardown(&mut self) {
        self.handle.cancel();
        if self.stage.take().is_some() {
            log::info!(
                "Session torn down after {} frames",
                self.render_loop.frames_rendered()
            );
        }
    }
}

impl<T: FrameTarget> Drop for Session<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
