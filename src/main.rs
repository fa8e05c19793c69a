//! Globe - a procedural planet you can spin around
//!
//! Opens a window with the planet, its atmosphere, the sun and a star field.
//! Drag to orbit, scroll to zoom, ESC to quit. `--preview` renders one frame
//! to a PNG on the CPU instead.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use globe::camera::{ControlInput, PerspectiveCamera, PointerButton};
use globe::cli::Args;
use globe::error::PreviewError;
use globe::frame::FrameContext;
use globe::params::GlobeConfig;
use globe::preview::PreviewRenderer;
use globe::scene::Scene;
use globe::session::Session;

/// Wheel pixels per notch on touchpads and precise wheels
const PIXELS_PER_WHEEL_NOTCH: f64 = 50.0;

/// Main application state
struct App {
    config: GlobeConfig,
    window: Option<Arc<Window>>,
    session: Option<Session>,
    cursor: (f32, f32),
    failed: bool,
}

impl App {
    fn new(config: GlobeConfig) -> Self {
        Self {
            config,
            window: None,
            session: None,
            cursor: (0.0, 0.0),
            failed: false,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.as_mut() {
            session.teardown();
        }
        self.session = None;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        self.shutdown(event_loop);
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Globe")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.render.window_width,
                self.config.render.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.fail(event_loop);
                return;
            }
        };

        match Session::initialize(Arc::clone(&window), &self.config) {
            Ok(session) => {
                log::info!("Globe is running. Drag to orbit, scroll to zoom, ESC to quit");
                self.session = Some(session);
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("{}", e);
                self.fail(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => session.on_resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                session.handle_input(ControlInput::PointerMove {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = pointer_button(button);
                let input = match state {
                    ElementState::Pressed => ControlInput::PointerDown {
                        button,
                        x: self.cursor.0,
                        y: self.cursor.1,
                    },
                    ElementState::Released => ControlInput::PointerUp { button },
                };
                session.handle_input(input);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_WHEEL_NOTCH) as f32,
                };
                session.handle_input(ControlInput::Wheel { delta: notches });
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = session.tick() {
                    log::error!("Render error: {}", e);
                    self.fail(event_loop);
                }
            }
            _ => {}
        }
    }
}

/// Headless path: one CPU-shaded frame at `args.time`
fn write_preview(args: &Args, config: &GlobeConfig) -> Result<(), PreviewError> {
    let Some(path) = &args.preview else {
        return Ok(());
    };

    let mut scene = Scene::compose(config, &mut rand::rng());
    scene.update(&FrameContext::new(
        args.time,
        config.planet.spin_rate_rad_per_s,
        0,
    ));

    let camera = PerspectiveCamera::new(
        Vec3::from_array(config.controls.initial_position),
        &config.render,
    );

    PreviewRenderer::new(&scene, &camera, config.render.clear_color).write(
        path,
        config.render.window_width,
        config.render.window_height,
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.to_config();

    if args.preview.is_some() {
        return match write_preview(&args, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
