//! Render loop: monotonic clock, per-frame context and cancellable tick cycle.

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;
use std::time::Instant;

use crate::error::FrameError;

/// Everything time-dependent about one frame, derived once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Seconds since the scene was built
    pub elapsed_s: f32,
    /// Planet spin about +Y, wrapped to [0, 2π)
    pub rotation_rad: f32,
    /// Number of frames rendered before this one
    pub frame_index: u64,
}

impl FrameContext {
    pub fn new(elapsed_s: f32, spin_rate_rad_per_s: f32, frame_index: u64) -> Self {
        Self {
            elapsed_s,
            rotation_rad: (elapsed_s * spin_rate_rad_per_s).rem_euclid(TAU),
            frame_index,
        }
    }
}

/// Monotonic clock started when the scene is built
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_s(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built, no frame rendered yet
    Idle,
    /// At least one frame rendered and not cancelled
    Running,
    /// Cancelled or failed; every later tick is inert
    Stopped,
}

/// Cancellation handle for a render loop; cloning shares the same flag
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    /// Stop the loop. Safe to call any number of times.
    pub fn cancel(&self) {
        self.running.set(false);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.running.get()
    }
}

/// The per-tick work, in the order the loop performs it
pub trait FrameTarget {
    /// Apply time-derived state (rotation, time uniform)
    fn update(&mut self, frame: &FrameContext);

    /// Advance the camera controller by one damping step
    fn advance_camera(&mut self);

    /// Draw and present one frame
    fn render(&mut self) -> Result<(), FrameError>;
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Rendered(FrameContext),
    /// Loop was already stopped; nothing was touched
    Inert,
}

/// Cancellable render loop driven by the host's redraw callback
pub struct RenderLoop {
    clock: Clock,
    spin_rate_rad_per_s: f32,
    state: LoopState,
    handle: LoopHandle,
    frames: u64,
}

impl RenderLoop {
    pub fn new(spin_rate_rad_per_s: f32) -> Self {
        Self {
            clock: Clock::start(),
            spin_rate_rad_per_s,
            state: LoopState::Idle,
            handle: LoopHandle {
                running: Rc::new(Cell::new(true)),
            },
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Run one tick at the clock's current time
    pub fn tick<T: FrameTarget + ?Sized>(
        &mut self,
        target: &mut T,
    ) -> Result<TickOutcome, FrameError> {
        let elapsed_s = self.clock.elapsed_s();
        self.tick_at(elapsed_s, target)
    }

    /// Run one tick as if `elapsed_s` seconds had passed since the scene was built
    pub fn tick_at<T: FrameTarget + ?Sized>(
        &mut self,
        elapsed_s: f32,
        target: &mut T,
    ) -> Result<TickOutcome, FrameError> {
        if self.handle.is_cancelled() {
            if self.state != LoopState::Stopped {
                log::debug!("Render loop stopped after {} frames", self.frames);
            }
            self.state = LoopState::Stopped;
            return Ok(TickOutcome::Inert);
        }
        if self.state == LoopState::Stopped {
            return Ok(TickOutcome::Inert);
        }

        let frame = FrameContext::new(elapsed_s, self.spin_rate_rad_per_s, self.frames);
        target.update(&frame);
        target.advance_camera();

        if let Err(err) = target.render() {
            // A failed frame ends the session; never keep drawing undefined frames
            self.handle.cancel();
            self.state = LoopState::Stopped;
            return Err(err);
        }

        if self.state == LoopState::Idle {
            log::info!("Render loop running");
        }
        self.state = LoopState::Running;
        self.frames += 1;
        Ok(TickOutcome::Rendered(frame))
    }
}
