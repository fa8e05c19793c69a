//! Orbit camera configuration.

/// Orbit controller tuning
#[derive(Debug, Clone)]
pub struct OrbitControlsParams {
    /// Initial camera position (world units); the orbit target is the origin
    pub initial_position: [f32; 3],

    /// Fraction of the pending rotation applied per frame (0 = frozen, 1 = no smoothing)
    pub damping_factor: f32,

    /// Drag-to-rotation multiplier (a full-height drag at 1.0 turns 2π)
    pub rotate_speed: f32,

    /// Wheel zoom multiplier (exponent on the per-notch 0.95 scale)
    pub zoom_speed: f32,

    /// Closest allowed distance to the target (world units)
    pub min_distance: f32,

    /// Farthest allowed distance to the target (world units)
    pub max_distance: f32,
}

impl Default for OrbitControlsParams {
    fn default() -> Self {
        Self {
            initial_position: [0.0, 0.0, 15.0],
            damping_factor: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 1.0,
            min_distance: 5.5,   // Stay outside the atmosphere shell
            max_distance: 300.0, // Star cube diagonal is ~260
        }
    }
}
