//! Star field backdrop configuration.

/// Star field generation and sprite appearance
#[derive(Debug, Clone)]
pub struct StarFieldParams {
    /// Number of stars
    pub count: usize,

    /// Half-extent of the cube stars are scattered in (world units, per axis)
    pub half_extent: f32,

    /// Sprite size in world units at unit scale (attenuated with distance)
    pub size: f32,

    /// Smallest on-screen sprite (pixels), so distant stars never vanish
    pub min_pixel_size: f32,

    /// Sprite color (linear RGB)
    pub color: [f32; 3],
}

impl Default for StarFieldParams {
    fn default() -> Self {
        Self {
            count: 5000,
            half_extent: 150.0,
            size: 0.1,
            min_pixel_size: 1.5,
            color: [1.0, 1.0, 1.0],
        }
    }
}
