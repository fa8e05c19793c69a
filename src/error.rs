//! Error types for session initialization, per-frame rendering and CPU previews.
//!
//! Shading and noise are total functions and have no error type; everything here is
//! environmental (no surface, no GPU, lost context, unwritable output file).

/// Failure to bring up a rendering session on a host surface.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// No drawable surface, or no adapter able to present to it.
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The adapter refused to create a device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

impl From<wgpu::CreateSurfaceError> for InitError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Self::SurfaceUnavailable(err.to_string())
    }
}

/// Failure while producing a frame. Every variant is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Surface was lost and reconfiguring it did not bring it back.
    #[error("rendering surface lost")]
    SurfaceLost,

    /// GPU ran out of memory.
    #[error("out of GPU memory")]
    OutOfMemory,
}

/// Failure while writing a CPU preview image.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// Requested image has a zero dimension.
    #[error("preview size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Encoding or writing the PNG failed.
    #[error("failed to write preview image: {0}")]
    Image(#[from] image::ImageError),
}
