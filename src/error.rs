//! Error types for drizzle.
//!
//! Everything here is an initialization failure. Once the first frame has been
//! drawn the frame loop has no fallible paths besides surface acquisition,
//! which the app recovers from on its own.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The surface reported no usable texture format.
    #[error("Surface has no supported texture formats for this adapter")]
    NoSurfaceFormat,

    /// The particle cloud does not fit in a single GPU buffer.
    #[error("Particle buffer needs {size} bytes but the device allows at most {limit}")]
    ParticleBufferTooLarge { size: u64, limit: u64 },
}

/// Errors that can occur when running the demo.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
