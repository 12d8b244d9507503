pub mod blend;
pub mod context;
pub mod texture;
pub mod video;

use std::path::PathBuf;

/// WGSL source of the reveal blend shader.
pub const BLEND_WGSL: &str = include_str!("../shaders/blend.wgsl");

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pixel data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("texture must be at least 1×1, got {width}×{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("no image frames found in {}", .0.display())]
    EmptyFrames(PathBuf),
}
