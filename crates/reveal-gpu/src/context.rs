use reveal_core::scene::FrameState;
use wgpu::{Device, Instance, Queue};

use crate::GpuError;

pub struct GpuContext {
    pub instance: Instance,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a headless GPU context (no surface), for offscreen rendering
    /// and tests. The windowed setup lives in `reveal-app`.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("reveal-gpu device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            device,
            queue,
        })
    }
}

/// Per-frame data uploaded to the GPU as a single uniform buffer.
/// Must match the `Uniforms` struct in `shaders/blend.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Logical viewport size in pixels.
    pub viewport: [f32; 2],
    pub circle_scale: f32,
    pub time: f32,
}

impl Uniforms {
    pub fn from_frame(frame: &FrameState) -> Self {
        Self {
            view_proj: frame.view_proj.to_cols_array_2d(),
            viewport: frame.viewport,
            circle_scale: frame.scale,
            time: frame.time,
        }
    }
}
