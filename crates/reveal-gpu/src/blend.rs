use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, TextureView};

use crate::context::Uniforms;
use crate::BLEND_WGSL;

/// Vertex of the textured quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A 1×1 plane in the XY plane, centred on the origin, uv origin bottom-left.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [-0.5, 0.5, 0.0], uv: [0.0, 1.0] },
    Vertex { position: [0.5, 0.5, 0.0], uv: [1.0, 1.0] },
    Vertex { position: [-0.5, -0.5, 0.0], uv: [0.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0], uv: [1.0, 0.0] },
];

/// Counter-clockwise when viewed from +Z.
pub const QUAD_INDICES: [u16; 6] = [0, 2, 1, 2, 3, 1];

/// The one draw of the scene: the textured quad through the blend shader.
///
/// Bind group 0:
///   binding 0 : `Uniforms` uniform buffer
///   binding 1 : video texture
///   binding 2 : image texture
///   binding 3 : linear sampler
pub struct BlendPass {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    uniform_buf: Buffer,
    sampler: Sampler,
    vertex_buf: Buffer,
    index_buf: Buffer,
}

impl BlendPass {
    pub fn new(
        device: &Device,
        target_format: wgpu::TextureFormat,
        video: &TextureView,
        image: &TextureView,
    ) -> Self {
        // --- bind group layout -------------------------------------------------
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blend_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blend_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // --- buffers -----------------------------------------------------------
        let uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blend_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blend_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        // --- pipeline ----------------------------------------------------------
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blend"),
            source: wgpu::ShaderSource::Wgsl(BLEND_WGSL.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blend_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let bind_group =
            Self::make_bind_group(device, &bind_group_layout, &uniform_buf, &sampler, video, image);

        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            uniform_buf,
            sampler,
            vertex_buf,
            index_buf,
        }
    }

    fn make_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        uniform_buf: &Buffer,
        sampler: &Sampler,
        video: &TextureView,
        image: &TextureView,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blend_bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(video),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(image),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Rebind the input textures, e.g. after a source is reloaded.
    pub fn set_sources(&mut self, device: &Device, video: &TextureView, image: &TextureView) {
        self.bind_group = Self::make_bind_group(
            device,
            &self.bind_group_layout,
            &self.uniform_buf,
            &self.sampler,
            video,
            image,
        );
    }

    /// Clear `target` to black and draw the quad into it.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &Queue,
        target: &TextureView,
        uniforms: &Uniforms,
    ) {
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blend-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GpuContext;
    use crate::texture::Texture;
    use reveal_core::scene::Scene;

    #[test]
    fn quad_is_unit_sized_and_centred() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[1]).collect();
        let width = xs.iter().cloned().fold(f32::MIN, f32::max) - xs.iter().cloned().fold(f32::MAX, f32::min);
        let height = ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert_eq!((width, height), (1.0, 1.0));
        assert_eq!(xs.iter().sum::<f32>(), 0.0);
        assert_eq!(ys.iter().sum::<f32>(), 0.0);
    }

    #[test]
    fn quad_triangles_wind_counter_clockwise() {
        for tri in QUAD_INDICES.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| QUAD_VERTICES[i as usize].position);
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0, "triangle {tri:?} is clockwise");
        }
    }

    #[test]
    fn uv_matches_position() {
        for v in QUAD_VERTICES {
            assert_eq!(v.uv, [v.position[0] + 0.5, v.position[1] + 0.5]);
        }
    }

    #[test]
    fn vertex_stride_is_five_floats() {
        assert_eq!(Vertex::layout().array_stride, 20);
    }

    #[test]
    fn blend_shader_validates() {
        let module = naga::front::wgsl::parse_str(BLEND_WGSL).expect("blend.wgsl parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("blend.wgsl validates");
        for name in ["vs_main", "fs_main"] {
            assert!(
                module.entry_points.iter().any(|ep| ep.name == name),
                "missing entry point {name}"
            );
        }
    }

    /// Renders one frame offscreen. Skipped on machines without a GPU adapter.
    #[test]
    fn renders_offscreen_frame() {
        let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let (device, queue) = (&gpu.device, &gpu.queue);

        let video = Texture::gradient(device, queue, 4, 4, "video").unwrap();
        let image = Texture::gradient(device, queue, 2, 2, "image").unwrap();
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let mut pass = BlendPass::new(device, format, &video.view, &image.view);
        pass.set_sources(device, &image.view, &video.view);

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen"),
            size: wgpu::Extent3d {
                width: 16,
                height: 16,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&Default::default());

        let mut scene = Scene::new(16, 16);
        let uniforms = Uniforms::from_frame(&scene.tick(0.1));
        let mut encoder = device.create_command_encoder(&Default::default());
        pass.render(&mut encoder, queue, &view, &uniforms);
        queue.submit(std::iter::once(encoder.finish()));
        let _ = device.poll(wgpu::Maintain::Wait);
    }
}
