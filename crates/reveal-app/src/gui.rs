use reveal_core::{Settings, SCALE_MAX, SCALE_MIN, SCALE_STEP};
use winit::{event::WindowEvent, window::Window};

/// Values shown read-only under the slider.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub fps: f32,
    pub elapsed: f32,
    pub tweening: bool,
}

/// The "Parameters" window: one `scale` slider plus frame stats, drawn with
/// egui over the blend output.
pub struct DebugPanel {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugPanel {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        visible: bool,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1, false);
        Self {
            ctx,
            state,
            renderer,
            visible,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Parameter panel {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Feed a window event to egui. Returns `true` if the panel consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// Run the panel UI and record its render pass on top of `target`.
    ///
    /// `surface_size` is the render target size in pixels; it can be smaller
    /// than the window's physical size when the pixel ratio is capped, so the
    /// paint scale is derived from it rather than from the window.
    #[allow(clippy::too_many_arguments)]
    pub fn paint(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        surface_size: [u32; 2],
        settings: &mut Settings,
        stats: PanelStats,
    ) -> Vec<wgpu::CommandBuffer> {
        if !self.visible {
            return Vec::new();
        }

        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Parameters")
                .default_pos([12.0, 12.0])
                .resizable(false)
                .show(ctx, |ui| {
                    let mut scale = settings.scale;
                    let slider = egui::Slider::new(&mut scale, SCALE_MIN..=SCALE_MAX)
                        .step_by(SCALE_STEP as f64)
                        .text("scale");
                    if ui.add(slider).changed() {
                        settings.set_scale(scale);
                    }
                    ui.separator();
                    ui.label(format!("{:.0} fps", stats.fps));
                    ui.label(format!("time {:.1} s", stats.elapsed));
                    if stats.tweening {
                        ui.label("tweening");
                    }
                });
        });
        self.state
            .handle_platform_output(window, output.platform_output);

        let logical_width = window.inner_size().to_logical::<f32>(window.scale_factor()).width;
        let pixels_per_point = surface_size[0] as f32 / logical_width.max(1.0);
        let paint_jobs = self.ctx.tessellate(output.shapes, pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: surface_size,
            pixels_per_point,
        };

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let callbacks = self
            .renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen);

        {
            let mut rpass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("gui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut rpass, &paint_jobs, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        callbacks
    }
}
