use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use reveal_core::scene::{render_size, Scene};
use reveal_gpu::{
    blend::BlendPass,
    context::Uniforms,
    texture::Texture,
    video::{FrameSequence, FrameSource},
    GpuError,
};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::Config;
use crate::gui::{DebugPanel, PanelStats};
use crate::input::{Button, InputAction, InputState, Key};

// ---------------------------------------------------------------------------
// Simple FPS counter — reported once per second
// ---------------------------------------------------------------------------

struct FpsCounter {
    frames: u32,
    last_report: Instant,
    last_fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_report: Instant::now(),
            last_fps: 0.0,
        }
    }

    /// Increment the frame count.  Returns the FPS value if a full second has
    /// elapsed since the last report (so the caller can log it).
    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.last_fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.last_report = Instant::now();
            Some(self.last_fps)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,

    // Sources and the single draw
    video: FrameSource,
    image: Texture,
    blend: BlendPass,
    swapped: bool,

    gui: DebugPanel,
    scene: Scene,
    input: InputState,

    // Frame timing
    last_frame: Instant,
    fps: FpsCounter,
}

impl App {
    /// Initialise wgpu for a given window.  The window is wrapped in `Arc` so
    /// that the surface can safely hold a `'static` reference to it.
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let scale_factor = window.scale_factor();
        let physical = window.inner_size();
        let (width, height) = render_size((physical.width, physical.height), scale_factor);

        // ---- Instance -------------------------------------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // ---- Surface --------------------------------------------------------
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(GpuError::from)?;

        // ---- Adapter --------------------------------------------------------
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        // ---- Device & Queue -------------------------------------------------
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("reveal-app device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(GpuError::from)?;

        // ---- Surface configuration ------------------------------------------
        let surface_caps = surface.get_capabilities(&adapter);

        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: config.present_mode(),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}×{} {:?} {:?}",
            surface_config.width,
            surface_config.height,
            format,
            surface_config.present_mode
        );

        // ---- Sources --------------------------------------------------------
        let video = match &config.frames {
            Some(dir) => FrameSource::Sequence(
                FrameSequence::load(&device, &queue, dir, config.fps)
                    .with_context(|| format!("loading video frames from {}", dir.display()))?,
            ),
            None => {
                log::info!("No --frames given; using a procedural background");
                FrameSource::Still(Texture::gradient(&device, &queue, 256, 256, "video placeholder")?)
            }
        };
        let image = match &config.image {
            Some(path) => Texture::from_file(&device, &queue, path)
                .with_context(|| format!("loading cover image {}", path.display()))?,
            None => {
                log::info!("No --image given; using a flat cover");
                Texture::solid(&device, &queue, [235, 225, 210, 255], "image placeholder")?
            }
        };

        // ---- Blend pass and panel -------------------------------------------
        let blend = BlendPass::new(&device, format, video.view(), &image.view);
        let gui = DebugPanel::new(&window, &device, format, !config.no_gui);

        let logical = physical.to_logical::<u32>(scale_factor);
        let mut scene = Scene::new(logical.width, logical.height);
        scene.ease = config.ease.into();

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            video,
            image,
            blend,
            swapped: false,
            gui,
            scene,
            input: InputState::new(),
            last_frame: Instant::now(),
            fps: FpsCounter::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Reconfigure the surface for the window's current size.
    pub fn resize(&mut self) {
        let physical = self.window.inner_size();
        if physical.width == 0 || physical.height == 0 {
            return;
        }
        let scale_factor = self.window.scale_factor();
        let (width, height) = render_size((physical.width, physical.height), scale_factor);
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);

        let logical = physical.to_logical::<u32>(scale_factor);
        self.scene.resize(logical.width, logical.height);

        log::debug!(
            "Surface resized to {}×{} (viewport {}×{})",
            width,
            height,
            logical.width,
            logical.height
        );
    }

    // -------------------------------------------------------------------------
    // Input — called by main.rs window_event handler
    // -------------------------------------------------------------------------

    /// Let the panel see the event first. Returns `true` if it was consumed.
    pub fn on_gui_event(&mut self, event: &WindowEvent) -> bool {
        self.gui.on_window_event(&self.window, event)
    }

    pub fn on_key_pressed(&self, key: Key) -> Option<InputAction> {
        self.input.on_key(key)
    }

    pub fn on_button(
        &mut self,
        button: Button,
        pressed: bool,
        consumed: bool,
    ) -> Option<InputAction> {
        self.input.on_button(button, pressed, consumed)
    }

    /// Track the cursor, given in physical pixels.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<InputAction> {
        let scale = self.window.scale_factor();
        self.input.on_cursor_moved(x / scale, y / scale)
    }

    pub fn on_cursor_left(&mut self) {
        self.input.on_cursor_left();
    }

    pub fn on_scroll_lines(&self, lines: f32) -> Option<InputAction> {
        self.input.on_scroll_lines(lines)
    }

    pub fn on_scroll_pixels(&self, pixels: f64) -> Option<InputAction> {
        self.input.on_scroll_pixels(pixels)
    }

    /// Apply an action to the app state.
    ///
    /// Returns `true` if the app should exit (i.e. action was `Quit`).
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::PointerDown => self.scene.pointer_down(),
            InputAction::PointerUp => self.scene.pointer_up(),
            InputAction::Orbit { dx, dy } => self.scene.rotate(dx, dy),
            InputAction::Pan { dx, dy } => self.scene.pan(dx, dy),
            InputAction::Zoom { steps } => {
                self.scene.zoom(steps);
                log::debug!("zoom → {:.3}", self.scene.camera.zoom);
            }
            InputAction::ResetCamera => self.scene.reset_camera(),
            InputAction::ToggleGui => self.gui.toggle(),
            InputAction::SwapSources => {
                self.swapped = !self.swapped;
                let (outer, inner) = if self.swapped {
                    (&self.image.view, self.video.view())
                } else {
                    (self.video.view(), &self.image.view)
                };
                self.blend.set_sources(&self.device, outer, inner);
                log::info!("Sources swapped: {}", self.swapped);
            }
            InputAction::Quit => return true,
        }
        false
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Run one full frame: tick the scene, upload uniforms, draw, present.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // --- Timing ----------------------------------------------------------
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        let frame = self.scene.tick(dt);

        if let Some(fps) = self.fps.tick() {
            log::debug!(
                "FPS: {:.1}  scale: {:.2}  zoom: {:.2}  t: {:.1}",
                fps,
                frame.scale,
                self.scene.camera.zoom,
                frame.time,
            );
        }

        if let Err(e) = self.video.advance(&self.queue, frame.time) {
            log::warn!("video frame upload failed: {e}");
        }
        let uniforms = Uniforms::from_frame(&frame);

        // --- Acquire surface texture -----------------------------------------
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // --- 1. Blend quad ---------------------------------------------------
        self.blend
            .render(&mut encoder, &self.queue, &surface_view, &uniforms);

        // --- 2. Parameter panel ----------------------------------------------
        let stats = PanelStats {
            fps: self.fps.last_fps,
            elapsed: self.scene.elapsed(),
            tweening: self.scene.is_tweening(),
        };
        let callbacks = self.gui.paint(
            &self.window,
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_view,
            [self.surface_config.width, self.surface_config.height],
            &mut self.scene.settings,
            stats,
        );

        self.queue
            .submit(callbacks.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();
        Ok(())
    }
}
