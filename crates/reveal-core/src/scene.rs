use glam::Mat4;

use crate::camera::OrthographicCamera;
use crate::clock::Clock;
use crate::controls::OrbitControls;
use crate::tween::{Ease, Tweener};
use crate::{Settings, SCALE_MAX, SCALE_MIN};

/// Duration of the pointer-driven scale transition, in seconds.
pub const SCALE_TWEEN_SECS: f32 = 0.5;

/// Largest device pixel ratio the renderer will honour.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Everything the GPU side needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub time: f32,
    pub scale: f32,
    /// Logical viewport size in pixels.
    pub viewport: [f32; 2],
    pub view_proj: Mat4,
}

/// All mutable state of the running effect.
pub struct Scene {
    pub settings: Settings,
    pub camera: OrthographicCamera,
    pub controls: OrbitControls,
    /// Curve used by the pointer-driven scale transition.
    pub ease: Ease,
    clock: Clock,
    scale_tween: Tweener,
    viewport: (u32, u32),
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        let camera = OrthographicCamera::default();
        let controls = OrbitControls::new(&camera);
        Self {
            settings: Settings::default(),
            camera,
            controls,
            ease: Ease::default(),
            clock: Clock::new(),
            scale_tween: Tweener::new(),
            viewport: (width.max(1), height.max(1)),
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn is_tweening(&self) -> bool {
        self.scale_tween.is_active()
    }

    /// Grow the reveal circle towards its maximum.
    pub fn pointer_down(&mut self) {
        self.tween_scale(SCALE_MAX);
    }

    /// Collapse the reveal circle.
    pub fn pointer_up(&mut self) {
        self.tween_scale(SCALE_MIN);
    }

    fn tween_scale(&mut self, target: f32) {
        log::debug!("scale {:.2} -> {:.2}", self.settings.scale, target);
        self.scale_tween
            .start(self.settings.scale, target, SCALE_TWEEN_SECS, self.ease);
    }

    /// Track a new logical viewport size. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.update_projection(width, height);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(dx, dy, self.viewport.1 as f32);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let viewport = (self.viewport.0 as f32, self.viewport.1 as f32);
        self.controls.pan(&self.camera, dx, dy, viewport);
    }

    pub fn zoom(&mut self, steps: f32) {
        self.controls.zoom(&mut self.camera, steps);
    }

    pub fn reset_camera(&mut self) {
        self.controls.reset(&mut self.camera);
    }

    /// Advance one frame: clock, then the scale tween, then the camera.
    pub fn tick(&mut self, dt: f32) -> FrameState {
        self.clock.tick(dt);
        self.scale_tween.update(dt, &mut self.settings.scale);
        self.controls.update(&mut self.camera);

        FrameState {
            time: self.clock.elapsed(),
            scale: self.settings.scale,
            viewport: [self.viewport.0 as f32, self.viewport.1 as f32],
            view_proj: self.camera.view_projection(),
        }
    }
}

/// Surface size for a window of `physical` pixels at `scale_factor`, with
/// the pixel ratio capped at [`MAX_PIXEL_RATIO`].
pub fn render_size(physical: (u32, u32), scale_factor: f64) -> (u32, u32) {
    let (w, h) = physical;
    if scale_factor.is_nan() || scale_factor <= MAX_PIXEL_RATIO {
        return (w.max(1), h.max(1));
    }
    let ratio = MAX_PIXEL_RATIO / scale_factor;
    let scaled = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
    (scaled(w), scaled(h))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
