use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::OrthographicCamera;

const POLAR_EPSILON: f32 = 1e-6;

/// Orbit-style camera controller with inertial damping.
///
/// Input handlers accumulate rotation, zoom and pan requests; [`update`]
/// applies them once per frame. With damping enabled only a fraction of the
/// pending rotation and pan is applied each frame and the remainder decays,
/// which gives the camera its glide after the pointer is released.
///
/// [`update`]: OrbitControls::update
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,

    // Pending motion
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,

    // Initial state for reset
    initial: OrthographicCamera,
}

impl OrbitControls {
    pub fn new(camera: &OrthographicCamera) -> Self {
        Self {
            enabled: true,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            initial: *camera,
        }
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels.
    ///
    /// A drag across the full viewport height turns the camera a full circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        self.delta_theta -= TAU * dx / viewport_height * self.rotate_speed;
        self.delta_phi -= TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Zoom by wheel `steps`; positive steps zoom in. Applied immediately.
    pub fn zoom(&mut self, camera: &mut OrthographicCamera, steps: f32) {
        if !self.enabled || steps == 0.0 || !steps.is_finite() {
            return;
        }
        let scale = 0.95f32.powf(self.zoom_speed * steps.abs());
        let zoom = if steps > 0.0 {
            camera.zoom / scale
        } else {
            camera.zoom * scale
        };
        camera.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Queue a pan from a pointer drag of `(dx, dy)` pixels.
    pub fn pan(&mut self, camera: &OrthographicCamera, dx: f32, dy: f32, viewport: (f32, f32)) {
        let (width, height) = viewport;
        if !self.enabled || width <= 0.0 || height <= 0.0 {
            return;
        }
        let (world_w, world_h) = camera.visible_extent();
        let right = camera.right_dir() * (-dx * world_w / width);
        let up = camera.up_dir() * (dy * world_h / height);
        self.pan_offset += right + up;
    }

    /// Apply pending motion to `camera`. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut OrthographicCamera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        // Spherical coordinates around the target, Y up.
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * factor;
        phi += self.delta_phi * factor;
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let pan = self.pan_offset * factor;
        camera.target += pan;
        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let before = camera.position;
        camera.position = camera.target + new_offset;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }

        (camera.position - before).length_squared() > 1e-12
    }

    /// Restore the camera to the state the controls were created with.
    pub fn reset(&mut self, camera: &mut OrthographicCamera) {
        *camera = self.initial;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_offset = Vec3::ZERO;
        log::debug!("camera reset");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
