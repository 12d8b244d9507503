use glam::{Mat4, Vec3};

/// An orthographic camera looking at a target point.
///
/// The frustum is expressed in world units and divided by `zoom` when the
/// projection is built, so zooming never touches the frustum bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for OrthographicCamera {
    /// Unit frustum centred on the origin, two units back along +Z. The unit
    /// quad exactly fills this view.
    fn default() -> Self {
        Self {
            left: -0.5,
            right: 0.5,
            top: 0.5,
            bottom: -0.5,
            near: -10.0,
            far: 10.0,
            zoom: 1.0,
            position: Vec3::new(0.0, 0.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
            ..Self::default()
        }
    }

    /// Set the camera position.
    pub fn at(mut self, position: impl Into<Vec3>) -> Self {
        self.position = position.into();
        self
    }

    /// Width and height of the visible region in world units at the current zoom.
    pub fn visible_extent(&self) -> (f32, f32) {
        (
            (self.right - self.left) / self.zoom,
            (self.top - self.bottom) / self.zoom,
        )
    }

    /// Orthographic projection with wgpu's `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        let zoom = self.zoom.max(f32::EPSILON);
        let cx = (self.left + self.right) * 0.5;
        let cy = (self.top + self.bottom) * 0.5;
        let hw = (self.right - self.left) * 0.5 / zoom;
        let hh = (self.top - self.bottom) * 0.5 / zoom;
        Mat4::orthographic_rh(cx - hw, cx + hw, cy - hh, cy + hh, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Screen-right direction in world space.
    pub fn right_dir(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or(Vec3::X)
    }

    /// Screen-up direction in world space, orthogonal to forward and right.
    pub fn up_dir(&self) -> Vec3 {
        self.right_dir().cross(self.forward()).normalize_or(Vec3::Y)
    }

    /// Called after the viewport changes. The frustum is fixed in world
    /// units, so the quad simply stretches with the window.
    pub fn update_projection(&mut self, width: u32, height: u32) {
        log::trace!("camera projection kept fixed for {width}x{height}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn default_camera_maps_quad_corners_to_clip_corners() {
        let vp = OrthographicCamera::default().view_projection();
        let tr = vp * Vec4::new(0.5, 0.5, 0.0, 1.0);
        let bl = vp * Vec4::new(-0.5, -0.5, 0.0, 1.0);
        assert!((tr.x - 1.0).abs() < 1e-5 && (tr.y - 1.0).abs() < 1e-5, "{tr:?}");
        assert!((bl.x + 1.0).abs() < 1e-5 && (bl.y + 1.0).abs() < 1e-5, "{bl:?}");
    }

    #[test]
    fn quad_depth_is_inside_clip_range() {
        let vp = OrthographicCamera::default().view_projection();
        let c = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(c.z >= 0.0 && c.z <= 1.0, "z={}", c.z);
    }

    #[test]
    fn zoom_shrinks_visible_extent() {
        let mut cam = OrthographicCamera::default();
        cam.zoom = 2.0;
        assert_eq!(cam.visible_extent(), (0.5, 0.5));
        let vp = cam.view_projection();
        let p = vp * Vec4::new(0.25, 0.0, 0.0, 1.0);
        assert!(approx(p, Vec4::new(1.0, 0.0, p.z, 1.0)), "{p:?}");
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = OrthographicCamera::default().at(Vec3::new(1.0, 1.0, 2.0));
        let (f, r, u) = (cam.forward(), cam.right_dir(), cam.up_dir());
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn default_right_is_positive_x() {
        let cam = OrthographicCamera::default();
        assert!((cam.right_dir() - Vec3::X).length() < 1e-5);
        assert!((cam.up_dir() - Vec3::Y).length() < 1e-5);
    }
}
