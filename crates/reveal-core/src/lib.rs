pub mod camera;
pub mod clock;
pub mod controls;
pub mod scene;
pub mod tween;

// ---------------------------------------------------------------------------
// Settings — the tweakable values shown in the debug panel
// ---------------------------------------------------------------------------

/// Lower bound of the reveal circle scale exposed in the panel.
pub const SCALE_MIN: f32 = 0.0;
/// Upper bound of the reveal circle scale; also the pointer-down target.
pub const SCALE_MAX: f32 = 2.0;
/// Slider granularity.
pub const SCALE_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Reserved blend progress, kept for parity with the panel layout.
    pub progress: f32,
    /// Radius multiplier of the reveal circle (`uCircleScale`).
    pub scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            progress: 0.0,
            scale: 0.5,
        }
    }
}

impl Settings {
    /// Set `scale` from a user control: clamped to the panel range and
    /// snapped to [`SCALE_STEP`].
    ///
    /// Tweens write `scale` directly and are not subject to this.
    pub fn set_scale(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let snapped = (value / SCALE_STEP).round() * SCALE_STEP;
        self.scale = snapped.clamp(SCALE_MIN, SCALE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_uniforms() {
        let s = Settings::default();
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.scale, 0.5);
    }

    #[test]
    fn set_scale_clamps_to_panel_range() {
        let mut s = Settings::default();
        s.set_scale(5.0);
        assert_eq!(s.scale, SCALE_MAX);
        s.set_scale(-1.0);
        assert_eq!(s.scale, SCALE_MIN);
    }

    #[test]
    fn set_scale_snaps_to_step() {
        let mut s = Settings::default();
        s.set_scale(0.734);
        assert!((s.scale - 0.73).abs() < 1e-5, "got {}", s.scale);
    }

    #[test]
    fn set_scale_ignores_nan() {
        let mut s = Settings::default();
        s.set_scale(f32::NAN);
        assert_eq!(s.scale, 0.5);
    }
}
