use keyframe::EasingFunction;

// ---------------------------------------------------------------------------
// Ease
// ---------------------------------------------------------------------------

/// Easing curve applied to a tween's normalised progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// `1 - (1 - t)^2`, the classic "power1.out" default.
    #[default]
    QuadOut,
    QuadIn,
    QuadInOut,
    CubicOut,
    /// Cubic-bezier ease-in-out as provided by `keyframe`.
    EaseInOut,
}

impl EasingFunction for Ease {
    fn y(&self, x: f64) -> f64 {
        use keyframe::functions::{
            EaseInOut, EaseInOutQuad, EaseInQuad, EaseOutCubic, EaseOutQuad, Linear,
        };
        let x = x.clamp(0.0, 1.0);
        match self {
            Ease::Linear => Linear.y(x),
            Ease::QuadOut => EaseOutQuad.y(x),
            Ease::QuadIn => EaseInQuad.y(x),
            Ease::QuadInOut => EaseInOutQuad.y(x),
            Ease::CubicOut => EaseOutCubic.y(x),
            Ease::EaseInOut => EaseInOut.y(x),
        }
    }
}

impl Ease {
    pub const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::QuadOut,
        Ease::QuadIn,
        Ease::QuadInOut,
        Ease::CubicOut,
        Ease::EaseInOut,
    ];

    pub fn eval(&self, x: f32) -> f32 {
        self.y(x as f64) as f32
    }
}

// ---------------------------------------------------------------------------
// Tween — one eased scalar transition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl Tween {
    /// Tween from `current` towards `target`. The start value is captured
    /// now, so a tween that interrupts another continues from wherever the
    /// value currently sits.
    pub fn to(current: f32, target: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from: current,
            to: target,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Advance by `dt` seconds and return the eased value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.ease.eval(t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

// ---------------------------------------------------------------------------
// Tweener — drives a single channel, latest tween wins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Tweener {
    active: Option<Tween>,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any running tween with a new one starting at `current`.
    pub fn start(&mut self, current: f32, target: f32, duration: f32, ease: Ease) {
        log::trace!("tween {current:.3} -> {target:.3} over {duration}s ({ease:?})");
        self.active = Some(Tween::to(current, target, duration, ease));
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Step the running tween and write its value into `value`.
    ///
    /// Returns `true` if `value` was written this frame.
    pub fn update(&mut self, dt: f32, value: &mut f32) -> bool {
        let Some(tween) = self.active.as_mut() else {
            return false;
        };
        *value = tween.advance(dt);
        if tween.finished() {
            self.active = None;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Ease -----------------------------------------------------------------

    #[test]
    fn every_ease_hits_endpoints() {
        for ease in Ease::ALL {
            assert!(ease.eval(0.0).abs() < 1e-3, "{ease:?} at 0");
            assert!((ease.eval(1.0) - 1.0).abs() < 1e-3, "{ease:?} at 1");
        }
    }

    #[test]
    fn quad_out_front_loads_progress() {
        // 1 - 0.5^2 = 0.75
        assert!((Ease::QuadOut.eval(0.5) - 0.75).abs() < 1e-6);
        assert!((Ease::QuadIn.eval(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn quad_and_cubic_curves_follow_keyframe() {
        use keyframe::functions::{EaseInOutQuad, EaseInQuad, EaseOutCubic, EaseOutQuad};
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            assert!((Ease::QuadOut.y(x) - EaseOutQuad.y(x)).abs() < 1e-9, "QuadOut at {x}");
            assert!((Ease::QuadIn.y(x) - EaseInQuad.y(x)).abs() < 1e-9, "QuadIn at {x}");
            assert!((Ease::QuadInOut.y(x) - EaseInOutQuad.y(x)).abs() < 1e-9, "QuadInOut at {x}");
            assert!((Ease::CubicOut.y(x) - EaseOutCubic.y(x)).abs() < 1e-9, "CubicOut at {x}");
        }
    }

    #[test]
    fn ease_clamps_out_of_range_input() {
        assert!((Ease::QuadOut.eval(2.0) - 1.0).abs() < 1e-6);
        assert!(Ease::QuadOut.eval(-1.0).abs() < 1e-6);
    }

    // --- Tween ----------------------------------------------------------------

    #[test]
    fn tween_reaches_target_after_duration() {
        let mut t = Tween::to(0.5, 2.0, 0.5, Ease::QuadOut);
        t.advance(0.25);
        assert!(!t.finished());
        let v = t.advance(0.25);
        assert!(t.finished());
        assert!((v - 2.0).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn tween_midpoint_uses_ease() {
        let mut t = Tween::to(0.0, 2.0, 1.0, Ease::QuadOut);
        let v = t.advance(0.5);
        assert!((v - 1.5).abs() < 1e-5, "got {v}");
    }

    #[test]
    fn tween_does_not_overshoot() {
        let mut t = Tween::to(0.0, 1.0, 0.5, Ease::Linear);
        let v = t.advance(10.0);
        assert!((v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let t = Tween::to(1.0, 0.0, 0.0, Ease::Linear);
        assert!(t.finished());
        assert_eq!(t.value(), 0.0);
    }

    // --- Tweener --------------------------------------------------------------

    #[test]
    fn tweener_idle_leaves_value_alone() {
        let mut tw = Tweener::new();
        let mut v = 0.5;
        assert!(!tw.update(0.1, &mut v));
        assert_eq!(v, 0.5);
    }

    #[test]
    fn tweener_drops_tween_when_done() {
        let mut tw = Tweener::new();
        let mut v = 0.5;
        tw.start(v, 2.0, 0.5, Ease::QuadOut);
        assert!(tw.is_active());
        tw.update(0.6, &mut v);
        assert!(!tw.is_active());
        assert!((v - 2.0).abs() < 1e-6);
    }

    #[test]
    fn new_tween_continues_from_current_value() {
        let mut tw = Tweener::new();
        let mut v = 0.5;
        tw.start(v, 2.0, 0.5, Ease::Linear);
        tw.update(0.25, &mut v); // halfway: 1.25
        assert!((v - 1.25).abs() < 1e-5);

        tw.start(v, 0.0, 0.5, Ease::Linear);
        tw.update(0.25, &mut v); // halfway from 1.25 to 0
        assert!((v - 0.625).abs() < 1e-5, "got {v}");
        tw.update(0.25, &mut v);
        assert!(v.abs() < 1e-6);
    }
}
