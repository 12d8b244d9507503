/// Accumulates elapsed time from frame deltas.
///
/// The app measures real frame time and feeds it in; nothing here reads the
/// wall clock, so the scene can be stepped deterministically in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    elapsed: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas are dropped.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
