// ---------------------------------------------------------------------------
// Key / Button — windowing-library-independent input
// ---------------------------------------------------------------------------

/// A keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::PhysicalKey` → `Key`; everything else
/// in the input pipeline works purely with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    G,
    R,
    S,
    Q,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Other,
}

// ---------------------------------------------------------------------------
// InputAction — what the app does in response to input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Any mouse button went down: grow the reveal circle.
    PointerDown,
    /// Any mouse button came up: collapse the reveal circle.
    PointerUp,
    /// Left-drag in logical pixels.
    Orbit { dx: f32, dy: f32 },
    /// Right-drag in logical pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel steps, positive zooms in.
    Zoom { steps: f32 },
    ResetCamera,
    ToggleGui,
    /// Swap which source shows inside the circle.
    SwapSources,
    Quit,
}

/// Wheel pixels that count as one zoom step on trackpads.
const PIXELS_PER_STEP: f64 = 50.0;

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InputState {
    left_down: bool,
    right_down: bool,
    /// Buttons whose press the panel consumed; their release is swallowed too.
    captured: Vec<Button>,
    /// Last cursor position in logical pixels.
    cursor: Option<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a `Key` press into an `InputAction`, if the key is mapped.
    pub fn on_key(&self, key: Key) -> Option<InputAction> {
        match key {
            Key::G => Some(InputAction::ToggleGui),
            Key::R => Some(InputAction::ResetCamera),
            Key::S => Some(InputAction::SwapSources),
            Key::Q | Key::Escape => Some(InputAction::Quit),
        }
    }

    /// Update button state. `consumed` is whether the panel claimed the
    /// event; a press the panel claims never reaches the scene, and neither
    /// does the matching release.
    pub fn on_button(
        &mut self,
        button: Button,
        pressed: bool,
        consumed: bool,
    ) -> Option<InputAction> {
        if pressed {
            if consumed {
                if !self.captured.contains(&button) {
                    self.captured.push(button);
                }
                return None;
            }
            self.set_down(button, true);
            return Some(InputAction::PointerDown);
        }

        self.set_down(button, false);
        if let Some(i) = self.captured.iter().position(|b| *b == button) {
            self.captured.swap_remove(i);
            return None;
        }
        Some(InputAction::PointerUp)
    }

    fn set_down(&mut self, button: Button, down: bool) {
        match button {
            Button::Left => self.left_down = down,
            Button::Right => self.right_down = down,
            Button::Other => {}
        }
    }

    /// Track the cursor; produces a drag action while a button is held.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<InputAction> {
        let last = self.cursor.replace((x, y));
        let (lx, ly) = last?;
        let (dx, dy) = ((x - lx) as f32, (y - ly) as f32);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if self.left_down {
            Some(InputAction::Orbit { dx, dy })
        } else if self.right_down {
            Some(InputAction::Pan { dx, dy })
        } else {
            None
        }
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn on_scroll_lines(&self, lines: f32) -> Option<InputAction> {
        (lines != 0.0).then_some(InputAction::Zoom { steps: lines })
    }

    pub fn on_scroll_pixels(&self, pixels: f64) -> Option<InputAction> {
        self.on_scroll_lines((pixels / PIXELS_PER_STEP) as f32)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputState {
        InputState::new()
    }

    // --- Keys -----------------------------------------------------------------

    #[test]
    fn g_toggles_gui() {
        assert_eq!(input().on_key(Key::G), Some(InputAction::ToggleGui));
    }

    #[test]
    fn r_resets_camera() {
        assert_eq!(input().on_key(Key::R), Some(InputAction::ResetCamera));
    }

    #[test]
    fn s_swaps_sources() {
        assert_eq!(input().on_key(Key::S), Some(InputAction::SwapSources));
    }

    #[test]
    fn q_and_escape_quit() {
        assert_eq!(input().on_key(Key::Q), Some(InputAction::Quit));
        assert_eq!(input().on_key(Key::Escape), Some(InputAction::Quit));
    }

    // --- Buttons --------------------------------------------------------------

    #[test]
    fn any_button_press_and_release_drive_the_tween() {
        let mut i = input();
        for button in [Button::Left, Button::Right, Button::Other] {
            assert_eq!(i.on_button(button, true, false), Some(InputAction::PointerDown));
            assert_eq!(i.on_button(button, false, false), Some(InputAction::PointerUp));
        }
    }

    #[test]
    fn release_of_panel_press_is_swallowed() {
        let mut i = input();
        assert_eq!(i.on_button(Button::Left, true, true), None);
        // The panel usually claims the release as well; it must not matter.
        assert_eq!(i.on_button(Button::Left, false, false), None);

        // The next uncaptured click behaves normally again.
        assert_eq!(i.on_button(Button::Left, true, false), Some(InputAction::PointerDown));
        assert_eq!(i.on_button(Button::Left, false, true), Some(InputAction::PointerUp));
    }

    #[test]
    fn capture_is_per_button() {
        let mut i = input();
        i.on_button(Button::Left, true, true);
        assert_eq!(i.on_button(Button::Right, true, false), Some(InputAction::PointerDown));
        assert_eq!(i.on_button(Button::Right, false, false), Some(InputAction::PointerUp));
        assert_eq!(i.on_button(Button::Left, false, false), None);
    }

    #[test]
    fn panel_press_does_not_start_a_drag() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        i.on_button(Button::Left, true, true);
        assert_eq!(i.on_cursor_moved(4.0, 2.0), None);
    }

    #[test]
    fn release_clears_drag_even_when_captured() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        i.on_button(Button::Left, true, false);
        // A second press lands on the panel while the first is still held.
        i.on_button(Button::Left, true, true);
        assert_eq!(i.on_button(Button::Left, false, false), None);
        assert_eq!(i.on_cursor_moved(4.0, 2.0), None);
    }

    // --- Dragging -------------------------------------------------------------

    #[test]
    fn first_cursor_event_only_records_position() {
        let mut i = input();
        i.on_button(Button::Left, true, false);
        assert_eq!(i.on_cursor_moved(10.0, 10.0), None);
    }

    #[test]
    fn left_drag_orbits() {
        let mut i = input();
        i.on_cursor_moved(10.0, 10.0);
        i.on_button(Button::Left, true, false);
        assert_eq!(
            i.on_cursor_moved(15.0, 7.0),
            Some(InputAction::Orbit { dx: 5.0, dy: -3.0 })
        );
    }

    #[test]
    fn right_drag_pans() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        i.on_button(Button::Right, true, false);
        assert_eq!(
            i.on_cursor_moved(4.0, 2.0),
            Some(InputAction::Pan { dx: 4.0, dy: 2.0 })
        );
    }

    #[test]
    fn hover_without_buttons_does_nothing() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        assert_eq!(i.on_cursor_moved(4.0, 2.0), None);
    }

    #[test]
    fn release_stops_drag() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        i.on_button(Button::Left, true, false);
        i.on_button(Button::Left, false, false);
        assert_eq!(i.on_cursor_moved(4.0, 2.0), None);
    }

    #[test]
    fn leaving_window_resets_drag_origin() {
        let mut i = input();
        i.on_cursor_moved(0.0, 0.0);
        i.on_button(Button::Left, true, false);
        i.on_cursor_left();
        assert_eq!(i.on_cursor_moved(400.0, 200.0), None);
    }

    // --- Scroll ---------------------------------------------------------------

    #[test]
    fn scroll_lines_zoom() {
        assert_eq!(
            input().on_scroll_lines(2.0),
            Some(InputAction::Zoom { steps: 2.0 })
        );
        assert_eq!(input().on_scroll_lines(0.0), None);
    }

    #[test]
    fn scroll_pixels_convert_to_steps() {
        assert_eq!(
            input().on_scroll_pixels(-100.0),
            Some(InputAction::Zoom { steps: -2.0 })
        );
    }
}
