use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod app;
mod config;
mod gui;
mod input;

use app::App;
use config::Config;
use input::{Button, InputAction, Key};

// ---------------------------------------------------------------------------
// winit → input mapping
// ---------------------------------------------------------------------------

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyG => Some(Key::G),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn map_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        _ => Button::Other,
    }
}

// ---------------------------------------------------------------------------
// Handler — winit ApplicationHandler
// ---------------------------------------------------------------------------

struct Handler {
    config: Config,
    window: Option<Arc<Window>>,
    app: Option<App>,
    /// Set when setup fails inside the event loop; reported by `main`.
    error: Option<anyhow::Error>,
}

impl Handler {
    fn dispatch(&mut self, event_loop: &ActiveEventLoop, action: Option<InputAction>) {
        let (Some(app), Some(action)) = (&mut self.app, action) else {
            return;
        };
        if app.handle_action(action) {
            log::info!("Quit requested — exiting");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for Handler {
    /// Called once on desktop when the event loop starts.
    /// Creates the window then initialises the wgpu surface.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("Reveal")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(anyhow::Error::new(e).context("failed to create window"));
                event_loop.exit();
                return;
            }
        };

        log::info!(
            "Window created ({}×{} logical)",
            self.config.width,
            self.config.height
        );

        match App::new(Arc::clone(&window), &self.config) {
            Ok(app) => {
                self.window = Some(window);
                self.app = Some(app);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };
        let consumed = app.on_gui_event(&event);

        match event {
            // ----------------------------------------------------------------
            // Exit
            // ----------------------------------------------------------------
            WindowEvent::CloseRequested => {
                log::info!("Close requested — exiting");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !consumed => {
                let action = map_key(code).and_then(|key| app.on_key_pressed(key));
                self.dispatch(event_loop, action);
            }

            // ----------------------------------------------------------------
            // Pointer — a press the panel claims keeps its release with the
            // panel too; InputState still clears the drag on release.
            // ----------------------------------------------------------------
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                let action = app.on_button(map_button(button), pressed, consumed);
                self.dispatch(event_loop, action);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let action = app.on_cursor_moved(position.x, position.y);
                if !consumed {
                    self.dispatch(event_loop, action);
                }
            }

            WindowEvent::CursorLeft { .. } => app.on_cursor_left(),

            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let action = match delta {
                    MouseScrollDelta::LineDelta(_, y) => app.on_scroll_lines(y),
                    MouseScrollDelta::PixelDelta(pos) => app.on_scroll_pixels(pos.y),
                };
                self.dispatch(event_loop, action);
            }

            // ----------------------------------------------------------------
            // Resize — reconfigure the wgpu surface
            // ----------------------------------------------------------------
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => app.resize(),

            // ----------------------------------------------------------------
            // Redraw
            // ----------------------------------------------------------------
            WindowEvent::RedrawRequested => match app.render() {
                Ok(()) => {}
                // Surface lost / outdated: reconfigure and try again next frame.
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.resize(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory — exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            },

            _ => {}
        }
    }

    /// Drive continuous redraws (game-loop style).
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = Handler {
        config,
        window: None,
        app: None,
        error: None,
    };
    event_loop.run_app(&mut handler)?;

    match handler.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_keys() {
        assert_eq!(map_key(KeyCode::KeyG), Some(Key::G));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn middle_button_is_other() {
        assert_eq!(map_button(MouseButton::Middle), Button::Other);
        assert_eq!(map_button(MouseButton::Left), Button::Left);
    }
}
