//! `ApplicationHandler` implementation for the winit event loop.

use tether_common::Event;
use tether_webview::UiCommand;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::TetherApp;

impl ApplicationHandler<UiCommand> for TetherApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
        }
    }

    /// Work queued by the window facade from handlers and completions.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: UiCommand) {
        self.apply_ui_command(command);
        if self.should_exit {
            self.shutdown();
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.event_bus.publish(Event::WindowClosed { code: 0 });
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_webview_bounds();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.sync_webview_bounds();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            self.shutdown();
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}
