//! Applying facade work on the UI thread.

use tether_bridge::SizeHint;
use tether_common::Event;
use tether_webview::UiCommand;
use winit::dpi::LogicalSize;

use super::core::TetherApp;

impl TetherApp {
    pub(super) fn apply_ui_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::Evaluate(script) => match &self.webview {
                Some(webview) => {
                    if let Err(e) = webview.evaluate_script(&script) {
                        tracing::error!(error = %e, script_len = script.len(), "Script evaluation failed");
                    }
                }
                None => tracing::warn!("Script dropped: no webview"),
            },

            UiCommand::Show => self.set_visible(true),
            UiCommand::Hide => self.set_visible(false),

            UiCommand::Navigate(url) => {
                if let Some(webview) = &mut self.webview {
                    if let Err(e) = webview.navigate(&url) {
                        tracing::warn!(url = %url, error = %e, "Navigation failed");
                    }
                }
            }

            UiCommand::SetTitle(title) => {
                if let Some(window) = &self.window {
                    window.set_title(&title);
                }
            }

            UiCommand::SetSize {
                width,
                height,
                hint,
            } => self.apply_size(width, height, hint),

            UiCommand::ShowInspector => {
                if let Some(webview) = &self.webview {
                    webview.open_devtools();
                }
            }

            UiCommand::Close(code) => {
                tracing::info!(code, "Window close requested by bridge");
                self.event_bus.publish(Event::WindowClosed { code });
                self.request_exit(code);
            }

            UiCommand::Exit(code) => {
                tracing::info!(code, "Exit requested by bridge");
                self.request_exit(code);
            }
        }
    }

    fn set_visible(&self, visible: bool) {
        if let Some(window) = &self.window {
            window.set_visible(visible);
        }
        self.event_bus.publish(if visible {
            Event::WindowShown
        } else {
            Event::WindowHidden
        });
    }

    fn apply_size(&self, width: u32, height: u32, hint: SizeHint) {
        let Some(window) = &self.window else {
            return;
        };
        let size = LogicalSize::new(width as f64, height as f64);
        match hint {
            SizeHint::None => {
                window.set_resizable(self.config.window.resizable);
                let _ = window.request_inner_size(size);
            }
            SizeHint::Min => window.set_min_inner_size(Some(size)),
            SizeHint::Max => window.set_max_inner_size(Some(size)),
            SizeHint::Fixed => {
                let _ = window.request_inner_size(size);
                window.set_resizable(false);
            }
        }
    }
}
