use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures raised by a window facade implementation.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("window event loop has shut down")]
    EventLoopClosed,

    #[error("webview error: {0}")]
    WebView(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}
