use std::path::PathBuf;

use clap::Parser;

/// Tether: a native window hosting a webview wired to host-side commands.
#[derive(Parser, Debug)]
#[command(name = "tether", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// tracing directive such as `tether_bridge=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// First page to load instead of `window.url`.
    #[arg(long)]
    pub url: Option<String>,

    /// Directory served under `tether://localhost/` instead of `window.assets_dir`.
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}
