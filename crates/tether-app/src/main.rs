mod app_state;
mod cli;
mod commands;
mod host_events;

use tether_common::EventBus;
use tether_config::{LogLevel, TetherConfig};
use tether_webview::UiCommand;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

/// Printed for every panic. The hook runs before unwinding, so this also
/// shows for handler panics the bridge goes on to turn into failures.
fn panic_banner(thread: Option<&str>) -> String {
    format!(
        "\n--- tether panic on thread `{}` ---",
        thread.unwrap_or("<unnamed>")
    )
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("{}", panic_banner(std::thread::current().name()));
        default_hook(info);
    }));
}

/// Turn a bare level into a `tether*` directive; pass anything else through.
fn log_directive(cli: Option<&str>, configured: LogLevel) -> String {
    match cli {
        Some(level @ ("trace" | "debug" | "info" | "warn" | "error")) => format!("tether={level}"),
        Some(directive) => directive.to_string(),
        None => format!("tether={}", configured.as_str()),
    }
}

fn load_config(args: &cli::Args) -> (TetherConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => tether_config::load_from_path(path),
        None => tether_config::load_default(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (TetherConfig::default(), Some(e.to_string())),
    };
    if let Some(url) = &args.url {
        config.window.url = url.clone();
    }
    if let Some(dir) = &args.assets {
        config.window.assets_dir = Some(dir.clone());
    }
    (config, error)
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Config is read before logging is up so `logging.level` can apply.
    let (config, config_error) = load_config(&args);

    let directive = log_directive(args.log_level.as_deref(), config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "tether=info".parse().expect("static directive")),
            ),
        )
        .init();

    tracing::info!("tether v{} starting...", env!("CARGO_PKG_VERSION"));
    match config_error {
        Some(e) => tracing::warn!("Config load failed, using defaults: {e}"),
        None => tracing::info!(title = %config.window.title, url = %config.window.url, "Config loaded"),
    }
    if let Err(e) = tether_config::validation::validate(&config) {
        tracing::warn!("Config has invalid values: {e}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .thread_name("tether-worker")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let event_bus = EventBus::new(256);
    let _listener = host_events::spawn_listener(runtime.handle(), &event_bus);

    let event_loop = match EventLoop::<UiCommand>::with_user_event().build() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::TetherApp::new(config, runtime, event_bus)
        .with_proxy(event_loop.create_proxy());

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    let code = app.exit_code();
    tracing::info!(code, "Shutdown complete");
    if code != 0 {
        std::process::exit(code);
    }
}
