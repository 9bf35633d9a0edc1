//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r#"# Tether Configuration
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "Tether"
# width = 800             # 100-16384
# height = 600            # 100-16384
# min_width = 0           # 0 = unconstrained
# min_height = 0
# resizable = true
# url = "tether://localhost/"
# assets_dir = "/path/to/app"   # served under tether://localhost/
# devtools = false
# transparent = false
# user_agent = "MyApp/1.0"

[bridge]
# post_ttl_secs = 60      # 1-86400
# allowed_navigation = ["tether://", "http://tether.localhost", "about:blank"]

[logging]
# level = "info"          # trace, debug, info, warn, error
"#
}
