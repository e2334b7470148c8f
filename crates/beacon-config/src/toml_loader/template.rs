//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Beacon Configuration
# Only override what you want to change -- missing fields use defaults.

[application]
# id = 1381335767607152740
# flags = 0

[connection]
# transport = "ipc"        # ipc, stub
# handshake_timeout = 10   # 1-60 seconds

[presence]
# details = "Artifact Virtual Assistant"
# state = "Managing Discord Community"
# active_state = "Active since startup"
# category = "playing"     # playing, streaming, listening, watching, custom, competing
# end = 1767225600         # epoch seconds
# large_image = "artifact_logo"
# large_text = "Artifact Virtual System"
# small_image = "online_status"
# small_text = "Online and Ready"

[timing]
# poll_interval_ms = 16    # 1-1000

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
    .to_string()
}
