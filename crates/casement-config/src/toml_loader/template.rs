//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# casement configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# bind = "127.0.0.1"
# port = 5000
# path = "/ws"
# idle_timeout_secs = 300     # 0 disables the read timeout

[app]
# executable = "notepad.exe"
# class_filter = "Notepad"
# title_prefix = "Untitled"   # slot titles become "Untitled 1", "Untitled 2", ...
# max_instances = 2           # 1-16
# spawn_timeout_ms = 10000    # 100-120000
# close_grace_ms = 5000
# default_slots = [
#   { left = 100, top = 100, right = 500, bottom = 400 },
#   { left = 620, top = 100, right = 1120, bottom = 400 },
# ]

[sync]
# poll_interval_ms = 1000     # 100-60000
# event_capacity = 256

[store]
# backend = "file"            # file, memory
# path = "/path/to/positions.json"

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
    .to_string()
}
