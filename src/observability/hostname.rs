//! Serving-host identification

use std::fs;

const HOSTNAME_FILES: [&str; 2] = ["/proc/sys/kernel/hostname", "/etc/hostname"];

/// Name reported as `hostname` in responses and logs.
///
/// Resolution order: the configured instance name, `$HOSTNAME`, the kernel
/// hostname files, then `"unknown"`.
pub fn resolve_hostname(configured: Option<&str>) -> String {
    if let Some(name) = non_empty(configured) {
        return name;
    }

    if let Some(name) = non_empty(std::env::var("HOSTNAME").ok().as_deref()) {
        return name;
    }

    HOSTNAME_FILES
        .iter()
        .find_map(|path| non_empty(fs::read_to_string(path).ok().as_deref()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
