//! Host identification.

use std::path::Path;

/// What we know about the machine we are running on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: Option<String>,
    /// Lowercased first word of `/etc/issue`, e.g. `ubuntu`
    pub distro: Option<String>,
}

impl HostInfo {
    /// Detect the current host.
    pub fn detect() -> Self {
        let info = HostInfo {
            hostname: hostname(),
            distro: distro_from_issue(Path::new("/etc/issue")),
        };
        tracing::debug!(
            "host: {} ({})",
            info.hostname.as_deref().unwrap_or("unknown"),
            info.distro.as_deref().unwrap_or("unknown distribution")
        );
        info
    }
}

/// The short hostname, without any domain part.
pub fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .or_else(|| read_first_line(Path::new("/etc/hostname")))
        .or_else(|| read_first_line(Path::new("/proc/sys/kernel/hostname")))
        .map(|h| short_name(&h))
}

fn short_name(hostname: &str) -> String {
    hostname
        .trim()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn read_first_line(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let line = contents.lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// Distribution identifier from an issue file: its first word, lowercased.
pub fn distro_from_issue(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    parse_issue(&contents)
}

fn parse_issue(contents: &str) -> Option<String> {
    contents
        .split_whitespace()
        .next()
        .map(|word| word.to_lowercase())
}
