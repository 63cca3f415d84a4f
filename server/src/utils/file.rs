//! Path helpers

use std::path::PathBuf;

/// Turn a user-supplied path into an absolute one.
///
/// `~` and `~/rest` resolve against the home directory. Relative paths
/// (including bare names) resolve against the current directory. Empty
/// input yields the current directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match path {
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => match (path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        },
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}
