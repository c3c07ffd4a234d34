//! Filesystem collaborators for the protocol engine: virtual-path
//! resolution anchored at the configured root directory, and the
//! directory-entry formatting used by LIST.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Lexically normalizes a virtual path so that it is `/`-rooted and no
/// `..` segment survives. `..` at the root stays at the root, so a
/// client can never climb above `/`.
pub fn normalize_virtual(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    if stack.is_empty() {
        String::from("/")
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Resolves a command parameter against the current working directory:
/// absolute parameters replace it outright, relative parameters are
/// joined, and the result is normalized.
pub fn resolve_virtual(current_dir: &str, param: &str) -> String {
    if param.starts_with('/') {
        normalize_virtual(param)
    } else {
        normalize_virtual(&format!("{}/{}", current_dir, param))
    }
}

/// Maps a normalized virtual path onto the real filesystem under the
/// configured root. Because the virtual path is `/`-rooted and free of
/// `..` segments, the result cannot escape the root.
pub fn to_real_path(root: &Path, virtual_path: &str) -> PathBuf {
    root.join(virtual_path.trim_start_matches('/'))
}

/// Formats one listing line:
/// `mode 1 owner group size Mon dd hh:mm name`, CRLF terminated.
/// Link count and owner/group are literal placeholders.
pub fn format_list_entry(name: &str, metadata: &Metadata) -> String {
    let modified: DateTime<Local> = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now());
    format!(
        "{} 1 owner group {} {} {}\r\n",
        format_mode(metadata),
        metadata.len(),
        modified.format("%b %d %H:%M"),
        name
    )
}

#[cfg(unix)]
fn format_mode(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn format_mode(metadata: &Metadata) -> String {
    if metadata.is_dir() {
        String::from("drwxr-xr-x")
    } else {
        String::from("-rw-r--r--")
    }
}
