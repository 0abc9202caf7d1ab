//! Path helpers for the drvfs namespace and for configuration paths.
//!
//! Canonical node paths carry no leading slash (`dmspi0/1`), directory paths
//! end in a slash (`dmspi0/`) and the root is `/`. Callers may add or omit the
//! leading slash; lookups normalize first.

use alloc::format;
use alloc::string::{String, ToString};

use crate::config::{CONFIG_EXTENSION, ROOT_DIRECTORY};

/// Normalize a file path for comparison with canonical node paths.
pub fn node_key(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Normalize a directory path for comparison with node parent directories.
pub fn directory_key(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        ROOT_DIRECTORY.to_string()
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

/// Last component of `path`, ignoring a trailing slash.
pub fn final_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `base_name` of a configuration file with the `.ini` extension removed.
pub fn config_stem(path: &str) -> &str {
    let name = base_name(path);
    name.strip_suffix(CONFIG_EXTENSION).unwrap_or(name)
}

pub fn join(dir: &str, entry: &str) -> String {
    if dir.is_empty() || dir.ends_with('/') {
        format!("{}{}", dir, entry)
    } else {
        format!("{}/{}", dir, entry)
    }
}
