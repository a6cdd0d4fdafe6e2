//! Path handling for nodes inside a container
//!
//! Node paths are `/`-separated and relative to the container root. The root
//! itself is the empty string.

use alloc::string::String;
use alloc::vec::Vec;

/// Normalize a node path.
///
/// Drops empty and `.` segments and resolves `..` without ever climbing above
/// the container root.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// All proper ancestors of a normalized path, root first, excluding the root
pub fn parent_paths(path: &str) -> Vec<String> {
    let normalized = normalize_path(path);
    let mut parents = Vec::new();

    for (idx, byte) in normalized.bytes().enumerate() {
        if byte == b'/' {
            parents.push(String::from(&normalized[..idx]));
        }
    }

    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("volumes/raw"), "volumes/raw");
        assert_eq!(normalize_path("/volumes//raw/"), "volumes/raw");
        assert_eq!(normalize_path("./volumes/./raw"), "volumes/raw");
        assert_eq!(normalize_path("volumes/labels/../raw"), "volumes/raw");
        assert_eq!(normalize_path("../../raw"), "raw");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_parent_paths() {
        assert_eq!(parent_paths("a/b/c"), vec!["a", "a/b"]);
        assert_eq!(parent_paths("/a/"), Vec::<String>::new());
        assert_eq!(parent_paths(""), Vec::<String>::new());
    }
}
