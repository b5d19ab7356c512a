//! Request path to filesystem path resolution.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Percent-decode a request path and split it into non-empty segments.
///
/// Returns `None` when the decoded path is not valid UTF-8.
pub fn segments(path: &str) -> Option<Vec<String>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    Some(
        decoded
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// Resolve `segments` to an existing file under `root`.
pub fn resolve_file(root: &Path, segments: &[String]) -> Option<PathBuf> {
    // Reject suspicious segments before touching the filesystem
    if segments
        .iter()
        .any(|s| s == ".." || s == "." || s.contains(['\\', '\0']))
    {
        return None;
    }

    let local = segments.iter().fold(root.to_path_buf(), |path, s| path.join(s));

    // Canonicalize so symlinks cannot lead out of the root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::touch;
    use tempfile::TempDir;

    fn owned(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/lib//a%20b.js").unwrap(), ["lib", "a b.js"]);
        assert!(segments("/").unwrap().is_empty());
        assert!(segments("/%ff").is_none());
    }

    #[test]
    fn test_resolve_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "css/a.css", "");

        let found = resolve_file(dir.path(), &owned(&["css", "a.css"])).unwrap();
        assert!(found.ends_with("css/a.css"));
        assert!(resolve_file(dir.path(), &owned(&["css"])).is_none());
        assert!(resolve_file(dir.path(), &owned(&["css", "b.css"])).is_none());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root/a.css", "");
        touch(dir.path(), "secret.txt", "");
        let root = dir.path().join("root");

        assert!(resolve_file(&root, &owned(&["..", "secret.txt"])).is_none());
        assert!(resolve_file(&root, &owned(&[".", "a.css"])).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root/a.css", "");
        touch(dir.path(), "secret.txt", "");
        let root = dir.path().join("root");
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("link.txt")).unwrap();

        assert!(resolve_file(&root, &owned(&["link.txt"])).is_none());
    }
}
