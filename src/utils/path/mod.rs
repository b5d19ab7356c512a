//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects except
//! `normalize_path`, which consults the filesystem to canonicalize.
//!
//! Extensions are handled in their dotted form (`.js`), and only the last
//! component counts: the extension of `a.min.js` is `.js`.

use std::path::{Path, PathBuf};

/// Normalize a path to an absolute path, resolving symlinks when it exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Byte offset of the extension dot in the final component, if any.
///
/// Leading dots (`.hidden`) do not start an extension.
fn extension_start(relpath: &str) -> Option<usize> {
    let name_start = relpath.rfind('/').map_or(0, |i| i + 1);
    let name = &relpath[name_start..];
    match name.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(name_start + dot),
    }
}

/// Dotted extension of a relative path: `"js/app.min.js"` → `Some(".js")`.
pub fn extension(relpath: &str) -> Option<&str> {
    extension_start(relpath).map(|start| &relpath[start..])
}

/// Replace the extension of a relative path with `ext` (dotted).
///
/// A path without an extension gets `ext` appended.
pub fn replace_extension(relpath: &str, ext: &str) -> String {
    let stem = extension_start(relpath).map_or(relpath, |start| &relpath[..start]);
    format!("{stem}{ext}")
}
