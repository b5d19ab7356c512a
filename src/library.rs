//! Asset roots ("libraries").
//!
//! A library is a named directory of assets. Its name is the first URL
//! segment when publishing, and it carries the default compiler/minifier
//! per file extension for the resources declared in it.

use crate::freshness::compute_dir_hash;
use crate::registry::Named;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug)]
pub struct Library {
    name: String,
    root: PathBuf,
    /// Dotted extension → compiler name.
    compilers: FxHashMap<String, String>,
    /// Dotted extension → minifier name.
    minifiers: FxHashMap<String, String>,
    version: Option<String>,
    signature: OnceLock<String>,
}

impl Library {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            compilers: FxHashMap::default(),
            minifiers: FxHashMap::default(),
            version: None,
            signature: OnceLock::new(),
        }
    }

    /// Default compiler for files ending in `ext` (e.g. `".js"`).
    pub fn with_compiler(mut self, ext: impl Into<String>, stage: impl Into<String>) -> Self {
        self.compilers.insert(ext.into(), stage.into());
        self
    }

    /// Default minifier for files ending in `ext`.
    pub fn with_minifier(mut self, ext: impl Into<String>, stage: impl Into<String>) -> Self {
        self.minifiers.insert(ext.into(), stage.into());
        self
    }

    /// Pin the signature instead of hashing the file tree.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (or root-relative, for a relative root) path of `relpath`.
    pub fn path(&self, relpath: &str) -> PathBuf {
        self.root.join(relpath)
    }

    pub fn default_compiler(&self, ext: &str) -> Option<&str> {
        self.compilers.get(ext).map(String::as_str)
    }

    pub fn default_minifier(&self, ext: &str) -> Option<&str> {
        self.minifiers.get(ext).map(String::as_str)
    }

    /// Opaque token identifying the library's current content.
    ///
    /// The configured version if any, else a blake3 fingerprint of the
    /// file tree, computed on first use and kept for the process lifetime.
    pub fn signature(&self) -> &str {
        self.signature.get_or_init(|| match &self.version {
            Some(version) => version.clone(),
            None => compute_dir_hash(&self.root).short(),
        })
    }
}

impl Named for Library {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_joins_root() {
        let lib = Library::new("lib", "/foo");
        assert_eq!(lib.path("a.js"), PathBuf::from("/foo/a.js"));
        assert_eq!(lib.path("js/b.js"), PathBuf::from("/foo/js/b.js"));
    }

    #[test]
    fn test_default_stages_by_extension() {
        let lib = Library::new("lib", "")
            .with_compiler(".js", "coffee")
            .with_minifier(".css", "cssmin");
        assert_eq!(lib.default_compiler(".js"), Some("coffee"));
        assert_eq!(lib.default_compiler(".css"), None);
        assert_eq!(lib.default_minifier(".css"), Some("cssmin"));
    }

    #[test]
    fn test_signature_uses_version() {
        let lib = Library::new("lib", "/nonexistent").with_version("1.2.3");
        assert_eq!(lib.signature(), "1.2.3");
    }

    #[test]
    fn test_signature_hashes_tree_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "a").unwrap();
        let lib = Library::new("lib", dir.path());

        let first = lib.signature().to_string();
        assert_eq!(first.len(), 16);

        // computed once; later edits need a new process (or a new Library)
        fs::write(dir.path().join("a.js"), "b").unwrap();
        assert_eq!(lib.signature(), first);
        assert_ne!(Library::new("lib", dir.path()).signature(), first);
    }
}
