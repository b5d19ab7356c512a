//! Content hashing using blake3.
//!
//! Library signatures are derived from these hashes so that a library's
//! hash-marker URL changes whenever any of its files change.

use jwalk::WalkDir;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create a hash representing "no content" (all zeros).
    #[inline]
    pub const fn empty() -> Self {
        Self([0; 32])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 32]
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First 16 hex chars, used as a URL token.
    pub fn short(self) -> String {
        self.to_hex()[..16].to_string()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Compute blake3 hash of file contents.
///
/// Unreadable or missing files hash to [`ContentHash::empty`].
pub fn compute_file_hash(path: &Path) -> ContentHash {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return ContentHash::empty(),
    };

    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return ContentHash::empty(),
        }
    }

    ContentHash::new(*hasher.finalize().as_bytes())
}

/// Compute hash of a directory's contents (recursive, sorted).
///
/// Relative paths are hashed along with contents, so renaming a file changes
/// the result too.
pub fn compute_dir_hash(path: &Path) -> ContentHash {
    if !path.is_dir() {
        return ContentHash::empty();
    }

    let mut hasher = blake3::Hasher::new();
    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();

    for file_path in files {
        let rel = file_path.strip_prefix(path).unwrap_or(&file_path);
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update(compute_file_hash(&file_path).as_bytes());
    }

    ContentHash::new(*hasher.finalize().as_bytes())
}
