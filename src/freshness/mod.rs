//! Freshness detection: mtime for build targets, content-hash (blake3) for
//! library signatures.

pub mod hash;
pub mod mtime;

pub use hash::{ContentHash, compute_dir_hash, compute_file_hash};
pub use mtime::{get_mtime, is_newer_than, should_process};
