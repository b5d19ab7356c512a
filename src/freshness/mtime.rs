//! Mtime-based staleness for build stage targets.
//!
//! A target is rebuilt when it is missing, or when its source exists and
//! carries a strictly newer modification time.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `true` if A exists and is newer than B
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Decide whether `target` has to be (re)built from `source`.
///
/// - target missing: `true`
/// - source strictly newer than target: `true`
/// - otherwise (including a missing source): `false`, nothing to rebuild from
pub fn should_process(source: Option<&Path>, target: &Path) -> bool {
    if !target.exists() {
        return true;
    }
    source.is_some_and(|source| is_newer_than(source, target))
}
