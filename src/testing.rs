//! Shared fixtures for unit tests.

use crate::resource::Resource;
use crate::stage::{Role, Stage};
use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Stage that records the resources it is applied to instead of running.
pub struct MockStage {
    name: String,
    role: Role,
    source_extension: String,
    target_extension: String,
    available: bool,
    calls: Mutex<Vec<String>>,
}

impl MockStage {
    /// Compiler reading `.source` files.
    pub fn compiler(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            role: Role::Compiler,
            source_extension: ".source".to_owned(),
            target_extension: String::new(),
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Minifier writing `.min.js` files.
    pub fn minifier(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            role: Role::Minifier,
            source_extension: String::new(),
            target_extension: ".min.js".to_owned(),
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Relative paths of the resources applied so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Stage for MockStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn source_extension(&self) -> &str {
        &self.source_extension
    }

    fn target_extension(&self) -> &str {
        &self.target_extension
    }

    fn available(&self) -> bool {
        self.available
    }

    fn process(&self, _source: &Path, _target: &Path) -> Result<()> {
        Ok(())
    }

    fn apply(&self, resource: &Resource, _force: bool) -> Result<bool> {
        self.calls.lock().push(resource.relpath().to_owned());
        Ok(true)
    }
}

/// Identity check between a bound stage and a concrete one.
pub fn same_stage<S: Stage>(bound: &Arc<dyn Stage>, stage: &Arc<S>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(bound), Arc::as_ptr(stage))
}

/// Create `relpath` under `root` (with parents) holding `content`.
pub fn touch(root: &Path, relpath: &str, content: &str) {
    let path = root.join(relpath);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
