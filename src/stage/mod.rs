//! Build stages: named, pluggable source → target transforms.
//!
//! A stage is either a *compiler* (produces the resource's own file from a
//! source file) or a *minifier* (produces the minified variant from the
//! resource's file). Both only run when their target is stale, unless forced.
//!
//! Two families implement [`Stage`]:
//! - [`CommandStage`]: runs an external program with `$SOURCE`/`$TARGET`
//!   placeholders substituted
//! - [`MinifyStage`]: minifies in process (oxc / lightningcss)

pub mod builtin;
mod command;
mod minify;

pub use command::{CommandStage, SOURCE, TARGET};
pub use minify::{MinifyStage, minify_css, minify_js};

use crate::debug;
use crate::freshness::should_process;
use crate::registry::{Named, Registry};
use crate::resource::Resource;
use crate::utils::path::replace_extension;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Registry of stages for a single role.
pub type StageRegistry = Registry<dyn Stage>;

/// Which end of the pipeline a stage sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Compiler,
    Minifier,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compiler => "compiler",
            Self::Minifier => "minifier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transform from a source file to a target file.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn role(&self) -> Role;

    /// Dotted extension of the files this stage reads (compilers).
    fn source_extension(&self) -> &str {
        ""
    }

    /// Dotted extension of the files this stage writes (minifiers).
    fn target_extension(&self) -> &str {
        ""
    }

    /// Whether the backing tool is present. Implementations compute this
    /// once and cache it.
    fn available(&self) -> bool;

    /// Transform `source` into `target` unconditionally.
    fn process(&self, source: &Path, target: &Path) -> Result<()>;

    fn source_path(&self, resource: &Resource) -> PathBuf {
        match self.role() {
            Role::Compiler => {
                let library = resource.library();
                match resource.source() {
                    Some(source) => library.path(source),
                    None => library.path(&replace_extension(
                        resource.relpath(),
                        self.source_extension(),
                    )),
                }
            }
            Role::Minifier => resource.path(),
        }
    }

    fn target_path(&self, resource: &Resource) -> PathBuf {
        match self.role() {
            Role::Compiler => resource.path(),
            Role::Minifier => match resource.minified() {
                Some(variant) => variant.path(),
                None => resource.library().path(&replace_extension(
                    resource.relpath(),
                    self.target_extension(),
                )),
            },
        }
    }

    /// Run the stage for `resource` if it is available and the target is
    /// stale (or `force` is set). Returns whether `process` ran.
    fn apply(&self, resource: &Resource, force: bool) -> Result<bool> {
        if !self.available() {
            debug!(self.role().as_str(); "`{}` unavailable, skipping {}", self.name(), resource.relpath());
            return Ok(false);
        }

        let source = self.source_path(resource);
        let target = self.target_path(resource);
        if !force && !should_process(Some(&source), &target) {
            return Ok(false);
        }

        debug!(self.role().as_str(); "{} {} -> {}", self.name(), source.display(), target.display());
        self.process(&source, &target).with_context(|| {
            format!(
                "{} `{}` failed on {}",
                self.role(),
                self.name(),
                source.display()
            )
        })?;
        Ok(true)
    }
}

impl Named for dyn Stage {
    fn name(&self) -> &str {
        Stage::name(self)
    }
}

/// Record of one stage run, returned by resource and resolver compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub library: String,
    pub relpath: String,
    pub stage: String,
    pub role: Role,
}
