//! Declared resources.
//!
//! A resource is one file of a library plus everything needed to include it
//! correctly: its dependencies, the stages that build it, and an optional
//! minified counterpart. Resources are declared once at startup against a
//! [`Context`] and shared as `Arc<Resource>` afterwards.
//!
//! ```ignore
//! let lib = ctx.add_library(Library::new("app", "static"))?;
//! let base = Resource::declare(&ctx, &lib, "base.js").build()?;
//! let app = Resource::declare(&ctx, &lib, "app.js")
//!     .depend(&base)
//!     .compiler("coffee")
//!     .minifier("jsmin")
//!     .build()?;
//! ```

mod binding;

pub use binding::Binding;

use crate::context::Context;
use crate::error::{ConfigError, ConfigResult};
use crate::library::Library;
use crate::publisher::HASH_MARKER;
use crate::stage::{Invocation, Stage};
use crate::utils::path::{extension, replace_extension};
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Declaration counter; doubles as resource identity.
static NEXT_SERIAL: AtomicUsize = AtomicUsize::new(0);

fn next_serial() -> usize {
    NEXT_SERIAL.fetch_add(1, Ordering::Relaxed)
}

/// Minified counterpart of a resource, as given at declaration.
#[derive(Debug, Clone)]
pub enum Minified {
    /// Relative path in the same library; a variant resource is created.
    Path(String),
    /// An already declared resource.
    Resource(Arc<Resource>),
}

pub struct Resource {
    serial: usize,
    library: Arc<Library>,
    relpath: String,
    depends: Vec<Arc<Resource>>,
    depth: usize,
    compiler: Option<Arc<dyn Stage>>,
    minifier: Option<Arc<dyn Stage>>,
    minified: Option<Arc<Resource>>,
    source: Option<String>,
}

impl Resource {
    /// Start declaring `relpath` in `library`.
    pub fn declare<'a>(
        ctx: &'a Context,
        library: &Arc<Library>,
        relpath: impl Into<String>,
    ) -> ResourceBuilder<'a> {
        ResourceBuilder {
            ctx,
            library: Arc::clone(library),
            relpath: relpath.into(),
            depends: Vec::new(),
            compiler: Binding::Inherit,
            minifier: Binding::Inherit,
            minified: None,
            source: None,
        }
    }

    /// Declaration serial, unique per process.
    pub fn serial(&self) -> usize {
        self.serial
    }

    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    pub fn relpath(&self) -> &str {
        &self.relpath
    }

    /// Filesystem path of the resource's own file.
    pub fn path(&self) -> PathBuf {
        self.library.path(&self.relpath)
    }

    pub fn depends(&self) -> &[Arc<Resource>] {
        &self.depends
    }

    /// 0 without dependencies, else one more than the deepest dependency.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn compiler(&self) -> Option<&Arc<dyn Stage>> {
        self.compiler.as_ref()
    }

    pub fn minifier(&self) -> Option<&Arc<dyn Stage>> {
        self.minifier.as_ref()
    }

    pub fn minified(&self) -> Option<&Arc<Resource>> {
        self.minified.as_ref()
    }

    /// Source override, relative to the library root.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// URL under a publisher mounted at `prefix`.
    ///
    /// With `versioned`, the library signature is inserted as a hash-marker
    /// segment, which makes the response cacheable forever.
    pub fn url(&self, prefix: &str, versioned: bool) -> String {
        let prefix = prefix.trim_end_matches('/');
        let library = self.library.name();
        if versioned {
            format!(
                "{prefix}/{library}/{HASH_MARKER}{}/{}",
                self.library.signature(),
                self.relpath
            )
        } else {
            format!("{prefix}/{library}/{}", self.relpath)
        }
    }

    /// Run the bound compiler, then the bound minifier.
    ///
    /// Stops at the first failing stage.
    pub fn compile(&self, force: bool) -> Result<Vec<Invocation>> {
        let mut invocations = Vec::new();
        for stage in [&self.compiler, &self.minifier].into_iter().flatten() {
            if stage.apply(self, force)? {
                invocations.push(Invocation {
                    library: self.library.name().to_owned(),
                    relpath: self.relpath.clone(),
                    stage: stage.name().to_owned(),
                    role: stage.role(),
                });
            }
        }
        Ok(invocations)
    }

    /// Declaration-time file checks.
    ///
    /// An available compiler is trusted to produce the resource file later,
    /// so only its source has to exist. Same for an available minifier and
    /// the minified file.
    fn validate(&self) -> ConfigResult<()> {
        match &self.compiler {
            Some(compiler) if compiler.available() => require(compiler.source_path(self))?,
            _ => require(self.path())?,
        }

        match (&self.minifier, &self.minified) {
            (Some(minifier), _) if minifier.available() => Ok(()),
            (_, Some(variant)) => require(variant.path()),
            _ => Ok(()),
        }
    }
}

fn require(path: PathBuf) -> ConfigResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::UnknownResource(path))
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Eq for Resource {}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depends: Vec<_> = self.depends.iter().map(|d| d.relpath()).collect();
        f.debug_struct("Resource")
            .field("library", &self.library.name())
            .field("relpath", &self.relpath)
            .field("depends", &depends)
            .field("compiler", &self.compiler.as_ref().map(|s| s.name()))
            .field("minifier", &self.minifier.as_ref().map(|s| s.name()))
            .field("minified", &self.minified.as_ref().map(|m| m.relpath()))
            .finish()
    }
}

/// Builder returned by [`Resource::declare`].
#[must_use]
pub struct ResourceBuilder<'a> {
    ctx: &'a Context,
    library: Arc<Library>,
    relpath: String,
    depends: Vec<Arc<Resource>>,
    compiler: Binding,
    minifier: Binding,
    minified: Option<Minified>,
    source: Option<String>,
}

impl ResourceBuilder<'_> {
    pub fn depend(mut self, resource: &Arc<Resource>) -> Self {
        self.depends.push(Arc::clone(resource));
        self
    }

    pub fn depends<I>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = Arc<Resource>>,
    {
        self.depends.extend(resources);
        self
    }

    pub fn compiler(mut self, binding: impl Into<Binding>) -> Self {
        self.compiler = binding.into();
        self
    }

    pub fn minifier(mut self, binding: impl Into<Binding>) -> Self {
        self.minifier = binding.into();
        self
    }

    /// Minified counterpart as a path relative to the library root.
    pub fn minified_path(mut self, relpath: impl Into<String>) -> Self {
        self.minified = Some(Minified::Path(relpath.into()));
        self
    }

    /// Minified counterpart as an existing resource.
    pub fn minified(mut self, resource: &Arc<Resource>) -> Self {
        self.minified = Some(Minified::Resource(Arc::clone(resource)));
        self
    }

    /// Compiler input, relative to the library root.
    pub fn source(mut self, relpath: impl Into<String>) -> Self {
        self.source = Some(relpath.into());
        self
    }

    pub fn build(self) -> ConfigResult<Arc<Resource>> {
        let serial = next_serial();
        let ext = extension(&self.relpath);

        let compiler = self.compiler.resolve(
            self.ctx.compilers(),
            ext.and_then(|e| self.library.default_compiler(e)),
        )?;
        let minifier = self.minifier.resolve(
            self.ctx.minifiers(),
            ext.and_then(|e| self.library.default_minifier(e)),
        )?;

        let depth = self
            .depends
            .iter()
            .map(|d| d.depth + 1)
            .max()
            .unwrap_or(0);

        let variant = |path: String| {
            if path == self.relpath {
                return Err(ConfigError::Validation(format!(
                    "`{}` cannot be its own minified variant",
                    self.relpath
                )));
            }
            Ok(Arc::new(Resource {
                serial: next_serial(),
                library: Arc::clone(&self.library),
                relpath: path,
                depends: self.depends.clone(),
                depth,
                compiler: None,
                minifier: None,
                minified: None,
                source: None,
            }))
        };

        let minified = match self.minified {
            Some(Minified::Resource(resource)) => {
                if let Some(minifier) = &minifier {
                    return Err(ConfigError::Validation(format!(
                        "`{}`: minified variant must be a path when minifier `{}` is bound",
                        self.relpath,
                        minifier.name()
                    )));
                }
                Some(resource)
            }
            Some(Minified::Path(path)) => Some(variant(path)?),
            None => match &minifier {
                Some(minifier) if minifier.target_extension().is_empty() => {
                    return Err(ConfigError::Validation(format!(
                        "`{}`: minifier `{}` has no target extension, give the minified path",
                        self.relpath,
                        minifier.name()
                    )));
                }
                Some(minifier) => Some(variant(replace_extension(
                    &self.relpath,
                    minifier.target_extension(),
                ))?),
                None => None,
            },
        };

        let resource = Resource {
            serial,
            library: self.library,
            relpath: self.relpath,
            depends: self.depends,
            depth,
            compiler,
            minifier,
            minified,
            source: self.source,
        };

        if self.ctx.check_files() {
            resource.validate()?;
        }

        Ok(Arc::new(resource))
    }
}
