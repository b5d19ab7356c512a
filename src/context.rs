//! Declaration context.
//!
//! Holds the stage registries, the library registry and the file-existence
//! toggle. Resources are declared against a context and the publisher is
//! built from it; nothing here is global.

use crate::error::ConfigResult;
use crate::library::Library;
use crate::publisher::Publisher;
use crate::registry::Registry;
use crate::stage::{Stage, StageRegistry, builtin};
use std::sync::Arc;

#[derive(Debug)]
pub struct Context {
    compilers: StageRegistry,
    minifiers: StageRegistry,
    libraries: Registry<Library>,
    check_files: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Context with the built-in stages reachable and file checking on.
    pub fn new() -> Self {
        Self {
            compilers: StageRegistry::with_fallback("compiler", builtin::compilers()),
            minifiers: StageRegistry::with_fallback("minifier", builtin::minifiers()),
            libraries: Registry::new("library"),
            check_files: true,
        }
    }

    /// Context without built-in stages.
    pub fn bare() -> Self {
        Self {
            compilers: StageRegistry::new("compiler"),
            minifiers: StageRegistry::new("minifier"),
            ..Self::new()
        }
    }

    /// Toggle file-existence validation at resource declaration.
    pub fn with_check_files(mut self, check: bool) -> Self {
        self.check_files = check;
        self
    }

    pub fn check_files(&self) -> bool {
        self.check_files
    }

    pub fn compilers(&self) -> &StageRegistry {
        &self.compilers
    }

    pub fn compilers_mut(&mut self) -> &mut StageRegistry {
        &mut self.compilers
    }

    pub fn minifiers(&self) -> &StageRegistry {
        &self.minifiers
    }

    pub fn minifiers_mut(&mut self) -> &mut StageRegistry {
        &mut self.minifiers
    }

    /// Register a stage in the registry matching its role.
    pub fn add_stage(&mut self, stage: Arc<dyn Stage>) -> ConfigResult<()> {
        match stage.role() {
            crate::stage::Role::Compiler => self.compilers.add(stage),
            crate::stage::Role::Minifier => self.minifiers.add(stage),
        }
    }

    pub fn libraries(&self) -> &Registry<Library> {
        &self.libraries
    }

    /// Register a library, returning the shared handle resources attach to.
    pub fn add_library(&mut self, library: Library) -> ConfigResult<Arc<Library>> {
        let library = Arc::new(library);
        self.libraries.add(Arc::clone(&library))?;
        Ok(library)
    }

    pub fn library(&self, name: &str) -> ConfigResult<Arc<Library>> {
        self.libraries.get(name)
    }

    /// Publisher over every registered library.
    pub fn publisher(&self) -> ConfigResult<Publisher> {
        Publisher::new(self.libraries.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{CommandStage, builtin};

    #[test]
    fn test_builtins_reachable() {
        let ctx = Context::new();
        assert!(ctx.compilers().contains(builtin::COFFEE));
        assert!(ctx.compilers().contains(builtin::SASS));
        assert!(ctx.minifiers().contains(builtin::JSMIN));
        assert!(!ctx.minifiers().contains(builtin::COFFEE));
        assert!(ctx.check_files());
    }

    #[test]
    fn test_bare_has_no_builtins() {
        let ctx = Context::bare();
        assert!(!ctx.compilers().contains(builtin::COFFEE));
        assert!(ctx.compilers().is_empty());
    }

    #[test]
    fn test_add_stage_by_role() {
        let mut ctx = Context::bare();
        ctx.add_stage(Arc::new(CommandStage::compiler("tsc", "tsc")))
            .unwrap();
        ctx.add_stage(Arc::new(CommandStage::minifier("terser", "terser")))
            .unwrap();
        assert!(ctx.compilers().contains("tsc"));
        assert!(ctx.minifiers().contains("terser"));
        assert!(!ctx.compilers().contains("terser"));
    }

    #[test]
    fn test_configured_stage_shadows_builtin() {
        let mut ctx = Context::new();
        ctx.add_stage(Arc::new(CommandStage::compiler(builtin::SASS, "sassc")))
            .unwrap();
        let sass = ctx.compilers().get(builtin::SASS).unwrap();
        assert_eq!(sass.name(), builtin::SASS);
        assert_eq!(ctx.compilers().len(), 1);
    }

    #[test]
    fn test_duplicate_library_rejected() {
        let mut ctx = Context::new();
        ctx.add_library(Library::new("foo", "/a")).unwrap();
        assert!(ctx.add_library(Library::new("foo", "/b")).is_err());
        assert_eq!(ctx.library("foo").unwrap().root().to_str(), Some("/a"));
        assert!(ctx.library("bar").is_err());
    }
}
