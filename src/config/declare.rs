//! Turn an [`AssetsConfig`] into a live [`Context`] and its resources.
//!
//! Resources are keyed `library:path`. A dependency written without a
//! library prefix refers to the declaring resource's own library.
//! Dependencies are declared before their dependents regardless of file
//! order; a cycle is a configuration error.

use super::AssetsConfig;
use super::section::{LibraryConfig, ResourceConfig, binding};
use super::util::resolve_path;
use crate::context::Context;
use crate::debug;
use crate::error::{ConfigError, ConfigResult};
use crate::library::Library;
use crate::publisher::Publisher;
use crate::resource::Resource;
use crate::stage::Invocation;
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Everything declared by a config file.
#[derive(Debug)]
pub struct Declared {
    context: Context,
    resources: FxHashMap<String, Arc<Resource>>,
    /// Keys in file order.
    order: Vec<String>,
}

impl Declared {
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Look up a resource by `library:path`.
    pub fn resource(&self, reference: &str) -> ConfigResult<Arc<Resource>> {
        self.resources
            .get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownReference {
                reference: reference.to_owned(),
                from: "command line".to_owned(),
            })
    }

    /// All declared resources in file order.
    pub fn resources(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.order.iter().filter_map(|key| self.resources.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn publisher(&self) -> ConfigResult<Publisher> {
        self.context.publisher()
    }

    /// Run the stages of every declared resource, dependencies first.
    ///
    /// Resources are built one at a time; the first failing stage stops the
    /// run. `on_done` is called after each resource.
    pub fn compile(
        &self,
        force: bool,
        mut on_done: impl FnMut(&Resource),
    ) -> Result<Vec<Invocation>> {
        let mut resources: Vec<_> = self.resources().collect();
        resources.sort_by_key(|resource| (resource.depth(), resource.serial()));

        let mut invocations = Vec::new();
        for resource in resources {
            invocations.extend(resource.compile(force)?);
            on_done(resource);
        }
        Ok(invocations)
    }
}

impl AssetsConfig {
    /// Register stages and libraries, then declare every resource.
    pub fn declare(&self) -> ConfigResult<Declared> {
        let mut context = Context::new().with_check_files(self.check_files);
        for stage in &self.stages {
            context.add_stage(Arc::new(stage.to_stage()))?;
        }
        for library in &self.libraries {
            context.add_library(self.library(library))?;
        }

        let mut specs = FxHashMap::default();
        let mut order = Vec::new();
        for library in &self.libraries {
            for resource in &library.resources {
                let key = format!("{}:{}", library.name, resource.path);
                if specs.insert(key.clone(), (library, resource)).is_some() {
                    return Err(ConfigError::Duplicate {
                        registry: "resource",
                        name: key,
                    });
                }
                order.push(key);
            }
        }

        let mut declarer = Declarer {
            context: &context,
            specs,
            built: FxHashMap::default(),
            visiting: FxHashSet::default(),
        };
        for key in &order {
            declarer.declare(key)?;
        }
        let resources = declarer.built;

        debug!("config"; "declared {} resources in {} libraries", resources.len(), self.libraries.len());
        Ok(Declared {
            context,
            resources,
            order,
        })
    }

    fn library(&self, config: &LibraryConfig) -> Library {
        let mut library = Library::new(&config.name, resolve_path(&config.path, &self.root));
        for (ext, stage) in &config.compilers {
            library = library.with_compiler(ext, stage);
        }
        for (ext, stage) in &config.minifiers {
            library = library.with_minifier(ext, stage);
        }
        if let Some(version) = &config.version {
            library = library.with_version(version);
        }
        library
    }
}

struct Declarer<'a> {
    context: &'a Context,
    specs: FxHashMap<String, (&'a LibraryConfig, &'a ResourceConfig)>,
    built: FxHashMap<String, Arc<Resource>>,
    visiting: FxHashSet<String>,
}

impl Declarer<'_> {
    fn declare(&mut self, key: &str) -> ConfigResult<Arc<Resource>> {
        if let Some(resource) = self.built.get(key) {
            return Ok(Arc::clone(resource));
        }
        if !self.visiting.insert(key.to_owned()) {
            return Err(ConfigError::Cycle(key.to_owned()));
        }

        let (library_config, config) = self.specs[key];
        let mut depends = Vec::with_capacity(config.depends.len());
        for reference in &config.depends {
            let dependency = qualify(reference, &library_config.name);
            if !self.specs.contains_key(&dependency) {
                return Err(ConfigError::UnknownReference {
                    reference: reference.clone(),
                    from: key.to_owned(),
                });
            }
            depends.push(self.declare(&dependency)?);
        }

        let library = self.context.library(&library_config.name)?;
        let mut builder = Resource::declare(self.context, &library, &config.path)
            .depends(depends)
            .compiler(binding(config.compiler.as_ref()))
            .minifier(binding(config.minifier.as_ref()));
        if let Some(minified) = &config.minified {
            builder = builder.minified_path(minified);
        }
        if let Some(source) = &config.source {
            builder = builder.source(source);
        }
        let resource = builder.build()?;

        self.visiting.remove(key);
        self.built.insert(key.to_owned(), Arc::clone(&resource));
        Ok(resource)
    }
}

/// `path` → `library:path`; qualified references are kept.
fn qualify(reference: &str, library: &str) -> String {
    if reference.contains(':') {
        reference.to_owned()
    } else {
        format!("{library}:{reference}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::resolver::NeededResources;
    use crate::stage::builtin;
    use crate::testing::touch;
    use tempfile::TempDir;

    fn config(dir: &TempDir, body: &str) -> AssetsConfig {
        let mut config = test_parse_config(body);
        config.root = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_declare_across_libraries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "base/reset.css", "");
        touch(dir.path(), "app/app.css", "");
        touch(dir.path(), "app/page.css", "");
        let config = config(
            &dir,
            r#"
[[library]]
name = "app"
path = "app"

[[library.resource]]
path = "page.css"
depends = ["app.css"]

[[library.resource]]
path = "app.css"
depends = ["base:reset.css"]

[[library]]
name = "base"
path = "base"

[[library.resource]]
path = "reset.css"
"#,
        );

        let declared = config.declare().unwrap();
        assert_eq!(declared.len(), 3);
        let keys: Vec<_> = declared
            .resources()
            .map(|r| format!("{}:{}", r.library().name(), r.relpath()))
            .collect();
        assert_eq!(keys, ["app:page.css", "app:app.css", "base:reset.css"]);

        let page = declared.resource("app:page.css").unwrap();
        assert_eq!(page.depth(), 2);
        let mut needed = NeededResources::new();
        needed.need(&page);
        let relpaths: Vec<_> = needed
            .resources()
            .iter()
            .map(|r| r.relpath().to_owned())
            .collect();
        assert_eq!(relpaths, ["reset.css", "app.css", "page.css"]);

        // dependencies share identity with the declared resource
        let app = declared.resource("app:app.css").unwrap();
        assert!(Arc::ptr_eq(&page.depends()[0], &app));
    }

    #[test]
    fn test_unknown_reference() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/a.js", "");
        let config = config(
            &dir,
            "[[library]]\nname = \"app\"\npath = \"app\"\n[[library.resource]]\npath = \"a.js\"\ndepends = [\"b.js\"]",
        );

        let err = config.declare().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownReference { ref reference, .. } if reference == "b.js"));
    }

    #[test]
    fn test_cycle_detected() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            r#"
check_files = false

[[library]]
name = "app"
path = "app"

[[library.resource]]
path = "a.js"
depends = ["b.js"]

[[library.resource]]
path = "b.js"
depends = ["app:a.js"]
"#,
        );

        assert!(matches!(config.declare(), Err(ConfigError::Cycle(_))));
    }

    #[test]
    fn test_duplicate_resource() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            "check_files = false\n[[library]]\nname = \"app\"\npath = \"app\"\n[[library.resource]]\npath = \"a.js\"\n[[library.resource]]\npath = \"a.js\"",
        );
        assert!(matches!(
            config.declare(),
            Err(ConfigError::Duplicate { registry: "resource", .. })
        ));
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            "[[library]]\nname = \"app\"\npath = \"app\"\n[[library.resource]]\npath = \"a.js\"",
        );
        assert!(matches!(
            config.declare(),
            Err(ConfigError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_custom_stage_and_library_defaults() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/a.ts", "");
        touch(dir.path(), "app/b.js", "");
        let config = config(
            &dir,
            r#"
[[stage]]
name = "tsc"
role = "compiler"
command = "cat"
source_extension = ".ts"

[[stage]]
name = "sass"
role = "compiler"
command = "cat"
source_extension = ".sass"

[[library]]
name = "app"
path = "app"
compilers = { ".js" = "tsc" }

[[library.resource]]
path = "a.js"
minifier = false

[[library.resource]]
path = "b.js"
compiler = false
"#,
        );

        let declared = config.declare().unwrap();
        let ctx = declared.context();
        assert!(ctx.compilers().contains("tsc"));
        // configured stage shadows the built-in
        let sass = ctx.compilers().get(builtin::SASS).unwrap();
        assert_eq!(sass.source_extension(), ".sass");

        let a = declared.resource("app:a.js").unwrap();
        assert_eq!(a.compiler().unwrap().name(), "tsc");
        let b = declared.resource("app:b.js").unwrap();
        assert!(b.compiler().is_none());
    }

    #[test]
    fn test_version_and_minified_path() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            r#"
check_files = false

[[library]]
name = "app"
path = "app"
version = "2.1"

[[library.resource]]
path = "a.js"
minified = "a-min.js"
"#,
        );

        let declared = config.declare().unwrap();
        let a = declared.resource("app:a.js").unwrap();
        assert_eq!(a.minified().unwrap().relpath(), "a-min.js");
        assert_eq!(a.url("/vitrine", true), "/vitrine/app/:hash:2.1/a.js");
        assert!(declared.publisher().is_ok());
        assert!(declared.resource("a.js").is_err());
    }

    const COPY_STAGES: &str = r#"
[[stage]]
name = "copy"
role = "compiler"
command = "cp"
args = ["$SOURCE", "$TARGET"]
source_extension = ".in"

[[stage]]
name = "fail"
role = "compiler"
command = "false"
source_extension = ".in"
"#;

    #[test]
    fn test_compile_dependencies_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/page.in", "page");
        touch(dir.path(), "app/base.in", "base");
        let config = config(
            &dir,
            &format!(
                "{COPY_STAGES}
[[library]]
name = \"app\"
path = \"app\"
compilers = {{ \".js\" = \"copy\" }}

[[library.resource]]
path = \"page.js\"
depends = [\"base.js\"]

[[library.resource]]
path = \"base.js\"
"
            ),
        );

        let declared = config.declare().unwrap();
        let mut done = Vec::new();
        let invocations = declared
            .compile(false, |resource| done.push(resource.relpath().to_owned()))
            .unwrap();

        assert_eq!(done, ["base.js", "page.js"]);
        let relpaths: Vec<_> = invocations.iter().map(|i| i.relpath.as_str()).collect();
        assert_eq!(relpaths, ["base.js", "page.js"]);
        assert_eq!(std::fs::read_to_string(dir.path().join("app/page.js")).unwrap(), "page");
    }

    #[test]
    fn test_compile_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/page.in", "page");
        touch(dir.path(), "app/base.in", "base");
        let config = config(
            &dir,
            &format!(
                "{COPY_STAGES}
[[library]]
name = \"app\"
path = \"app\"

[[library.resource]]
path = \"page.js\"
depends = [\"base.js\"]
compiler = \"copy\"

[[library.resource]]
path = \"base.js\"
compiler = \"fail\"
"
            ),
        );

        let declared = config.declare().unwrap();
        let mut done = Vec::new();
        let err = declared
            .compile(false, |resource| done.push(resource.relpath().to_owned()))
            .unwrap_err();

        assert!(format!("{err:#}").contains("compiler `fail` failed"));
        assert!(done.is_empty());
        // the dependent never ran
        assert!(!dir.path().join("app/page.js").exists());
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("a.js", "app"), "app:a.js");
        assert_eq!(qualify("lib:a.js", "app"), "lib:a.js");
    }
}
