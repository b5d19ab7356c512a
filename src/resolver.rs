//! Per-request resource resolution.
//!
//! A [`NeededResources`] collects the resources one unit of work (typically
//! one page render) needs, then produces the include list: every transitive
//! dependency, each resource once, dependencies before dependents.
//!
//! ```ignore
//! let mut needed = NeededResources::new().with_compile(true);
//! needed.need(&app);
//! let rendered = needed.render()?;
//! for resource in &rendered.resources {
//!     println!("{}", resource.url("/vitrine", true));
//! }
//! ```

use crate::debug;
use crate::resource::Resource;
use crate::stage::Invocation;
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct NeededResources {
    /// Run build stages on render.
    compile: bool,
    /// Substitute minified variants in the result.
    minified: bool,
    needed: Vec<Arc<Resource>>,
    seen: FxHashSet<usize>,
}

/// Outcome of [`NeededResources::render`].
#[derive(Debug, Default)]
pub struct Rendered {
    pub resources: Vec<Arc<Resource>>,
    pub invocations: Vec<Invocation>,
}

impl NeededResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compile(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    pub fn with_minified(mut self, minified: bool) -> Self {
        self.minified = minified;
        self
    }

    /// Add a resource; needing the same resource twice has no effect.
    pub fn need(&mut self, resource: &Arc<Resource>) {
        if self.seen.insert(resource.serial()) {
            self.needed.push(Arc::clone(resource));
        }
    }

    pub fn has_resources(&self) -> bool {
        !self.needed.is_empty()
    }

    /// Ordered include list, with minified variants substituted in
    /// minified mode.
    pub fn resources(&self) -> Vec<Arc<Resource>> {
        let sorted = self.sorted();
        if !self.minified {
            return sorted;
        }

        let mut seen = FxHashSet::default();
        sorted
            .into_iter()
            .map(|resource| match resource.minified() {
                Some(variant) => Arc::clone(variant),
                None => resource,
            })
            .filter(|resource| seen.insert(resource.serial()))
            .collect()
    }

    /// Run the build stages of every resource the resolution touches.
    ///
    /// Does nothing unless compiling is enabled. Stages are forced, so
    /// each one runs exactly once per touched resource.
    pub fn compile(&self) -> Result<Vec<Invocation>> {
        if !self.compile {
            return Ok(Vec::new());
        }

        let mut touched = self.sorted();
        if self.minified {
            let variants: Vec<_> = touched
                .iter()
                .filter_map(|resource| resource.minified().cloned())
                .collect();
            touched.extend(variants);
        }

        let mut done = FxHashSet::default();
        let mut invocations = Vec::new();
        for resource in touched {
            if done.insert(resource.serial()) {
                invocations.extend(resource.compile(true)?);
            }
        }

        debug!("resolve"; "{} stage runs for {} needed", invocations.len(), self.needed.len());
        Ok(invocations)
    }

    /// Compile (when enabled) and return the include list.
    pub fn render(&self) -> Result<Rendered> {
        let invocations = self.compile()?;
        Ok(Rendered {
            resources: self.resources(),
            invocations,
        })
    }

    /// Transitive closure of the needed resources, ordered by depth, then
    /// by declaration order.
    fn sorted(&self) -> Vec<Arc<Resource>> {
        let mut seen = FxHashSet::default();
        let mut expanded = Vec::new();
        for resource in &self.needed {
            expand(resource, &mut seen, &mut expanded);
        }
        expanded.sort_by_key(|resource| (resource.depth(), resource.serial()));
        expanded
    }
}

fn expand(resource: &Arc<Resource>, seen: &mut FxHashSet<usize>, out: &mut Vec<Arc<Resource>>) {
    if !seen.insert(resource.serial()) {
        return;
    }
    for dependency in resource.depends() {
        expand(dependency, seen, out);
    }
    out.push(Arc::clone(resource));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::library::Library;
    use crate::stage::{CommandStage, Role};
    use crate::testing::MockStage;

    struct Fixture {
        ctx: Context,
        lib: Arc<Library>,
        compiler: Arc<MockStage>,
        minifier: Arc<MockStage>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ctx = Context::bare().with_check_files(false);
            let compiler = Arc::new(MockStage::compiler("mock"));
            let minifier = Arc::new(MockStage::minifier("mock"));
            ctx.compilers_mut().add(compiler.clone()).unwrap();
            ctx.minifiers_mut().add(minifier.clone()).unwrap();
            let lib = ctx.add_library(Library::new("lib", "/nonexistent")).unwrap();
            Self {
                ctx,
                lib,
                compiler,
                minifier,
            }
        }

        fn plain(&self, relpath: &str, depends: &[&Arc<Resource>]) -> Arc<Resource> {
            Resource::declare(&self.ctx, &self.lib, relpath)
                .depends(depends.iter().map(|d| Arc::clone(*d)))
                .build()
                .unwrap()
        }

        fn staged(&self, relpath: &str, depends: &[&Arc<Resource>]) -> Arc<Resource> {
            Resource::declare(&self.ctx, &self.lib, relpath)
                .depends(depends.iter().map(|d| Arc::clone(*d)))
                .compiler("mock")
                .minifier("mock")
                .build()
                .unwrap()
        }
    }

    fn relpaths(resources: &[Arc<Resource>]) -> Vec<&str> {
        resources.iter().map(|r| r.relpath()).collect()
    }

    #[test]
    fn test_empty() {
        let needed = NeededResources::new();
        assert!(!needed.has_resources());
        assert!(needed.resources().is_empty());
        assert!(needed.render().unwrap().invocations.is_empty());
    }

    #[test]
    fn test_dependencies_first() {
        let f = Fixture::new();
        let a = f.plain("a.js", &[]);
        let b = f.plain("b.js", &[&a]);
        let c = f.plain("c.js", &[&b]);

        let mut needed = NeededResources::new();
        needed.need(&c);
        needed.need(&a);
        assert!(needed.has_resources());
        assert_eq!(relpaths(&needed.resources()), ["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_diamond_deduplicated() {
        let f = Fixture::new();
        let base = f.plain("base.js", &[]);
        let x = f.plain("x.js", &[&base]);
        let y = f.plain("y.js", &[&base]);
        let top = f.plain("top.js", &[&x, &y]);

        let mut needed = NeededResources::new();
        needed.need(&top);
        assert_eq!(
            relpaths(&needed.resources()),
            ["base.js", "x.js", "y.js", "top.js"]
        );
    }

    #[test]
    fn test_equal_depth_follows_declaration_order() {
        let f = Fixture::new();
        let base = f.plain("base.js", &[]);
        let x = f.plain("x.js", &[&base]);
        let y = f.plain("y.js", &[&base]);
        let lone = f.plain("lone.js", &[]);

        let mut needed = NeededResources::new();
        needed.need(&y);
        needed.need(&lone);
        needed.need(&x);
        assert_eq!(
            relpaths(&needed.resources()),
            ["base.js", "lone.js", "x.js", "y.js"]
        );
    }

    #[test]
    fn test_order_ignores_need_order() {
        let f = Fixture::new();
        let base = f.plain("base.js", &[]);
        let x = f.plain("x.js", &[&base]);
        let y = f.plain("y.js", &[&base]);

        let mut forward = NeededResources::new();
        forward.need(&x);
        forward.need(&y);
        let mut backward = NeededResources::new();
        backward.need(&y);
        backward.need(&x);

        assert_eq!(relpaths(&backward.resources()), ["base.js", "x.js", "y.js"]);
        assert_eq!(
            relpaths(&forward.resources()),
            relpaths(&backward.resources())
        );
    }

    #[test]
    fn test_need_is_idempotent() {
        let f = Fixture::new();
        let a = f.plain("a.js", &[]);

        let mut needed = NeededResources::new();
        needed.need(&a);
        needed.need(&a);
        assert_eq!(needed.resources().len(), 1);
    }

    #[test]
    fn test_render_without_compile_runs_nothing() {
        let f = Fixture::new();
        let a = f.staged("a.js", &[]);

        let mut needed = NeededResources::new();
        needed.need(&a);
        let rendered = needed.render().unwrap();
        assert!(rendered.invocations.is_empty());
        assert_eq!(relpaths(&rendered.resources), ["a.js"]);
        assert!(f.compiler.calls().is_empty());
        assert!(f.minifier.calls().is_empty());
    }

    #[test]
    fn test_render_compiles_each_resource_once() {
        let f = Fixture::new();
        let a = f.staged("a.js", &[]);
        let b = f.staged("b.js", &[&a]);

        let mut needed = NeededResources::new().with_compile(true);
        needed.need(&b);
        needed.need(&a);
        let rendered = needed.render().unwrap();

        assert_eq!(f.compiler.calls(), ["a.js", "b.js"]);
        assert_eq!(f.minifier.calls(), ["a.js", "b.js"]);
        let roles: Vec<_> = rendered.invocations.iter().map(|i| i.role).collect();
        assert_eq!(
            roles,
            [Role::Compiler, Role::Minifier, Role::Compiler, Role::Minifier]
        );
    }

    #[test]
    fn test_minified_mode_substitutes_variant() {
        let f = Fixture::new();
        let a = f.staged("a.js", &[]);

        let mut needed = NeededResources::new()
            .with_compile(true)
            .with_minified(true);
        needed.need(&a);
        let rendered = needed.render().unwrap();

        assert_eq!(relpaths(&rendered.resources), ["a.min.js"]);
        assert!(!Arc::ptr_eq(&rendered.resources[0], &a));
        assert!(Arc::ptr_eq(&rendered.resources[0], a.minified().unwrap()));
        assert_eq!(f.compiler.calls(), ["a.js"]);
        assert_eq!(f.minifier.calls(), ["a.js"]);
    }

    #[test]
    fn test_minified_without_compile_only_substitutes() {
        let f = Fixture::new();
        let a = f.staged("a.js", &[]);
        let plain = f.plain("plain.js", &[&a]);

        let mut needed = NeededResources::new().with_minified(true);
        needed.need(&plain);
        let rendered = needed.render().unwrap();

        assert_eq!(relpaths(&rendered.resources), ["a.min.js", "plain.js"]);
        assert!(rendered.invocations.is_empty());
        assert!(f.compiler.calls().is_empty());
    }

    #[test]
    fn test_shared_variant_listed_once() {
        let f = Fixture::new();
        let min = f.plain("bundle.min.js", &[]);
        let a = Resource::declare(&f.ctx, &f.lib, "a.js")
            .minified(&min)
            .build()
            .unwrap();
        let b = Resource::declare(&f.ctx, &f.lib, "b.js")
            .minified(&min)
            .build()
            .unwrap();

        let mut needed = NeededResources::new().with_minified(true);
        needed.need(&a);
        needed.need(&b);
        assert_eq!(relpaths(&needed.resources()), ["bundle.min.js"]);
    }

    #[test]
    fn test_stage_failure_aborts_render() {
        let mut ctx = Context::bare().with_check_files(false);
        ctx.add_stage(Arc::new(CommandStage::compiler("fail", "false")))
            .unwrap();
        let lib = ctx.add_library(Library::new("lib", "/nonexistent")).unwrap();
        let a = Resource::declare(&ctx, &lib, "a.js")
            .compiler("fail")
            .build()
            .unwrap();

        let mut needed = NeededResources::new().with_compile(true);
        needed.need(&a);
        let err = needed.render().unwrap_err();
        assert!(format!("{err:#}").contains("compiler `fail` failed"));
    }
}
