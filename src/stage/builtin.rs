//! Stages shipped with the crate.
//!
//! The built-in registries are process-wide and immutable; contexts use them
//! as the fallback of their own (mutable) registries.

use super::{CommandStage, MinifyStage, SOURCE, StageRegistry, TARGET};
use std::sync::{Arc, LazyLock};

pub const COFFEE: &str = "coffee";
pub const LESS: &str = "less";
pub const SASS: &str = "sass";
pub const JSMIN: &str = "jsmin";
pub const CSSMIN: &str = "cssmin";

static COMPILERS: LazyLock<Arc<StageRegistry>> = LazyLock::new(|| {
    let mut registry = StageRegistry::new("compiler");
    let stages = [
        CommandStage::compiler(COFFEE, "coffee")
            .with_args(["--compile", "--print", SOURCE])
            .with_source_extension(".coffee"),
        CommandStage::compiler(LESS, "lessc")
            .with_args([SOURCE, TARGET])
            .with_source_extension(".less"),
        CommandStage::compiler(SASS, "sass")
            .with_args([SOURCE, TARGET])
            .with_source_extension(".scss"),
    ];
    for stage in stages {
        // names above are distinct
        let _ = registry.add(Arc::new(stage));
    }
    Arc::new(registry)
});

static MINIFIERS: LazyLock<Arc<StageRegistry>> = LazyLock::new(|| {
    let mut registry = StageRegistry::new("minifier");
    let _ = registry.add(Arc::new(MinifyStage::js(JSMIN)));
    let _ = registry.add(Arc::new(MinifyStage::css(CSSMIN)));
    Arc::new(registry)
});

/// Built-in compilers: `coffee`, `less`, `sass`.
pub fn compilers() -> Arc<StageRegistry> {
    Arc::clone(&COMPILERS)
}

/// Built-in minifiers: `jsmin`, `cssmin`.
pub fn minifiers() -> Arc<StageRegistry> {
    Arc::clone(&MINIFIERS)
}
