//! In-process minifiers for JS and CSS.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Each backend sits behind
//! a cargo feature; a stage whose backend is compiled out reports itself
//! unavailable.

use super::{Role, Stage};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Js,
    Css,
}

/// Minifier stage calling into a linked library.
#[derive(Debug)]
pub struct MinifyStage {
    name: &'static str,
    backend: Backend,
    source_extension: &'static str,
    target_extension: &'static str,
}

impl MinifyStage {
    pub const fn js(name: &'static str) -> Self {
        Self {
            name,
            backend: Backend::Js,
            source_extension: ".js",
            target_extension: ".min.js",
        }
    }

    pub const fn css(name: &'static str) -> Self {
        Self {
            name,
            backend: Backend::Css,
            source_extension: ".css",
            target_extension: ".min.css",
        }
    }

    pub fn minify(&self, content: &str) -> Option<String> {
        match self.backend {
            Backend::Js => minify_js(content),
            Backend::Css => minify_css(content),
        }
    }
}

impl Stage for MinifyStage {
    fn name(&self) -> &str {
        self.name
    }

    fn role(&self) -> Role {
        Role::Minifier
    }

    fn source_extension(&self) -> &str {
        self.source_extension
    }

    fn target_extension(&self) -> &str {
        self.target_extension
    }

    fn available(&self) -> bool {
        match self.backend {
            Backend::Js => cfg!(feature = "js-minify"),
            Backend::Css => cfg!(feature = "css-minify"),
        }
    }

    fn process(&self, source: &Path, target: &Path) -> Result<()> {
        anyhow::ensure!(self.available(), "`{}` was not compiled in", self.name);

        let content = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let minified = self
            .minify(&content)
            .with_context(|| format!("Failed to parse {}", source.display()))?;
        fs::write(target, minified)
            .with_context(|| format!("Failed to write {}", target.display()))
    }
}

/// Minify JavaScript source code.
#[cfg(feature = "js-minify")]
pub fn minify_js(source: &str) -> Option<String> {
    use oxc::allocator::Allocator;
    use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
    use oxc::mangler::MangleOptions;
    use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
    use oxc::parser::Parser;
    use oxc::span::SourceType;

    let allocator = Allocator::default();
    // Script, not module: assets are included via plain <script> tags
    let source_type = SourceType::cjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

#[cfg(not(feature = "js-minify"))]
pub fn minify_js(_source: &str) -> Option<String> {
    None
}

/// Minify CSS source code.
#[cfg(feature = "css-minify")]
pub fn minify_css(source: &str) -> Option<String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

#[cfg(not(feature = "css-minify"))]
pub fn minify_css(_source: &str) -> Option<String> {
    None
}
