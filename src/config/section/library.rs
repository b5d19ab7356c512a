//! `[[library]]` asset roots and their resources.
//!
//! # Example
//!
//! ```toml
//! [[library]]
//! name = "app"
//! path = "static"                   # relative to the config file
//! version = "1.0"                   # pins the URL signature
//! compilers = { ".js" = "coffee" }  # defaults per resource extension
//! minifiers = { ".js" = "jsmin" }
//!
//! [[library.resource]]
//! path = "app.js"
//! depends = ["vendor.js", "other:base.js"]
//! compiler = false                  # string = stage, false = disabled
//! minified = "app.min.js"
//! ```

use crate::resource::Binding;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub name: String,

    /// Library root; `~` is expanded, relative paths start at the config
    /// file's directory.
    pub path: PathBuf,

    #[serde(default)]
    pub version: Option<String>,

    /// Dotted extension → default compiler.
    #[serde(default)]
    pub compilers: BTreeMap<String, String>,

    /// Dotted extension → default minifier.
    #[serde(default)]
    pub minifiers: BTreeMap<String, String>,

    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Path relative to the library root.
    pub path: String,

    /// `path` in the same library or `library:path` elsewhere.
    #[serde(default)]
    pub depends: Vec<String>,

    #[serde(default)]
    pub compiler: Option<BindingConfig>,

    #[serde(default)]
    pub minifier: Option<BindingConfig>,

    /// Explicit minified variant, relative to the library root.
    #[serde(default)]
    pub minified: Option<String>,

    /// Compiler input override, relative to the library root.
    #[serde(default)]
    pub source: Option<String>,
}

/// `compiler = "name"` or `compiler = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingConfig {
    Flag(bool),
    Stage(String),
}

/// Absent or `true` inherits from the library.
pub fn binding(config: Option<&BindingConfig>) -> Binding {
    match config {
        None | Some(BindingConfig::Flag(true)) => Binding::Inherit,
        Some(BindingConfig::Flag(false)) => Binding::Disabled,
        Some(BindingConfig::Stage(name)) => Binding::stage(name.as_str()),
    }
}
