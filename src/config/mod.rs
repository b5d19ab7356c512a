//! Asset configuration from `vitrine.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── library    # [[library]] and [[library.resource]]
//! │   ├── serve      # [serve]
//! │   └── stage      # [[stage]]
//! ├── declare        # config → Context + resources
//! └── mod.rs         # AssetsConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section                | Purpose                                     |
//! |------------------------|---------------------------------------------|
//! | `check_files`          | File-existence validation at declaration    |
//! | `[serve]`              | Asset server (interface, port, prefix)      |
//! | `[[stage]]`            | Custom command compilers and minifiers      |
//! | `[[library]]`          | Asset roots with default stages             |
//! | `[[library.resource]]` | Resources, dependencies, stage bindings     |

mod declare;
pub mod section;
mod util;

pub use declare::Declared;
pub use section::{BindingConfig, LibraryConfig, ResourceConfig, ServeConfig, StageConfig};

use crate::error::ConfigError;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};
use util::{find_config_file, resolve_path};

/// Default config file name.
pub const CONFIG_FILE: &str = "vitrine.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing vitrine.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file; library paths are relative to it
    #[serde(skip)]
    pub root: PathBuf,

    /// Check that resource files exist when declaring them
    #[serde(default = "default_check_files")]
    pub check_files: bool,

    /// Asset server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Custom build stages
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,

    /// Libraries and their resources
    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryConfig>,
}

const fn default_check_files() -> bool {
    true
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            check_files: default_check_files(),
            serve: ServeConfig::default(),
            stages: Vec::new(),
            libraries: Vec::new(),
        }
    }
}

impl AssetsConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// Library paths are resolved against the config file's directory.
    pub fn load(config_name: &Path) -> Result<Self> {
        let Some(config_path) = find_config_file(config_name) else {
            anyhow::bail!(
                "Config file '{}' not found in this directory or any parent",
                config_name.display()
            );
        };

        let mut config = Self::from_path(&config_path)?;
        config.config_path = crate::utils::path::normalize_path(&config_path);
        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.normalize_paths();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve library paths against the config directory.
    fn normalize_paths(&mut self) {
        for library in &mut self.libraries {
            library.path = resolve_path(&library.path, &self.root);
        }
    }

    /// Apply `serve` command line overrides.
    pub fn apply_serve_options(&mut self, interface: Option<IpAddr>, port: Option<u16>) {
        Self::update_option(&mut self.serve.interface, interface.as_ref());
        Self::update_option(&mut self.serve.port, port.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AssetsConfig {
    let (parsed, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        // unclosed bracket
        assert!(AssetsConfig::from_str("[serve\nport = 1").is_err());
    }

    #[test]
    fn test_config_default() {
        let config = AssetsConfig::default();
        assert!(config.check_files);
        assert!(config.stages.is_empty());
        assert!(config.libraries.is_empty());
        assert_eq!(config.serve.port, 5277);
    }

    #[test]
    fn test_check_files_default_on() {
        assert!(test_parse_config("").check_files);
        assert!(!test_parse_config("check_files = false").check_files);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[serve]\nport = 1234\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.serve.port, 1234);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_unknown_resource_field_detected() {
        let content = "[[library]]\nname = \"a\"\npath = \"a\"\n[[library.resource]]\npath = \"x.js\"\ndepend = []";
        let (_, ignored) = AssetsConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.iter().any(|f| f.contains("depend")));
    }

    #[test]
    fn test_load_resolves_library_paths() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            "[[library]]\nname = \"app\"\npath = \"static\"\n",
        )
        .unwrap();

        let config = AssetsConfig::load(&config_path).unwrap();
        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.libraries[0].path, root.join("static"));
    }

    #[test]
    fn test_load_missing_config() {
        assert!(AssetsConfig::load(Path::new("/surely/not/here/vitrine.toml")).is_err());
    }

    #[test]
    fn test_apply_serve_options() {
        let mut config = AssetsConfig::default();
        config.apply_serve_options(None, Some(8000));
        assert_eq!(config.serve.port, 8000);
        assert_eq!(config.serve.interface.to_string(), "127.0.0.1");
    }
}
