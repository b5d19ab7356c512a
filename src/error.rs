//! Declaration-time error types.
//!
//! Everything here is fatal at startup: a `ConfigError` means the asset
//! declarations do not describe a servable set of files.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    /// A required file is missing at declaration time.
    #[error("resource file does not exist: `{}`", .0.display())]
    UnknownResource(PathBuf),

    #[error("no {registry} registered with name `{name}`")]
    UnknownName { registry: &'static str, name: String },

    #[error("{registry} `{name}` is already registered")]
    Duplicate { registry: &'static str, name: String },

    #[error("unknown resource `{reference}` referenced from `{from}`")]
    UnknownReference { reference: String, from: String },

    #[error("dependency cycle through `{0}`")]
    Cycle(String),

    #[error("Config validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_resource_names_path() {
        let err = ConfigError::UnknownResource(PathBuf::from("/srv/lib/a.source"));
        assert!(err.to_string().contains("a.source"));
    }

    #[test]
    fn test_unknown_name_display() {
        let err = ConfigError::UnknownName {
            registry: "compiler",
            name: "coffee".into(),
        };
        assert_eq!(err.to_string(), "no compiler registered with name `coffee`");
    }
}
