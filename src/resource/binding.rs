//! Stage bindings on resources.

use crate::error::ConfigResult;
use crate::stage::{Stage, StageRegistry};
use std::sync::Arc;

/// How a resource selects its compiler or minifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Binding {
    /// Use the library's default for the resource's extension, if any.
    #[default]
    Inherit,
    /// No stage, even when the library has a default.
    Disabled,
    /// The named stage from the matching registry.
    Stage(String),
}

impl Binding {
    pub fn stage(name: impl Into<String>) -> Self {
        Self::Stage(name.into())
    }

    /// Resolve against `registry`, with `inherited` being the library default.
    ///
    /// An unknown stage name is a configuration error, whether it was given
    /// explicitly or came from the library.
    pub(crate) fn resolve(
        &self,
        registry: &StageRegistry,
        inherited: Option<&str>,
    ) -> ConfigResult<Option<Arc<dyn Stage>>> {
        let name = match self {
            Self::Disabled => return Ok(None),
            Self::Inherit => match inherited {
                Some(name) => name,
                None => return Ok(None),
            },
            Self::Stage(name) => name.as_str(),
        };
        registry.get(name).map(Some)
    }
}

impl From<&str> for Binding {
    fn from(name: &str) -> Self {
        Self::Stage(name.to_owned())
    }
}

impl From<Option<&str>> for Binding {
    /// `None` disables the stage.
    fn from(name: Option<&str>) -> Self {
        name.map_or(Self::Disabled, Self::from)
    }
}
