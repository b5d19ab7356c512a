//! Configuration section definitions.

mod library;
mod serve;
mod stage;

pub use library::{BindingConfig, LibraryConfig, ResourceConfig, binding};
pub use serve::ServeConfig;
pub use stage::StageConfig;
