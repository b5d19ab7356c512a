//! Vitrine - declare, order, build and serve versioned static assets.
//!
//! Libraries are directories of assets published under a common URL
//! prefix. Resources are files in a library, with dependencies and the
//! compiler/minifier stages that produce them. A [`NeededResources`]
//! collects what a page needs and orders it so dependencies come first;
//! a [`Publisher`] serves library files with far-future caching for
//! versioned URLs, and a [`Delegator`] mounts it in front of another
//! [`Handler`].

pub mod config;
pub mod context;
pub mod delegator;
pub mod error;
pub mod freshness;
pub mod http;
pub mod library;
pub mod logger;
pub mod publisher;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod server;
pub mod stage;
pub mod utils;

#[cfg(test)]
mod testing;

pub use context::Context;
pub use delegator::Delegator;
pub use error::{ConfigError, ConfigResult};
pub use http::{Handler, HttpRequest, HttpResponse, Method};
pub use library::Library;
pub use publisher::Publisher;
pub use registry::{Named, Registry};
pub use resolver::{NeededResources, Rendered};
pub use resource::{Binding, Resource};
pub use stage::{CommandStage, Invocation, MinifyStage, Role, Stage};
