//! Shared helpers: dates, MIME types, paths and external commands.

pub mod date;
pub mod exec;
pub mod mime;
pub mod path;
