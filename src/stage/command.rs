//! Stages backed by an external program.

use super::{Role, Stage};
use crate::utils::exec::Cmd;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Output;
use std::sync::OnceLock;

/// Placeholder replaced by the source path in argument templates.
pub const SOURCE: &str = "$SOURCE";
/// Placeholder replaced by the target path in argument templates.
pub const TARGET: &str = "$TARGET";

/// Runs `command` with an argument template.
///
/// When the template never mentions [`TARGET`], the program is expected to
/// print its result and captured stdout is written to the target file.
#[derive(Debug)]
pub struct CommandStage {
    name: String,
    role: Role,
    command: String,
    arguments: Vec<String>,
    source_extension: String,
    target_extension: String,
    available: OnceLock<bool>,
}

impl CommandStage {
    pub fn new(name: impl Into<String>, role: Role, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role,
            command: command.into(),
            arguments: Vec::new(),
            source_extension: String::new(),
            target_extension: String::new(),
            available: OnceLock::new(),
        }
    }

    pub fn compiler(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(name, Role::Compiler, command)
    }

    pub fn minifier(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(name, Role::Minifier, command)
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = ext.into();
        self
    }

    pub fn with_target_extension(mut self, ext: impl Into<String>) -> Self {
        self.target_extension = ext.into();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Argument template with placeholders substituted.
    pub fn arguments(&self, source: &Path, target: &Path) -> Vec<OsString> {
        let source = source.to_string_lossy();
        let target = target.to_string_lossy();
        self.arguments
            .iter()
            .map(|arg| {
                arg.replace(SOURCE, &source)
                    .replace(TARGET, &target)
                    .into()
            })
            .collect()
    }

    /// Run the command and return its captured output.
    pub fn run(&self, source: &Path, target: &Path) -> Result<Output> {
        Cmd::new(&self.command)
            .args(self.arguments(source, target))
            .run()
    }

    fn prints_result(&self) -> bool {
        !self.arguments.iter().any(|arg| arg.contains(TARGET))
    }
}

impl Stage for CommandStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn source_extension(&self) -> &str {
        &self.source_extension
    }

    fn target_extension(&self) -> &str {
        &self.target_extension
    }

    /// `which` lookup; absolute paths are checked directly.
    fn available(&self) -> bool {
        *self
            .available
            .get_or_init(|| which::which(&self.command).is_ok())
    }

    fn process(&self, source: &Path, target: &Path) -> Result<()> {
        let output = self.run(source, target)?;
        if self.prints_result() {
            fs::write(target, &output.stdout)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }
        Ok(())
    }
}
