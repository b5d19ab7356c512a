//! `[[stage]]` custom build stages.
//!
//! # Example
//!
//! ```toml
//! [[stage]]
//! name = "tsc"
//! role = "compiler"
//! command = "tsc"
//! args = ["--outFile", "$TARGET", "$SOURCE"]
//! source_extension = ".ts"
//! ```
//!
//! Without `$TARGET` in `args`, the command's stdout becomes the target file.

use crate::stage::{CommandStage, Role, SOURCE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Registry name; shadows a built-in stage of the same name.
    pub name: String,

    pub role: Role,

    /// Program to run, looked up on `PATH`.
    pub command: String,

    /// Argument template with `$SOURCE` / `$TARGET` placeholders.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub source_extension: String,

    #[serde(default)]
    pub target_extension: String,
}

fn default_args() -> Vec<String> {
    vec![SOURCE.to_owned()]
}

impl StageConfig {
    pub fn to_stage(&self) -> CommandStage {
        CommandStage::new(&self.name, self.role, &self.command)
            .with_args(self.args.iter().cloned())
            .with_source_extension(&self.source_extension)
            .with_target_extension(&self.target_extension)
    }
}
