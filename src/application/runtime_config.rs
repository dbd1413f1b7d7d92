use std::path::PathBuf;

use crate::application::data::ColorMode;
use crate::cli::Cli;

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub manifest: Option<PathBuf>,
    pub color: ColorMode,
    /// Single shell command to run instead of the interactive loop.
    pub command: Option<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            manifest: cli.manifest,
            color: cli.color,
            command: (!cli.command.is_empty()).then(|| cli.command.join(" ")),
        }
    }
}
