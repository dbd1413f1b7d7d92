use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorMode, LogLevel};

/// Compare two snapshots of a filesystem namespace.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML file seeding the before and after snapshots
    #[clap(long, short)]
    pub manifest: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    #[clap(long, default_value = "auto", value_enum)]
    pub color: ColorMode,

    /// Run one shell command and exit, e.g. `diff` or `size after /folder1`
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}
