use clap::{Parser, Subcommand};

use crate::filesystem::SnapshotId;

/// One line typed at the prompt.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{all-args}"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Print every item stored in a snapshot
    List { snapshot: SnapshotId },
    /// Print the node hierarchy of a snapshot
    Tree { snapshot: SnapshotId },
    /// Print items that exist only in the after snapshot
    Added,
    /// Print items that exist only in the before snapshot
    Removed,
    /// Print items whose name, mtime or size changed
    Modified,
    /// Print added, removed and modified items
    Diff,
    /// Check whether a path is present in a snapshot
    Exists { snapshot: SnapshotId, path: String },
    /// Sum the sizes of every item under a path
    Size { snapshot: SnapshotId, path: String },
    /// Store an item named NAME inside DIR
    Add {
        snapshot: SnapshotId,
        dir: String,
        name: String,
        size: u64,
        #[arg(allow_negative_numbers = true)]
        mtime: i64,
    },
    /// Remove a path and everything below it
    Delete { snapshot: SnapshotId, path: String },
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

impl ShellCommand {
    /// Parses a whitespace-separated command line.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }
}

/// Joins the directory and the item name the way `add` stores them.
pub fn join_item_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
