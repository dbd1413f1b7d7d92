use std::io::{self, BufRead, Write};

use clap::error::ErrorKind;
use tracing::{debug, info};

use crate::filesystem::{ChangeKind, Item, Repository};
use crate::shell::command::{ShellCommand, join_item_path};
use crate::shell::render::Renderer;

const PROMPT: &str = "> ";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive front end over a [`Repository`].
///
/// Malformed input is reported and skipped; it never touches the snapshots.
pub struct Shell {
    repository: Repository,
    renderer: Renderer,
}

impl Shell {
    pub fn new(repository: Repository, renderer: Renderer) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    /// Reads commands until `exit` or end of input.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        info!("Starting interactive shell");
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            if self.execute_line(&line?, out)? == Flow::Exit {
                return Ok(());
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        debug!("Input closed, leaving shell");
        writeln!(out)
    }

    /// Parses and runs a single line. Blank lines are ignored.
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match ShellCommand::parse_line(line) {
            Ok(command) => self.execute(command, out),
            Err(err) => {
                if err.kind() != ErrorKind::DisplayHelp {
                    debug!("Rejected input '{line}': {:?}", err.kind());
                }
                write!(out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: ShellCommand, out: &mut impl Write) -> io::Result<Flow> {
        debug!("Executing {command:?}");
        let renderer = self.renderer;
        let repository = &mut self.repository;

        match command {
            ShellCommand::List { snapshot } => {
                renderer.entries(out, snapshot, &repository.list_all(snapshot))?
            }
            ShellCommand::Tree { snapshot } => {
                renderer.tree(out, snapshot, repository.snapshot(snapshot))?
            }
            ShellCommand::Added => {
                renderer.changes(out, ChangeKind::Added, &repository.diff_added())?
            }
            ShellCommand::Removed => {
                renderer.changes(out, ChangeKind::Removed, &repository.diff_removed())?
            }
            ShellCommand::Modified => {
                renderer.changes(out, ChangeKind::Modified, &repository.diff_modified())?
            }
            ShellCommand::Diff => renderer.diff(out, &repository.diff())?,
            ShellCommand::Exists { snapshot, path } => match repository.exists(snapshot, &path) {
                Ok(present) => renderer.exists(out, snapshot, &path, present)?,
                Err(err) => renderer.error(out, &report(&err))?,
            },
            ShellCommand::Size { snapshot, path } => match repository.size_under(snapshot, &path) {
                Ok(size) => renderer.size(out, snapshot, &path, size)?,
                Err(err) => renderer.error(out, &report(&err))?,
            },
            ShellCommand::Add {
                snapshot,
                dir,
                name,
                size,
                mtime,
            } => {
                let path = join_item_path(&dir, &name);
                match repository.add(snapshot, &path, Item::new(name, mtime, size)) {
                    Ok(()) => renderer.added_item(out, snapshot, &path)?,
                    Err(err) => renderer.error(out, &report(&err))?,
                }
            }
            ShellCommand::Delete { snapshot, path } => match repository.delete(snapshot, &path) {
                Ok(deleted) => renderer.deleted(out, snapshot, &path, deleted)?,
                Err(err) => renderer.error(out, &report(&err))?,
            },
            ShellCommand::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }
}

/// The error message followed by the chain of its sources.
fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
