use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::filesystem::{Change, ChangeKind, Entry, Item, Snapshot, SnapshotDiff, SnapshotId};

/// Turns repository results into lines of text.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn entries(
        &self,
        out: &mut impl Write,
        id: SnapshotId,
        entries: &[Entry],
    ) -> io::Result<()> {
        writeln!(out, "{}", self.heading(&format!("Items in snapshot '{id}':")))?;
        if entries.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for entry in entries {
            writeln!(out, "  {}", describe(&entry.path, &entry.item))?;
        }
        Ok(())
    }

    pub fn changes(
        &self,
        out: &mut impl Write,
        kind: ChangeKind,
        changes: &[Change],
    ) -> io::Result<()> {
        let title = match kind {
            ChangeKind::Added => "New items in 'after':",
            ChangeKind::Removed => "Deleted items in 'after':",
            ChangeKind::Modified => "Modified items:",
        };

        writeln!(out, "{}", self.heading(title))?;
        if changes.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for change in changes {
            let (marker, color) = match change.kind() {
                ChangeKind::Added => ("+", Color::Green),
                ChangeKind::Removed => ("-", Color::Red),
                ChangeKind::Modified => ("~", Color::Yellow),
            };
            let line = match change {
                Change::Modified { path, before, .. } => format!(
                    "{marker} {} [was mtime {}, {} bytes]",
                    describe(path, change.item()),
                    before.mtime,
                    before.size
                ),
                _ => format!("{marker} {}", describe(change.path(), change.item())),
            };
            writeln!(out, "  {}", self.paint(&line, color))?;
        }
        Ok(())
    }

    pub fn diff(&self, out: &mut impl Write, diff: &SnapshotDiff) -> io::Result<()> {
        if diff.is_empty() {
            return writeln!(out, "No differences between 'before' and 'after'");
        }
        writeln!(out, "Changes between 'before' and 'after': {}", diff.len())?;
        for kind in [ChangeKind::Added, ChangeKind::Removed, ChangeKind::Modified] {
            self.changes(out, kind, diff.changes(kind))?;
        }
        Ok(())
    }

    pub fn tree(
        &self,
        out: &mut impl Write,
        id: SnapshotId,
        snapshot: &Snapshot,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.heading(&format!("File system tree of '{id}':")))?;
        for visit in snapshot.trie().nodes() {
            let indent = "  ".repeat(visit.depth);
            let label = if visit.segment.is_empty() {
                "(empty)"
            } else {
                visit.segment
            };
            match visit.node.item() {
                Some(item) => writeln!(out, "{indent}{label}  {item}")?,
                None => writeln!(out, "{indent}{}/", self.paint(label, Color::Blue))?,
            }
        }
        Ok(())
    }

    pub fn exists(
        &self,
        out: &mut impl Write,
        id: SnapshotId,
        path: &str,
        present: bool,
    ) -> io::Result<()> {
        writeln!(out, "Path '{path}' is present in '{id}': {present}")
    }

    pub fn size(
        &self,
        out: &mut impl Write,
        id: SnapshotId,
        path: &str,
        size: u64,
    ) -> io::Result<()> {
        writeln!(out, "Size of items under '{path}' in '{id}': {size} bytes")
    }

    pub fn added_item(&self, out: &mut impl Write, id: SnapshotId, path: &str) -> io::Result<()> {
        writeln!(out, "Stored '{path}' in '{id}'")
    }

    pub fn deleted(
        &self,
        out: &mut impl Write,
        id: SnapshotId,
        path: &str,
        deleted: bool,
    ) -> io::Result<()> {
        if deleted {
            writeln!(out, "Deleted '{path}' from '{id}'")
        } else {
            writeln!(out, "Path '{path}' not found in '{id}'")
        }
    }

    pub fn error(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(&format!("error: {message}"), Color::Red))
    }
}

/// Path, then the stored name when it differs from the final segment.
fn describe(path: &str, item: &Item) -> String {
    if item.matches_final_segment(path) {
        format!("{path} (mtime {}, {} bytes)", item.mtime, item.size)
    } else {
        format!("{path} as {item}")
    }
}
