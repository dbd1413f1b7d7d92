//! Structural comparison of two snapshots.
//!
//! Every comparison walks one tree (the driver) and looks up the node at the
//! same path in the other one (the counterpart). Nothing is mutated.

use derive_more::Display;

use super::tree::child_path;
use super::{Entry, FilesystemNode, Item, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChangeKind {
    #[display("added")]
    Added,
    #[display("removed")]
    Removed,
    #[display("modified")]
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(Entry),
    Removed(Entry),
    Modified {
        path: String,
        before: Item,
        after: Item,
    },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Added(_) => ChangeKind::Added,
            Change::Removed(_) => ChangeKind::Removed,
            Change::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// Path accumulated from segment names while walking.
    pub fn path(&self) -> &str {
        match self {
            Change::Added(entry) | Change::Removed(entry) => &entry.path,
            Change::Modified { path, .. } => path,
        }
    }

    /// The item a change is reported under; the new one for modifications.
    pub fn item(&self) -> &Item {
        match self {
            Change::Added(entry) | Change::Removed(entry) => &entry.item,
            Change::Modified { after, .. } => after,
        }
    }
}

/// Items present in `after` at paths that have no node in `before`.
pub fn added(before: &Snapshot, after: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();
    paired_walk(after.root(), before.root(), true, |path, node, counterpart| {
        if let (Some(item), None) = (node.item(), counterpart) {
            changes.push(Change::Added(Entry::new(path, item.clone())));
        }
    });
    changes
}

/// Items present in `before` at paths that have no node in `after`.
pub fn removed(before: &Snapshot, after: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();
    paired_walk(before.root(), after.root(), true, |path, node, counterpart| {
        if let (Some(item), None) = (node.item(), counterpart) {
            changes.push(Change::Removed(Entry::new(path, item.clone())));
        }
    });
    changes
}

/// Paths holding an item in both snapshots where name, mtime or size differ.
///
/// Only the children of `after` are walked, so a subtree present solely in
/// `before` is never visited here.
pub fn modified(before: &Snapshot, after: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();
    paired_walk(after.root(), before.root(), false, |path, node, counterpart| {
        let old = counterpart.and_then(FilesystemNode::item);
        if let (Some(new), Some(old)) = (node.item(), old) {
            if new != old {
                changes.push(Change::Modified {
                    path: path.to_string(),
                    before: old.clone(),
                    after: new.clone(),
                });
            }
        }
    });
    changes
}

/// Preorder walk of `driver`, pairing each node with the node at the same
/// path under `counterpart`. With `follow_unmatched` unset the walk does not
/// descend below a driver node that has no counterpart.
fn paired_walk<'a>(
    driver: &'a FilesystemNode,
    counterpart: &'a FilesystemNode,
    follow_unmatched: bool,
    mut visit: impl FnMut(&str, &'a FilesystemNode, Option<&'a FilesystemNode>),
) {
    let mut stack = vec![(String::new(), true, driver, Some(counterpart))];

    while let Some((path, is_root, node, counterpart)) = stack.pop() {
        visit(&path, node, counterpart);

        if counterpart.is_none() && !follow_unmatched {
            continue;
        }

        for (segment, child) in node.children().rev() {
            let matched = counterpart.and_then(|other| other.child(segment));
            stack.push((child_path(&path, is_root, segment), false, child, matched));
        }
    }
}

/// All three change sets between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<Change>,
    pub removed: Vec<Change>,
    pub modified: Vec<Change>,
}

impl SnapshotDiff {
    pub fn between(before: &Snapshot, after: &Snapshot) -> Self {
        Self {
            added: added(before, after),
            removed: removed(before, after),
            modified: modified(before, after),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn changes(&self, kind: ChangeKind) -> &[Change] {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Removed => &self.removed,
            ChangeKind::Modified => &self.modified,
        }
    }
}
