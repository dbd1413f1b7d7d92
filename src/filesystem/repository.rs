use snafu::prelude::*;
use tracing::{debug, info};

use super::diff::{self, Change, SnapshotDiff};
use super::{Entry, InvalidPathError, Item, PathKey, Snapshot, SnapshotId};

/// Holds the `before` and `after` snapshots and mediates every operation on
/// them. Diffs always compare `before` against `after`.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    before: Snapshot,
    after: Snapshot,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, id: SnapshotId) -> &Snapshot {
        match id {
            SnapshotId::Before => &self.before,
            SnapshotId::After => &self.after,
        }
    }

    fn snapshot_mut(&mut self, id: SnapshotId) -> &mut Snapshot {
        match id {
            SnapshotId::Before => &mut self.before,
            SnapshotId::After => &mut self.after,
        }
    }

    /// Inserts every entry into the snapshot. All paths are validated first,
    /// so a single invalid path leaves the snapshot unchanged. When a path
    /// repeats, the last occurrence wins.
    pub fn load<P, I>(&mut self, id: SnapshotId, entries: I) -> Result<(), RepositoryError>
    where
        P: AsRef<str>,
        I: IntoIterator<Item = (P, Item)>,
    {
        let parsed = entries
            .into_iter()
            .map(|(path, item)| parse_path(path.as_ref()).map(|path| (path, item)))
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let count = parsed.len();
        let snapshot = self.snapshot_mut(id);
        for (path, item) in parsed {
            snapshot.insert(&path, item);
        }
        info!(
            "Loaded {count} entries into snapshot '{id}', which now holds {} items",
            snapshot.len()
        );
        Ok(())
    }

    /// Stores an item, replacing whatever item was at the same path.
    pub fn add(&mut self, id: SnapshotId, path: &str, item: Item) -> Result<(), RepositoryError> {
        let path = parse_path(path)?;
        if let Some(previous) = self.snapshot_mut(id).insert(&path, item) {
            debug!("Replaced {previous} at '{path}' in snapshot '{id}'");
        }
        Ok(())
    }

    /// Removes the subtree at `path`. Returns false when the path was absent.
    pub fn delete(&mut self, id: SnapshotId, path: &str) -> Result<bool, RepositoryError> {
        let path = parse_path(path)?;
        let deleted = self.snapshot_mut(id).delete(&path);
        if !deleted {
            debug!("Nothing to delete at '{path}' in snapshot '{id}'");
        }
        Ok(deleted)
    }

    pub fn exists(&self, id: SnapshotId, path: &str) -> Result<bool, RepositoryError> {
        Ok(self.snapshot(id).contains(&parse_path(path)?))
    }

    pub fn size_under(&self, id: SnapshotId, path: &str) -> Result<u64, RepositoryError> {
        Ok(self.snapshot(id).size_under(&parse_path(path)?))
    }

    pub fn list_all(&self, id: SnapshotId) -> Vec<Entry> {
        self.snapshot(id).entries()
    }

    pub fn diff_added(&self) -> Vec<Change> {
        diff::added(&self.before, &self.after)
    }

    pub fn diff_removed(&self) -> Vec<Change> {
        diff::removed(&self.before, &self.after)
    }

    pub fn diff_modified(&self) -> Vec<Change> {
        diff::modified(&self.before, &self.after)
    }

    pub fn diff(&self) -> SnapshotDiff {
        SnapshotDiff::between(&self.before, &self.after)
    }
}

fn parse_path(path: &str) -> Result<PathKey, RepositoryError> {
    PathKey::parse(path).context(InvalidPathSnafu)
}

#[derive(Debug, Snafu)]
pub enum RepositoryError {
    #[snafu(display("Invalid path"))]
    InvalidPath { source: InvalidPathError },
}
