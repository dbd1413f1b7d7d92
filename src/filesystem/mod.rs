//! In-memory filesystem namespaces and their comparison.
//!
//! A namespace is a trie keyed by path segments. Two independent snapshots of
//! it live in a [`Repository`], which also computes what was added, removed
//! or modified between them.

pub mod diff;
mod item;
mod path_key;
mod repository;
mod snapshot;
mod tree;

pub use diff::{Change, ChangeKind, SnapshotDiff};
pub use item::{Entry, Item};
pub use path_key::{InvalidPathError, PathKey};
pub use repository::{Repository, RepositoryError};
pub use snapshot::{Snapshot, SnapshotId};
pub use tree::{FilesystemNode, FilesystemTrie};
