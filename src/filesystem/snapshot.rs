use clap::ValueEnum;
use derive_more::Display;

use super::{Entry, FilesystemNode, FilesystemTrie, Item, PathKey};

/// Which of the two snapshots held by a repository is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Display)]
pub enum SnapshotId {
    #[display("before")]
    #[value(alias = "snap1")]
    Before,
    #[display("after")]
    #[value(alias = "snap2")]
    After,
}

impl SnapshotId {
    pub const ALL: [SnapshotId; 2] = [SnapshotId::Before, SnapshotId::After];
}

/// The namespace at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    trie: FilesystemTrie,
}

impl Snapshot {
    pub fn trie(&self) -> &FilesystemTrie {
        &self.trie
    }

    pub fn root(&self) -> &FilesystemNode {
        self.trie.root()
    }

    pub fn insert(&mut self, path: &PathKey, item: Item) -> Option<Item> {
        self.trie.insert(path, item)
    }

    pub fn delete(&mut self, path: &PathKey) -> bool {
        self.trie.delete(path)
    }

    pub fn contains(&self, path: &PathKey) -> bool {
        self.trie.lookup(path).is_some()
    }

    pub fn size_under(&self, path: &PathKey) -> u64 {
        self.trie.aggregate_size(path)
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.trie.entries()
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}
