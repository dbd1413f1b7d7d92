use derive_more::Display;

/// Payload stored at the terminus of a path.
///
/// Two items are equal only when name, modification time and size all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name} (mtime {mtime}, {size} bytes)")]
pub struct Item {
    pub name: String,
    pub mtime: i64,
    pub size: u64,
}

impl Item {
    pub fn new(name: impl Into<String>, mtime: i64, size: u64) -> Self {
        Self {
            name: name.into(),
            mtime,
            size,
        }
    }

    /// Whether the stored name equals the final segment of `path`.
    pub fn matches_final_segment(&self, path: &str) -> bool {
        path.rsplit('/').next() == Some(self.name.as_str())
    }
}

/// An item together with the path of the node holding it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{path}: {item}")]
pub struct Entry {
    pub path: String,
    pub item: Item,
}

impl Entry {
    pub fn new(path: impl Into<String>, item: Item) -> Self {
        Self {
            path: path.into(),
            item,
        }
    }
}
