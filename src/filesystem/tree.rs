use std::collections::BTreeMap;

use super::{Entry, Item, PathKey};

/// A vertex of the namespace trie.
///
/// A node may carry an item and children at the same time, so one path can
/// act both as a file and as a directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilesystemNode {
    children: BTreeMap<String, FilesystemNode>,
    item: Option<Item>,
}

impl FilesystemNode {
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn child(&self, segment: &str) -> Option<&FilesystemNode> {
        self.children.get(segment)
    }

    /// Children in lexicographic order of their segment names.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (&str, &FilesystemNode)> {
        self.children
            .iter()
            .map(|(segment, child)| (segment.as_str(), child))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Sum of item sizes over this node and all of its descendants.
    ///
    /// Saturates at `u64::MAX` instead of wrapping.
    pub fn subtree_size(&self) -> u64 {
        let mut total: u64 = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            total = total.saturating_add(node.item.as_ref().map_or(0, |item| item.size));
            pending.extend(node.children.values());
        }
        total
    }
}

// Dropping a deep chain through the derived glue would recurse once per level.
impl Drop for FilesystemNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children)
            .into_values()
            .collect::<Vec<_>>();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// Segment-indexed tree owning every node of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilesystemTrie {
    root: FilesystemNode,
}

impl FilesystemTrie {
    pub fn root(&self) -> &FilesystemNode {
        &self.root
    }

    /// Stores `item` at `path`, creating intermediate nodes on the way.
    ///
    /// Returns the item previously stored at exactly this path, if any.
    pub fn insert(&mut self, path: &PathKey, item: Item) -> Option<Item> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current.children.entry(segment.clone()).or_default();
        }
        current.item.replace(item)
    }

    pub fn lookup(&self, path: &PathKey) -> Option<&FilesystemNode> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    /// Detaches the subtree named by `path` and prunes every ancestor left
    /// without an item or children. Returns false when nothing was there.
    pub fn delete(&mut self, path: &PathKey) -> bool {
        let segments = path.segments();

        // owners[i] is the node holding the edge named segments[i]
        let mut owners = Vec::with_capacity(segments.len());
        let mut current = &self.root;
        for segment in segments {
            owners.push(current);
            match current.children.get(segment) {
                Some(child) => current = child,
                None => return false,
            }
        }

        // Walk the cut point upward while the owner would be left vacant.
        // The root (cut == 0) is never removed.
        let mut cut = segments.len() - 1;
        while cut > 0 {
            let owner = owners[cut];
            if owner.item().is_some() || owner.child_count() > 1 {
                break;
            }
            cut -= 1;
        }

        segments[..cut]
            .iter()
            .try_fold(&mut self.root, |node, segment| node.children.get_mut(segment))
            .and_then(|owner| owner.children.remove(&segments[cut]))
            .is_some()
    }

    /// Zero for paths without a node.
    pub fn aggregate_size(&self, path: &PathKey) -> u64 {
        self.lookup(path).map_or(0, FilesystemNode::subtree_size)
    }

    /// Preorder walk over every node below the root.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(&self.root)
    }

    /// Every stored item, in preorder.
    pub fn entries(&self) -> Vec<Entry> {
        self.nodes()
            .filter_map(|visit| {
                visit
                    .node
                    .item()
                    .map(|item| Entry::new(visit.path, item.clone()))
            })
            .collect()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.nodes().filter(|visit| visit.node.item.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

/// Joins a child segment onto the path of its parent.
///
/// Children of the root take their segment verbatim, so the empty leading
/// segment of `/a` turns into the leading slash again.
pub(crate) fn child_path(parent_path: &str, parent_is_root: bool, segment: &str) -> String {
    if parent_is_root {
        segment.to_string()
    } else {
        format!("{parent_path}/{segment}")
    }
}

#[derive(Debug, Clone)]
pub struct NodeVisit<'a> {
    pub path: String,
    /// One for children of the root.
    pub depth: usize,
    pub segment: &'a str,
    pub node: &'a FilesystemNode,
}

pub struct Nodes<'a> {
    stack: Vec<NodeVisit<'a>>,
}

impl<'a> Nodes<'a> {
    fn new(root: &'a FilesystemNode) -> Self {
        let mut nodes = Self { stack: Vec::new() };
        nodes.push_children("", 0, root);
        nodes
    }

    fn push_children(&mut self, path: &str, depth: usize, node: &'a FilesystemNode) {
        // reversed so the smallest segment is popped first
        for (segment, child) in node.children().rev() {
            self.stack.push(NodeVisit {
                path: child_path(path, depth == 0, segment),
                depth: depth + 1,
                segment,
                node: child,
            });
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        self.push_children(&visit.path, visit.depth, visit.node);
        Some(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn key(path: &str) -> PathKey {
        PathKey::parse(path).unwrap()
    }

    fn trie_with(entries: &[(&str, u64)]) -> FilesystemTrie {
        let mut trie = FilesystemTrie::default();
        for (path, size) in entries {
            let path = key(path);
            let name = path.segments().last().cloned().unwrap_or_default();
            trie.insert(&path, Item::new(name, 0, *size));
        }
        trie
    }

    #[test]
    fn insert_then_lookup_returns_the_item() {
        let mut trie = FilesystemTrie::default();
        let item = Item::new("file1.txt", 1628112367, 1024);
        trie.insert(&key("/folder1/file1.txt"), item.clone());

        let node = trie.lookup(&key("/folder1/file1.txt")).unwrap();
        assert_eq!(node.item(), Some(&item));
    }

    #[test]
    fn insert_creates_intermediate_nodes_without_items() {
        let trie = trie_with(&[("/a/b/c", 1)]);
        let intermediate = trie.lookup(&key("/a/b")).unwrap();
        assert!(intermediate.item().is_none());
        assert_eq!(intermediate.child_count(), 1);
        assert!(trie.lookup(&key("/a/b/c")).unwrap().child("d").is_none());
    }

    #[test]
    fn insert_overwrites_and_returns_previous_item() {
        let mut trie = FilesystemTrie::default();
        let first = Item::new("f", 1, 1);
        let second = Item::new("f", 2, 2);

        assert_eq!(trie.insert(&key("/f"), first.clone()), None);
        assert_eq!(trie.insert(&key("/f"), second.clone()), Some(first));
        assert_eq!(trie.lookup(&key("/f")).unwrap().item(), Some(&second));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn lookup_of_missing_path_is_absent() {
        let trie = trie_with(&[("/a/b", 1)]);
        assert!(trie.lookup(&key("/a/c")).is_none());
        assert!(trie.lookup(&key("/a/b/c")).is_none());
        assert!(trie.lookup(&key("a/b")).is_none());
    }

    #[test]
    fn delete_removes_exactly_the_subtree() {
        let trie_entries = [("/a/b", 1), ("/a/b/c", 2)];
        let mut trie = trie_with(&trie_entries);
        trie.insert(&key("/a/keep"), Item::new("keep", 0, 3));

        assert!(trie.delete(&key("/a/b")));

        assert!(trie.lookup(&key("/a/b")).is_none());
        assert!(trie.lookup(&key("/a/b/c")).is_none());
        let parent = trie.lookup(&key("/a")).unwrap();
        assert!(parent.item().is_none());
        assert!(trie.lookup(&key("/a/keep")).is_some());
    }

    #[test]
    fn delete_of_the_only_subtree_prunes_the_emptied_parent() {
        let mut trie = trie_with(&[("/a/b", 1), ("/a/b/c", 2)]);
        assert!(trie.delete(&key("/a/b")));

        assert!(trie.lookup(&key("/a/b/c")).is_none());
        assert!(trie.lookup(&key("/a")).is_none());
        assert!(trie.is_empty());
    }

    #[test]
    fn delete_leaves_parent_that_still_has_siblings() {
        let mut trie = trie_with(&[("/a/b", 1), ("/a/c", 2)]);
        assert!(trie.delete(&key("/a/b")));

        let parent = trie.lookup(&key("/a")).unwrap();
        assert!(parent.item().is_none());
        assert_eq!(parent.child_count(), 1);
    }

    #[test]
    fn delete_cascades_through_all_emptied_ancestors() {
        let mut trie = trie_with(&[("/x/y/z", 5)]);
        assert!(trie.delete(&key("/x/y/z")));
        assert!(trie.is_empty());
        assert_eq!(trie.root().child_count(), 0);
    }

    #[test]
    fn delete_stops_at_ancestor_holding_an_item() {
        let mut trie = trie_with(&[("/x", 1), ("/x/y/z", 5)]);
        assert!(trie.delete(&key("/x/y/z")));

        let x = trie.lookup(&key("/x")).unwrap();
        assert_eq!(x.item().map(|item| item.size), Some(1));
        assert_eq!(x.child_count(), 0);
        assert!(trie.lookup(&key("/x/y")).is_none());
    }

    #[test]
    fn delete_of_missing_path_is_a_no_op() {
        let mut trie = trie_with(&[("/a/b", 1)]);
        let before = trie.clone();

        assert!(!trie.delete(&key("/a/missing")));
        assert!(!trie.delete(&key("/nope/deeper")));
        assert_eq!(trie, before);
    }

    #[test]
    fn delete_of_intermediate_directory_drops_descendants() {
        let mut trie = trie_with(&[("/d/one", 1), ("/d/two", 2), ("/e", 4)]);
        assert!(trie.delete(&key("/d")));

        assert!(trie.lookup(&key("/d")).is_none());
        assert_eq!(trie.root().subtree_size(), 4);
        assert_eq!(trie.len(), 1);
    }

    #[rstest]
    #[case("/a", 1 + 2 + 4)]
    #[case("/a/b", 2 + 4)]
    #[case("/a/b/c", 4)]
    #[case("/other", 8)]
    #[case("/missing", 0)]
    fn aggregate_size_sums_the_subtree(#[case] path: &str, #[case] expected: u64) {
        let trie = trie_with(&[("/a", 1), ("/a/b", 2), ("/a/b/c", 4), ("/other", 8)]);
        assert_eq!(trie.aggregate_size(&key(path)), expected);
    }

    #[test]
    fn aggregate_size_saturates_instead_of_overflowing() {
        let trie = trie_with(&[("/d/a", u64::MAX), ("/d/b", 1), ("/e", 2)]);
        assert_eq!(trie.aggregate_size(&key("/d")), u64::MAX);
        assert_eq!(trie.root().subtree_size(), u64::MAX);
        assert_eq!(trie.aggregate_size(&key("/e")), 2);
    }

    #[test]
    fn aggregate_size_of_disjoint_subtrees_partitions_the_total() {
        let trie = trie_with(&[("/a/x", 3), ("/a/y", 5), ("/b/z", 7)]);
        let root_total = trie.lookup(&key("/a")).unwrap().subtree_size()
            + trie.lookup(&key("/b")).unwrap().subtree_size();
        assert_eq!(root_total, trie.root().subtree_size());
        assert_eq!(root_total, 15);
    }

    #[test]
    fn nodes_walk_in_lexicographic_preorder() {
        let trie = trie_with(&[("/b/z", 1), ("/a/y", 1), ("/a", 1), ("/b/c", 1)]);
        let paths = trie.nodes().map(|visit| visit.path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["", "/a", "/a/y", "/b", "/b/c", "/b/z"]);
    }

    #[test]
    fn nodes_report_depth_and_segment() {
        let trie = trie_with(&[("top/mid/leaf", 1)]);
        let visits = trie
            .nodes()
            .map(|visit| (visit.depth, visit.segment.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            visits,
            vec![
                (1, "top".to_string()),
                (2, "mid".to_string()),
                (3, "leaf".to_string())
            ]
        );
    }

    #[test]
    fn entries_list_only_nodes_with_items() {
        let trie = trie_with(&[("/a/b", 2), ("/c", 3)]);
        let entries = trie.entries();
        assert_eq!(
            entries,
            vec![
                Entry::new("/a/b", Item::new("b", 0, 2)),
                Entry::new("/c", Item::new("c", 0, 3)),
            ]
        );
    }

    #[test]
    fn deep_paths_do_not_recurse() {
        let deep = (0..5_000).map(|i| i.to_string()).collect::<Vec<_>>().join("/");
        let mut trie = FilesystemTrie::default();
        trie.insert(&key(&deep), Item::new("leaf", 0, 9));

        assert_eq!(trie.root().subtree_size(), 9);
        assert_eq!(trie.entries().len(), 1);
        assert!(trie.delete(&key(&deep)));
        assert!(trie.is_empty());
    }
}
