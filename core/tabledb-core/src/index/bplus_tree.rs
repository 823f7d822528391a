//! B+Tree ordered index (fixed fanout, ORDER = 4).
//!
//! Maps a unique `i64` key to a row [`Locator`]. Nodes live in an arena
//! (`Vec<Node>`) and refer to each other by [`NodeId`]; parent and next-leaf
//! links are plain indices, so no node owns another.
//!
//! ```text
//!                 [ 3 | 5 ]                 internal: keys + ORDER+1 children
//!               /     |     \
//!        [1 2] -> [3 4] -> [5 6 7]          leaves: keys + locators, chained
//! ```
//!
//! Removal never merges or redistributes: leaves may become underfull or
//! empty, separators stay in place and keep routing correctly.

use crate::error::{TdbError, TdbResult};
use crate::index::Locator;
use smallvec::SmallVec;

/// Maximum number of keys a node holds before it splits.
pub const ORDER: usize = 4;

/// Arena index of a node.
pub type NodeId = usize;

type Keys = SmallVec<[i64; ORDER + 1]>;

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf {
        values: SmallVec<[Locator; ORDER + 1]>,
        next: Option<NodeId>,
    },
    Internal {
        children: SmallVec<[NodeId; ORDER + 2]>,
    },
}

#[derive(Debug, Clone)]
struct Node {
    keys: Keys,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    fn leaf() -> Self {
        Self {
            keys: Keys::new(),
            parent: None,
            kind: NodeKind::Leaf {
                values: SmallVec::new(),
                next: None,
            },
        }
    }
}

/// How an internal node picks the child to descend into.
#[derive(Debug, Clone, Copy)]
enum Descent {
    /// child index = number of separators `<= key`; an exact separator
    /// routes right, where leaf splits put the key.
    UpperBound,
    /// child index = number of separators `< key`; lands on the leftmost
    /// leaf that may hold keys `>= key`.
    LowerBound,
}

/// B+Tree with unique integer keys.
#[derive(Debug, Clone, Default)]
pub struct BPlusTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    len: usize,
}

impl BPlusTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from root to leaves (0 for an empty tree).
    pub fn height(&self) -> usize {
        let Some(mut id) = self.root else {
            return 0;
        };
        let mut height = 1;
        while let NodeKind::Internal { children } = &self.nodes[id].kind {
            id = children[0];
            height += 1;
        }
        height
    }

    /// Insert `key → value`.
    ///
    /// Fails with [`TdbError::DuplicateKey`] if `key` is already present;
    /// existing entries are never overwritten.
    pub fn insert(&mut self, key: i64, value: Locator) -> TdbResult<()> {
        let leaf = match self.root {
            Some(_) => self.descend(key, Descent::UpperBound),
            None => {
                let id = self.alloc(Node::leaf());
                self.root = Some(id);
                id
            }
        };

        let Node { keys, kind, .. } = &mut self.nodes[leaf];
        let pos = keys.partition_point(|k| *k < key);
        if keys.get(pos) == Some(&key) {
            return Err(TdbError::DuplicateKey(key));
        }
        keys.insert(pos, key);
        if let NodeKind::Leaf { values, .. } = kind {
            values.insert(pos, value);
        }
        self.len += 1;

        if self.nodes[leaf].keys.len() > ORDER {
            self.split_leaf(leaf);
        }
        Ok(())
    }

    /// Remove `key`, returning the locator it mapped to.
    ///
    /// Does not rebalance.
    pub fn remove(&mut self, key: i64) -> Option<Locator> {
        self.root?;
        let leaf = self.descend(key, Descent::UpperBound);
        let Node { keys, kind, .. } = &mut self.nodes[leaf];
        let pos = keys.binary_search(&key).ok()?;
        let NodeKind::Leaf { values, .. } = kind else {
            return None;
        };
        keys.remove(pos);
        let removed = values.remove(pos);
        self.len -= 1;
        Some(removed)
    }

    /// Point lookup.
    pub fn search(&self, key: i64) -> Option<Locator> {
        self.root?;
        let leaf = self.descend(key, Descent::UpperBound);
        let node = &self.nodes[leaf];
        let pos = node.keys.binary_search(&key).ok()?;
        match &node.kind {
            NodeKind::Leaf { values, .. } => values.get(pos).copied(),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Re-point an existing key at a new locator, returning the old one.
    ///
    /// Returns `None` (and changes nothing) if the key is absent.
    pub fn replace(&mut self, key: i64, value: Locator) -> Option<Locator> {
        self.root?;
        let leaf = self.descend(key, Descent::UpperBound);
        let Node { keys, kind, .. } = &mut self.nodes[leaf];
        let pos = keys.binary_search(&key).ok()?;
        match kind {
            NodeKind::Leaf { values, .. } => Some(std::mem::replace(&mut values[pos], value)),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Locators of all keys in `[min, max]`, in ascending key order.
    ///
    /// Walks the leaf chain from the leaf that would hold `min` and stops at
    /// the first key above `max`.
    pub fn range_search(&self, min: i64, max: i64) -> Vec<Locator> {
        let mut results = Vec::new();
        if self.root.is_none() || min > max {
            return results;
        }

        let mut cursor = Some(self.descend(min, Descent::LowerBound));
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            let NodeKind::Leaf { values, next } = &node.kind else {
                break;
            };
            for (key, value) in node.keys.iter().zip(values) {
                if *key > max {
                    return results;
                }
                if *key >= min {
                    results.push(*value);
                }
            }
            cursor = *next;
        }
        results
    }

    /// Every `(key, locator)` pair, walking the leaf chain end to end.
    pub fn entries(&self) -> Vec<(i64, Locator)> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.leftmost_leaf();
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            let NodeKind::Leaf { values, next } = &node.kind else {
                break;
            };
            out.extend(node.keys.iter().copied().zip(values.iter().copied()));
            cursor = *next;
        }
        out
    }

    /// Keys of each leaf, in leaf-chain order.
    pub fn leaf_keys(&self) -> Vec<Vec<i64>> {
        let mut out = Vec::new();
        let mut cursor = self.leftmost_leaf();
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            let NodeKind::Leaf { next, .. } = &node.kind else {
                break;
            };
            out.push(node.keys.to_vec());
            cursor = *next;
        }
        out
    }

    // ════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let NodeKind::Internal { children } = &self.nodes[id].kind {
            id = children[0];
        }
        Some(id)
    }

    /// Walk from the root to a leaf. Caller guarantees a root exists.
    fn descend(&self, key: i64, descent: Descent) -> NodeId {
        let mut id = self.root.unwrap_or_default();
        loop {
            let node = &self.nodes[id];
            match &node.kind {
                NodeKind::Leaf { .. } => return id,
                NodeKind::Internal { children } => {
                    let idx = match descent {
                        Descent::UpperBound => node.keys.partition_point(|k| *k <= key),
                        Descent::LowerBound => node.keys.partition_point(|k| *k < key),
                    };
                    id = children[idx.min(children.len() - 1)];
                }
            }
        }
    }

    /// Split an overflowing leaf at `len / 2`; the right half's first key is
    /// copied up as the separator.
    fn split_leaf(&mut self, leaf: NodeId) {
        let split = self.nodes[leaf].keys.len() / 2;
        let parent = self.nodes[leaf].parent;

        let Node { keys, kind, .. } = &mut self.nodes[leaf];
        let right_keys: Keys = keys.drain(split..).collect();
        let NodeKind::Leaf { values, next } = kind else {
            return;
        };
        let right_values = values.drain(split..).collect();
        let old_next = next.take();

        let separator = right_keys[0];
        let right = self.alloc(Node {
            keys: right_keys,
            parent,
            kind: NodeKind::Leaf {
                values: right_values,
                next: old_next,
            },
        });
        if let NodeKind::Leaf { next, .. } = &mut self.nodes[leaf].kind {
            *next = Some(right);
        }

        self.insert_into_parent(leaf, separator, right);
    }

    /// Hook `right` in as the sibling after `left`, climbing while internal
    /// nodes overflow. An internal split moves the median key up without
    /// keeping a copy in either half.
    fn insert_into_parent(&mut self, mut left: NodeId, mut key: i64, mut right: NodeId) {
        loop {
            let Some(parent) = self.nodes[left].parent else {
                let root = self.alloc(Node {
                    keys: Keys::from_slice(&[key]),
                    parent: None,
                    kind: NodeKind::Internal {
                        children: SmallVec::from_slice(&[left, right]),
                    },
                });
                self.nodes[left].parent = Some(root);
                self.nodes[right].parent = Some(root);
                self.root = Some(root);
                return;
            };

            self.nodes[right].parent = Some(parent);
            let Node { keys, kind, .. } = &mut self.nodes[parent];
            let NodeKind::Internal { children } = kind else {
                return;
            };
            let slot = children.iter().position(|c| *c == left).unwrap_or(keys.len());
            keys.insert(slot, key);
            children.insert(slot + 1, right);

            if keys.len() <= ORDER {
                return;
            }

            let split = keys.len() / 2;
            let median = keys[split];
            let right_keys: Keys = keys.drain(split + 1..).collect();
            keys.truncate(split);
            let right_children: SmallVec<[NodeId; ORDER + 2]> =
                children.drain(split + 1..).collect();
            let grandparent = self.nodes[parent].parent;

            let moved = right_children.clone();
            let sibling = self.alloc(Node {
                keys: right_keys,
                parent: grandparent,
                kind: NodeKind::Internal {
                    children: right_children,
                },
            });
            for child in moved {
                self.nodes[child].parent = Some(sibling);
            }

            left = parent;
            key = median;
            right = sibling;
        }
    }

    /// Structural check used by tests: sorted nodes, consistent parent
    /// links, separators bounding their subtrees, equal leaf depth.
    #[cfg(test)]
    fn check_structure(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            return Ok(());
        };
        if self.nodes[root].parent.is_some() {
            return Err("root has a parent".into());
        }
        let mut leaf_depth = None;
        let mut stack = vec![(root, 1usize, i64::MIN, i64::MAX)];
        while let Some((id, depth, lo, hi)) = stack.pop() {
            let node = &self.nodes[id];
            if node.keys.windows(2).any(|w| w[0] >= w[1]) {
                return Err(format!("node {id} keys not strictly ascending"));
            }
            if node.keys.len() > ORDER {
                return Err(format!("node {id} overflows"));
            }
            match &node.kind {
                NodeKind::Leaf { values, .. } => {
                    if values.len() != node.keys.len() {
                        return Err(format!("leaf {id} keys/values length differ"));
                    }
                    if node.keys.iter().any(|k| *k < lo || *k > hi) {
                        return Err(format!("leaf {id} key outside separator bounds"));
                    }
                    match leaf_depth {
                        None => leaf_depth = Some(depth),
                        Some(d) if d != depth => return Err("leaves at unequal depth".into()),
                        _ => {}
                    }
                }
                NodeKind::Internal { children } => {
                    if children.len() != node.keys.len() + 1 {
                        return Err(format!("internal {id} has wrong child count"));
                    }
                    for (i, child) in children.iter().enumerate() {
                        if self.nodes[*child].parent != Some(id) {
                            return Err(format!("child {child} has stale parent link"));
                        }
                        let child_lo = if i == 0 { lo } else { node.keys[i - 1] };
                        let child_hi = if i == node.keys.len() {
                            hi
                        } else {
                            node.keys[i].saturating_sub(1)
                        };
                        stack.push((*child, depth + 1, child_lo, child_hi));
                    }
                }
            }
        }
        Ok(())
    }
}
