use alloc::vec::Vec;

use tracing::trace;

use crate::Key;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The unbalanced binary search tree backing `OrderedMultiMap`.
pub(crate) struct RawOrderedMultiMap<V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of nodes reachable from `root`.
    len: usize,
}

/// The link a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Link {
    Root,
    Child(Handle, Side),
}

/// How the position of a removed node was refilled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Removal {
    /// The node had no children and was detached.
    Leaf,
    /// The node's only child took its place.
    OneChild,
    /// The node's in-order successor was unlinked and took its place.
    Successor,
}

impl<V> RawOrderedMultiMap<V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of nodes in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no nodes.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Removes every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the root handle, if any.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<V> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a node by handle.
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<V> {
        self.nodes.get_mut(handle)
    }

    /// Inserts a new node and returns its handle.
    ///
    /// The node is always attached as a new leaf; existing nodes never move.
    pub(crate) fn insert(&mut self, key: Key, value: V) -> Handle {
        let handle = self.nodes.alloc(Node::new(key, value));
        let mut depth = 0usize;

        if let Some(mut current) = self.root {
            loop {
                depth += 1;
                let node = self.nodes.get_mut(current);
                let side = Side::toward(key, node.key());
                match node.child(side) {
                    Some(next) => current = next,
                    None => {
                        node.set_child(side, Some(handle));
                        break;
                    }
                }
            }
        } else {
            self.root = Some(handle);
        }

        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        trace!(target: "multi_bst", key, depth, len = self.len, "inserted node");
        handle
    }

    /// Returns the node nearest the root carrying `key`.
    pub(crate) fn search(&self, key: Key) -> Option<Handle> {
        self.descend(key, |_, node| node.key() == key).map(|(_, handle)| handle)
    }

    /// Returns the last node reached by following `side` links from the root.
    pub(crate) fn extreme(&self, side: Side) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(next) = self.nodes.get(current).child(side) {
            current = next;
        }
        Some(current)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Handle, usize)> = self.root.into_iter().map(|root| (root, 1)).collect();

        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend(node.left().map(|child| (child, depth + 1)));
            stack.extend(node.right().map(|child| (child, depth + 1)));
        }

        height
    }

    /// Removes the node nearest the root carrying `key`, returning its value.
    pub(crate) fn remove_first(&mut self, key: Key) -> Option<V> {
        let (link, handle) = self.descend(key, |_, node| node.key() == key)?;
        Some(self.unlink(link, handle))
    }

    /// Removes every node carrying `key`, returning how many were removed.
    pub(crate) fn remove_all(&mut self, key: Key) -> usize {
        let mut removed = 0;
        while let Some((link, handle)) = self.descend(key, |_, node| node.key() == key) {
            drop(self.unlink(link, handle));
            removed += 1;
        }
        trace!(target: "multi_bst", key, removed, len = self.len, "removed all matching nodes");
        removed
    }

    /// Removes the node at `handle`, returning its value.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not reachable from the root.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> V {
        let key = self.nodes.get(handle).key();
        let (link, handle) = self
            .descend(key, |current, _| current == handle)
            .expect("`RawOrderedMultiMap::remove_handle()` - `handle` is not in the tree!");
        self.unlink(link, handle)
    }

    /// Walks from the root along the path `key` selects until `is_target` accepts a node.
    fn descend<F>(&self, key: Key, is_target: F) -> Option<(Link, Handle)>
    where
        F: Fn(Handle, &Node<V>) -> bool,
    {
        let mut link = Link::Root;
        let mut current = self.root?;

        loop {
            let node = self.nodes.get(current);
            if is_target(current, node) {
                return Some((link, current));
            }
            let side = Side::toward(key, node.key());
            link = Link::Child(current, side);
            current = node.child(side)?;
        }
    }

    /// Detaches the node hanging from `link` and frees it.
    fn unlink(&mut self, link: Link, handle: Handle) -> V {
        let node = self.nodes.get(handle);
        let key = node.key();
        let (replacement, removal) = match (node.left(), node.right()) {
            (None, None) => (None, Removal::Leaf),
            (Some(child), None) | (None, Some(child)) => (Some(child), Removal::OneChild),
            (Some(left), Some(right)) => (Some(self.splice_successor(left, right)), Removal::Successor),
        };

        self.set_link(link, replacement);
        self.len -= 1;
        let value = self.nodes.take(handle).into_value();
        if self.len == 0 {
            // Nothing is live, so the free list can go too.
            self.nodes.clear();
        }
        debug_assert_eq!(self.nodes.len(), self.len);

        trace!(target: "multi_bst", key, ?removal, len = self.len, "removed node");
        value
    }

    /// Unlinks the leftmost node of the subtree at `right` and hands it both subtrees
    /// of the node being removed. Returns the successor's handle.
    ///
    /// Using the successor rather than the predecessor keeps keys equal to the
    /// replacement on its right.
    fn splice_successor(&mut self, left: Handle, right: Handle) -> Handle {
        let mut parent = None;
        let mut successor = right;
        while let Some(next) = self.nodes.get(successor).left() {
            parent = Some(successor);
            successor = next;
        }

        if let Some(parent) = parent {
            let orphan = self.nodes.get(successor).right();
            self.nodes.get_mut(parent).set_child(Side::Left, orphan);
            self.nodes.get_mut(successor).set_child(Side::Right, Some(right));
        }
        self.nodes.get_mut(successor).set_child(Side::Left, Some(left));

        successor
    }

    fn set_link(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Child(parent, side) => self.nodes.get_mut(parent).set_child(side, child),
        }
    }
}

impl<V: PartialEq> RawOrderedMultiMap<V> {
    /// Returns true if both trees have the same shape with equal keys and values in every position.
    pub(crate) fn structurally_eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        let mut stack = alloc::vec![(self.root, other.root)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(mine), Some(theirs)) => {
                    let (mine, theirs) = (self.nodes.get(mine), other.nodes.get(theirs));
                    if mine.key() != theirs.key() || mine.value() != theirs.value() {
                        return false;
                    }
                    stack.push((mine.left(), theirs.left()));
                    stack.push((mine.right(), theirs.right()));
                }
                _ => return false,
            }
        }

        true
    }
}

impl<V: Clone> Clone for RawOrderedMultiMap<V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.nodes.clone_from(&source.nodes);
        self.root = source.root;
        self.len = source.len;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::manual_assert)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<V> RawOrderedMultiMap<V> {
        /// Validates the ordering, reachability and size invariants.
        /// Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            if self.root.is_none() != (self.len == 0) {
                errors.push(alloc::format!("root is {:?} but len is {}", self.root, self.len));
            }

            // Every node lies within [lower, upper) inherited from its ancestors.
            let mut seen: Vec<Handle> = Vec::new();
            let mut stack: Vec<(Handle, Option<Key>, Option<Key>)> =
                self.root.into_iter().map(|root| (root, None, None)).collect();
            while let Some((handle, lower, upper)) = stack.pop() {
                if seen.contains(&handle) {
                    errors.push(alloc::format!("node {handle:?} is reachable twice"));
                    continue;
                }
                seen.push(handle);

                let node = self.nodes.get(handle);
                let key = node.key();
                if lower.is_some_and(|lower| key < lower) || upper.is_some_and(|upper| key >= upper) {
                    errors.push(alloc::format!("key {key} outside [{lower:?}, {upper:?})"));
                }
                if let Some(left) = node.left() {
                    stack.push((left, lower, Some(key)));
                }
                if let Some(right) = node.right() {
                    stack.push((right, Some(key), upper));
                }
            }

            if seen.len() != self.len {
                errors.push(alloc::format!("len is {} but {} nodes are reachable", self.len, seen.len()));
            }
            if self.nodes.len() != self.len {
                errors.push(alloc::format!("len is {} but the arena holds {} nodes", self.len, self.nodes.len()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Key of the node reached by following `path` from the root.
        fn key_at(&self, path: &[Side]) -> Option<Key> {
            let mut current = self.root?;
            for &side in path {
                current = self.nodes.get(current).child(side)?;
            }
            Some(self.nodes.get(current).key())
        }
    }

    fn tree_of(keys: &[Key]) -> RawOrderedMultiMap<usize> {
        let mut tree = RawOrderedMultiMap::new();
        for (index, &key) in keys.iter().enumerate() {
            tree.insert(key, index);
        }
        tree.validate_invariants();
        tree
    }

    use Side::{Left as L, Right as R};

    #[test]
    fn duplicates_extend_right() {
        let tree = tree_of(&[5, 3, 8, 3, 5]);
        assert_eq!(tree.key_at(&[]), Some(5));
        assert_eq!(tree.key_at(&[L]), Some(3));
        assert_eq!(tree.key_at(&[L, R]), Some(3));
        assert_eq!(tree.key_at(&[R]), Some(8));
        assert_eq!(tree.key_at(&[R, L]), Some(5));
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn search_returns_nearest_root_match() {
        let tree = tree_of(&[5, 3, 8, 3]);
        let handle = tree.search(3).unwrap();
        assert_eq!(*tree.node(handle).value(), 1);
        assert_eq!(tree.search(4), None);
        assert_eq!(RawOrderedMultiMap::<()>::new().search(0), None);
    }

    #[test]
    fn extremes_include_the_root() {
        let tree = tree_of(&[5]);
        let root = tree.root();
        assert_eq!(tree.extreme(L), root);
        assert_eq!(tree.extreme(R), root);

        let tree = tree_of(&[5, 3, 8, 1, 9, 7]);
        assert_eq!(tree.node(tree.extreme(L).unwrap()).key(), 1);
        assert_eq!(tree.node(tree.extreme(R).unwrap()).key(), 9);
    }

    #[test]
    fn remove_leaf() {
        let mut tree = tree_of(&[5, 3, 8]);
        assert_eq!(tree.remove_first(3), Some(1));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[L]), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_node_with_one_child() {
        let mut tree = tree_of(&[5, 3, 1]);
        assert_eq!(tree.remove_first(3), Some(1));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[L]), Some(1));

        let mut tree = tree_of(&[5, 8, 9]);
        assert_eq!(tree.remove_first(5), Some(0));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[]), Some(8));
    }

    #[test]
    fn remove_node_with_adjacent_successor() {
        let mut tree = tree_of(&[5, 3, 8, 9]);
        assert_eq!(tree.remove_first(5), Some(0));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[]), Some(8));
        assert_eq!(tree.key_at(&[L]), Some(3));
        assert_eq!(tree.key_at(&[R]), Some(9));
    }

    #[test]
    fn remove_node_with_deep_successor() {
        let mut tree = tree_of(&[5, 3, 10, 7, 12, 6, 8, 9]);
        assert_eq!(tree.remove_first(5), Some(0));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[]), Some(6));
        assert_eq!(tree.key_at(&[L]), Some(3));
        assert_eq!(tree.key_at(&[R]), Some(10));
        assert_eq!(tree.key_at(&[R, L]), Some(7));
        assert_eq!(tree.key_at(&[R, L, L]), None);
        assert_eq!(tree.key_at(&[R, L, R, R]), Some(9));
    }

    #[test]
    fn remove_node_whose_successor_is_a_duplicate() {
        let mut tree = tree_of(&[5, 3, 5, 5]);
        assert_eq!(tree.remove_first(5), Some(0));
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[]), Some(5));
        assert_eq!(*tree.node(tree.root().unwrap()).value(), 2);
        assert_eq!(tree.remove_all(5), 2);
        tree.validate_invariants();
        assert_eq!(tree.key_at(&[]), Some(3));
    }

    #[test]
    fn remove_missing_key() {
        let mut tree = tree_of(&[5, 3, 8]);
        assert_eq!(tree.remove_first(4), None);
        assert_eq!(tree.remove_all(4), 0);
        assert_eq!(tree.len(), 3);
        assert_eq!(RawOrderedMultiMap::<()>::new().remove_first(4), None);
    }

    #[test]
    fn remove_handle_targets_that_node() {
        let mut tree = tree_of(&[5, 5, 5]);
        let deepest = tree.extreme(R).unwrap();
        assert_eq!(tree.remove_handle(deepest), 2);
        tree.validate_invariants();
        assert_eq!(*tree.node(tree.root().unwrap()).value(), 0);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn emptied_tree_releases_storage() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.remove_all(2), 1);
        assert_eq!(tree.remove_first(1), Some(0));
        assert_eq!(tree.remove_first(3), Some(2));
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = tree_of(&[5, 3, 8]);
        let mut copy = original.clone();
        copy.validate_invariants();
        *copy.node_mut(copy.search(3).unwrap()).value_mut() = 99;
        copy.insert(1, 4);
        assert_eq!(*original.node(original.search(3).unwrap()).value(), 1);
        assert_eq!(original.len(), 3);

        original.clone_from(&copy);
        original.validate_invariants();
        assert_eq!(original.len(), 4);
        assert_eq!(original.key_at(&[L, L]), Some(1));
    }

    #[test]
    fn structural_equality_depends_on_shape() {
        let a = tree_of(&[5, 3, 8]);
        let b = tree_of(&[5, 3, 8]);
        assert!(a.structurally_eq(&b));

        // Same entries, different shape.
        let mut c = RawOrderedMultiMap::new();
        for (key, value) in [(3, 1), (5, 0), (8, 2)] {
            c.insert(key, value);
        }
        assert!(!a.structurally_eq(&c));

        let mut d = tree_of(&[5, 3, 8]);
        *d.node_mut(d.search(8).unwrap()).value_mut() = 7;
        assert!(!a.structurally_eq(&d));
    }

    #[test]
    fn sorted_insertion_degenerates_into_a_list() {
        let keys: Vec<Key> = (0..64).collect();
        let tree = tree_of(&keys);
        assert_eq!(tree.height(), 64);
        assert_eq!(tree.node(tree.extreme(R).unwrap()).key(), 63);
    }

    proptest! {
        #[test]
        fn operations_preserve_invariants(operations in prop::collection::vec(strategy(), 0..512)) {
            let mut tree: RawOrderedMultiMap<u32> = RawOrderedMultiMap::new();
            let mut model: Vec<(Key, u32)> = vec![];
            let mut next_value = 0u32;

            for operation in operations {
                match operation {
                    Operation::Insert(key) => {
                        tree.insert(key, next_value);
                        model.push((key, next_value));
                        next_value += 1;
                    }
                    Operation::RemoveFirst(key) => match tree.remove_first(key) {
                        Some(value) => {
                            let index = model.iter().position(|&entry| entry == (key, value));
                            prop_assert!(index.is_some(), "removed ({}, {}) which was never inserted", key, value);
                            model.swap_remove(index.unwrap());
                        }
                        None => {
                            prop_assert!(model.iter().all(|&(k, _)| k != key));
                        }
                    },
                    Operation::RemoveAll(key) => {
                        let expected = model.iter().filter(|&&(k, _)| k == key).count();
                        prop_assert_eq!(tree.remove_all(key), expected);
                        model.retain(|&(k, _)| k != key);
                    }
                    Operation::Search(key) => match tree.search(key) {
                        Some(handle) => {
                            let node = tree.node(handle);
                            prop_assert!(model.contains(&(key, *node.value())));
                        }
                        None => {
                            prop_assert!(model.iter().all(|&(k, _)| k != key));
                        }
                    },
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());

                let min = tree.extreme(L).map(|handle| tree.node(handle).key());
                let max = tree.extreme(R).map(|handle| tree.node(handle).key());
                prop_assert_eq!(min, model.iter().map(|&(k, _)| k).min());
                prop_assert_eq!(max, model.iter().map(|&(k, _)| k).max());
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(Key),
        RemoveFirst(Key),
        RemoveAll(Key),
        Search(Key),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        // A narrow key range forces duplicates.
        let key = || 0..32usize;
        prop_oneof![
            10 => key().prop_map(Operation::Insert),
            4 => key().prop_map(Operation::RemoveFirst),
            1 => key().prop_map(Operation::RemoveAll),
            3 => key().prop_map(Operation::Search),
        ]
    }
}
