use core::fmt;
use core::mem;

use crate::raw::{RawOrderedMultiMap, Side};
use crate::{Error, Key, Result};

mod capacity;
mod node_ref;

pub use node_ref::{NodeMut, NodeRef};

/// An ordered multimap based on an unbalanced [binary search tree].
///
/// Entries are ordered by an unsigned integer [`Key`], and any number of entries
/// may share the same key. Every [`insert`] adds a new entry: an existing entry
/// with the same key is never replaced.
///
/// A new entry descends from the root, going left while its key is strictly
/// smaller than the key of the node it is compared with and right otherwise, and
/// is attached where the path ends. Entries with equal keys therefore sit on the
/// right of each other, with the first one inserted nearest the root. Lookups and
/// single removals act on that *nearest-root match*.
///
/// The tree is never rebalanced. Its shape, and the cost of every operation,
/// depends only on the insertion order: inserting keys in sorted order produces a
/// single path whose length equals the number of entries, and operations then
/// take O(n).
///
/// Cloning produces an independent copy with the same shape, and moving (or
/// [`take`](OrderedMultiMap::take)) transfers every entry in O(1). Dropping the
/// container releases each entry exactly once, without recursion.
///
/// # Examples
///
/// ```
/// use multi_bst::{Error, OrderedMultiMap};
///
/// let mut scores = OrderedMultiMap::new();
/// scores.insert(90, "Alice");
/// scores.insert(75, "Bob");
/// scores.insert(90, "Carol");
///
/// assert_eq!(scores.len(), 3);
/// assert_eq!(*scores.find(90)?.value(), "Alice");
/// assert_eq!(*scores.find_min()?.value(), "Bob");
///
/// // Removing the first "90" exposes the second one.
/// assert_eq!(scores.remove_first(90)?, "Alice");
/// assert_eq!(*scores.find(90)?.value(), "Carol");
///
/// assert_eq!(scores.find(10).unwrap_err(), Error::NotFound(10));
/// # Ok::<(), Error>(())
/// ```
///
/// [binary search tree]: https://en.wikipedia.org/wiki/Binary_search_tree
/// [`insert`]: OrderedMultiMap::insert
pub struct OrderedMultiMap<V> {
    raw: RawOrderedMultiMap<V>,
}

impl<V> OrderedMultiMap<V> {
    /// Makes a new, empty `OrderedMultiMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut tree = OrderedMultiMap::new();
    ///
    /// // entries can now be inserted into the empty tree
    /// tree.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> OrderedMultiMap<V> {
        OrderedMultiMap {
            raw: RawOrderedMultiMap::new(),
        }
    }

    /// Inserts a new entry.
    ///
    /// Entries already carrying `key` are kept; the new one is placed below them.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut tree = OrderedMultiMap::new();
    /// tree.insert(37, "a");
    /// tree.insert(37, "b");
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth), which is O(n) for keys inserted in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if the container already holds `u32::MAX - 1` entries.
    pub fn insert(&mut self, key: Key, value: V) {
        self.raw.insert(key, value);
    }

    /// Returns the entry nearest the root carrying `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty, and
    /// [`Error::NotFound`] if no entry carries `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::{Error, OrderedMultiMap};
    ///
    /// let mut tree = OrderedMultiMap::new();
    /// assert_eq!(tree.find(3).unwrap_err(), Error::EmptyContainer);
    ///
    /// tree.insert(5, "a");
    /// tree.insert(3, "b");
    /// tree.insert(3, "c");
    /// assert_eq!(*tree.find(3)?.value(), "b");
    /// assert_eq!(tree.find(4).unwrap_err(), Error::NotFound(4));
    /// # Ok::<(), Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn find(&self, key: Key) -> Result<NodeRef<'_, V>> {
        if self.raw.is_empty() {
            return Err(Error::EmptyContainer);
        }
        let handle = self.raw.search(key).ok_or(Error::NotFound(key))?;
        Ok(NodeRef { tree: &self.raw, handle })
    }

    /// Returns an exclusive view of the entry nearest the root carrying `key`.
    ///
    /// # Errors
    ///
    /// Same as [`find`](OrderedMultiMap::find).
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut tree = OrderedMultiMap::from([(2, String::from("two"))]);
    /// tree.find_mut(2)?.value_mut().push('!');
    /// assert_eq!(tree.find(2)?.value(), "two!");
    /// # Ok::<(), multi_bst::Error>(())
    /// ```
    pub fn find_mut(&mut self, key: Key) -> Result<NodeMut<'_, V>> {
        if self.raw.is_empty() {
            return Err(Error::EmptyContainer);
        }
        let handle = self.raw.search(key).ok_or(Error::NotFound(key))?;
        Ok(NodeMut { tree: &mut self.raw, handle })
    }

    /// Returns an entry with the smallest key: the node reached by following left
    /// links from the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let tree = OrderedMultiMap::from([(5, 'a'), (3, 'b'), (8, 'c'), (3, 'd')]);
    /// assert_eq!(tree.find_min()?.key(), 3);
    /// # Ok::<(), multi_bst::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn find_min(&self) -> Result<NodeRef<'_, V>> {
        let handle = self.raw.extreme(Side::Left).ok_or(Error::EmptyContainer)?;
        Ok(NodeRef { tree: &self.raw, handle })
    }

    /// Returns an entry with the largest key: the node reached by following right
    /// links from the root.
    ///
    /// When several entries share the largest key, this is the one farthest from
    /// the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let tree = OrderedMultiMap::from([(5, 'a'), (8, 'b'), (8, 'c')]);
    /// let max = tree.find_max()?;
    /// assert_eq!((max.key(), *max.value()), (8, 'c'));
    /// # Ok::<(), multi_bst::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn find_max(&self) -> Result<NodeRef<'_, V>> {
        let handle = self.raw.extreme(Side::Right).ok_or(Error::EmptyContainer)?;
        Ok(NodeRef { tree: &self.raw, handle })
    }

    /// Removes the entry nearest the root carrying `key` and returns its value.
    ///
    /// The remaining entries stay in the tree: a removed node with two children
    /// is replaced by its in-order successor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no entry carries `key`, including when the
    /// container is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::{Error, OrderedMultiMap};
    ///
    /// let mut tree = OrderedMultiMap::from([(1, "a"), (1, "b")]);
    /// assert_eq!(tree.remove_first(1), Ok("a"));
    /// assert_eq!(tree.remove_first(1), Ok("b"));
    /// assert_eq!(tree.remove_first(1), Err(Error::NotFound(1)));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn remove_first(&mut self, key: Key) -> Result<V> {
        self.raw.remove_first(key).ok_or(Error::NotFound(key))
    }

    /// Removes every entry carrying `key`, returning how many were removed.
    ///
    /// Removing a key that is not present does nothing and returns 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut tree = OrderedMultiMap::from([(5, ()), (3, ()), (8, ()), (3, ())]);
    /// assert_eq!(tree.remove_all(3), 2);
    /// assert_eq!(tree.remove_all(3), 0);
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k * depth) for k matching entries.
    pub fn remove_all(&mut self, key: Key) -> usize {
        self.raw.remove_all(key)
    }

    /// Returns a reference to the value of the entry nearest the root carrying `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let tree = OrderedMultiMap::from([(1, "a")]);
    /// assert_eq!(tree.get(1), Some(&"a"));
    /// assert_eq!(tree.get(2), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&V> {
        self.raw.search(key).map(|handle| self.raw.node(handle).value())
    }

    /// Returns a mutable reference to the value of the entry nearest the root carrying `key`.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let handle = self.raw.search(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Returns `true` if at least one entry carries `key`.
    #[must_use]
    pub fn contains_key(&self, key: Key) -> bool {
        self.raw.search(key).is_some()
    }

    /// Returns the root entry, or `None` if the container is empty.
    ///
    /// Together with [`NodeRef::left`] and [`NodeRef::right`] this gives access to
    /// the shape of the tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, V>> {
        self.raw.root().map(|handle| NodeRef { tree: &self.raw, handle })
    }

    /// Returns the number of entries on the longest path from the root to a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let balanced: OrderedMultiMap<()> = [2, 1, 3].into_iter().map(|key| (key, ())).collect();
    /// let sorted: OrderedMultiMap<()> = [1, 2, 3].into_iter().map(|key| (key, ())).collect();
    /// assert_eq!(balanced.height(), 2);
    /// assert_eq!(sorted.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes every entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut a = OrderedMultiMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Moves every entry into a new container, leaving this one empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut a = OrderedMultiMap::from([(1, "a"), (2, "b")]);
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(b.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use = "use `clear` to drop the entries"]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Returns the number of entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut a = OrderedMultiMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the container holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<V: Clone> Clone for OrderedMultiMap<V> {
    fn clone(&self) -> Self {
        OrderedMultiMap { raw: self.raw.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.raw.clone_from(&source.raw);
    }
}

/// Two containers are equal when their trees have the same shape, with equal
/// keys and values at every position.
impl<V: PartialEq> PartialEq for OrderedMultiMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.structurally_eq(&other.raw)
    }
}

impl<V: Eq> Eq for OrderedMultiMap<V> {}

impl<V: fmt::Debug> fmt::Debug for OrderedMultiMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedMultiMap").field("len", &self.len()).field("root", &self.root()).finish()
    }
}

impl<V> Default for OrderedMultiMap<V> {
    fn default() -> Self {
        OrderedMultiMap::new()
    }
}

impl<V> FromIterator<(Key, V)> for OrderedMultiMap<V> {
    fn from_iter<T: IntoIterator<Item = (Key, V)>>(iter: T) -> Self {
        let mut tree = OrderedMultiMap::new();
        tree.extend(iter);
        tree
    }
}

impl<V> Extend<(Key, V)> for OrderedMultiMap<V> {
    fn extend<T: IntoIterator<Item = (Key, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V, const N: usize> From<[(Key, V); N]> for OrderedMultiMap<V> {
    /// Inserts the pairs in array order.
    fn from(arr: [(Key, V); N]) -> Self {
        OrderedMultiMap::from_iter(arr)
    }
}
