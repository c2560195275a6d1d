use core::fmt;
use core::mem;

use crate::Key;
use crate::raw::{Handle, RawOrderedMultiMap};

/// A shared view of one entry of an [`OrderedMultiMap`](crate::OrderedMultiMap).
///
/// Returned by [`find`], [`find_min`], [`find_max`] and [`root`]. Besides the
/// entry itself it exposes the entry's children, so the shape of the tree can be
/// inspected.
///
/// # Examples
///
/// ```
/// use multi_bst::OrderedMultiMap;
///
/// let tree = OrderedMultiMap::from([(5, "a"), (3, "b"), (8, "c")]);
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), 5);
/// assert_eq!(root.left().map(|node| node.key()), Some(3));
/// assert_eq!(root.right().map(|node| *node.value()), Some("c"));
/// ```
///
/// [`find`]: crate::OrderedMultiMap::find
/// [`find_min`]: crate::OrderedMultiMap::find_min
/// [`find_max`]: crate::OrderedMultiMap::find_max
/// [`root`]: crate::OrderedMultiMap::root
pub struct NodeRef<'a, V> {
    pub(crate) tree: &'a RawOrderedMultiMap<V>,
    pub(crate) handle: Handle,
}

impl<'a, V> NodeRef<'a, V> {
    /// Returns the entry's key.
    #[must_use]
    pub fn key(&self) -> Key {
        self.tree.node(self.handle).key()
    }

    /// Returns a reference to the entry's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.tree.node(self.handle).value()
    }

    /// Returns the root of the subtree holding smaller keys, if any.
    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a, V>> {
        self.tree.node(self.handle).left().map(|handle| NodeRef { tree: self.tree, handle })
    }

    /// Returns the root of the subtree holding equal or greater keys, if any.
    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a, V>> {
        self.tree.node(self.handle).right().map(|handle| NodeRef { tree: self.tree, handle })
    }
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("key", &self.key()).field("value", self.value()).finish()
    }
}

/// An exclusive view of one entry of an [`OrderedMultiMap`](crate::OrderedMultiMap).
///
/// Returned by [`find_mut`](crate::OrderedMultiMap::find_mut). The key cannot be
/// changed, since that could break the ordering of the tree, but the value can be
/// modified or the whole entry removed.
///
/// # Examples
///
/// ```
/// use multi_bst::OrderedMultiMap;
///
/// let mut tree = OrderedMultiMap::from([(1, 10), (1, 20)]);
///
/// *tree.find_mut(1)?.value_mut() += 1;
/// assert_eq!(*tree.find(1)?.value(), 11);
///
/// assert_eq!(tree.find_mut(1)?.remove(), 11);
/// assert_eq!(*tree.find(1)?.value(), 20);
/// # Ok::<(), multi_bst::Error>(())
/// ```
pub struct NodeMut<'a, V> {
    pub(crate) tree: &'a mut RawOrderedMultiMap<V>,
    pub(crate) handle: Handle,
}

impl<'a, V> NodeMut<'a, V> {
    /// Returns the entry's key.
    #[must_use]
    pub fn key(&self) -> Key {
        self.tree.node(self.handle).key()
    }

    /// Returns a reference to the entry's value.
    #[must_use]
    pub fn value(&self) -> &V {
        self.tree.node(self.handle).value()
    }

    /// Returns a mutable reference to the entry's value.
    pub fn value_mut(&mut self) -> &mut V {
        self.tree.node_mut(self.handle).value_mut()
    }

    /// Converts the view into a mutable reference bound to the container's borrow.
    #[must_use]
    pub fn into_mut(self) -> &'a mut V {
        let NodeMut { tree, handle } = self;
        tree.node_mut(handle).value_mut()
    }

    /// Sets the entry's value, returning the old one.
    pub fn replace(&mut self, value: V) -> V {
        mem::replace(self.value_mut(), value)
    }

    /// Removes the entry from the container, returning its value.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn remove(self) -> V {
        self.tree.remove_handle(self.handle)
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeMut<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut").field("key", &self.key()).field("value", self.value()).finish()
    }
}
