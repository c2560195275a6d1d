use crate::Key;

use super::handle::Handle;

/// Which child link of a node to follow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// Direction taken from a node keyed `node_key` when looking for `key`.
    ///
    /// Strictly smaller keys go left; equal keys go right, so duplicates
    /// accumulate below their first occurrence.
    #[inline]
    pub(crate) fn toward(key: Key, node_key: Key) -> Self {
        if key < node_key { Side::Left } else { Side::Right }
    }
}

/// A single entry of the tree.
#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    key: Key,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<V> Node<V> {
    /// Creates a detached leaf.
    pub(crate) fn new(key: Key, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> Key {
        self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consumes the node, returning its value.
    pub(crate) fn into_value(self) -> V {
        self.value
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_go_right() {
        assert_eq!(Side::toward(3, 5), Side::Left);
        assert_eq!(Side::toward(5, 5), Side::Right);
        assert_eq!(Side::toward(8, 5), Side::Right);
        assert_eq!(Side::toward(0, 0), Side::Right);
    }

    #[test]
    fn child_links_by_side() {
        let mut node = Node::new(5, "a");
        assert_eq!((node.left(), node.right()), (None, None));

        node.set_child(Side::Left, Some(Handle::from_index(1)));
        node.set_child(Side::Right, Some(Handle::from_index(2)));
        assert_eq!(node.left(), Some(Handle::from_index(1)));
        assert_eq!(node.child(Side::Right), Some(Handle::from_index(2)));

        node.set_child(Side::Left, None);
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.key(), 5);
        assert_eq!(node.into_value(), "a");
    }
}
