use super::OrderedMultiMap;
use crate::raw::RawOrderedMultiMap;

impl<V> OrderedMultiMap<V> {
    /// Creates an empty container with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let tree: OrderedMultiMap<u8> = OrderedMultiMap::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMultiMap {
            raw: RawOrderedMultiMap::with_capacity(capacity),
        }
    }

    /// Returns how many entries the container can hold before it reallocates,
    /// counting slots already in use.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries.
    ///
    /// Slots freed by earlier removals count towards the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use multi_bst::OrderedMultiMap;
    ///
    /// let mut tree = OrderedMultiMap::from([(1, 'a')]);
    /// tree.reserve(10);
    /// assert!(tree.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Releases as much unused storage as possible.
    ///
    /// Storage freed by removals in the middle of the node arena is kept for
    /// reuse by later insertions.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
