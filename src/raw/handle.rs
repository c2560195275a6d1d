use core::num::NonZero;

// A narrow index in unit tests makes arena exhaustion reachable.
#[cfg(test)]
type Index = u16;
#[cfg(not(test))]
type Index = u32;

/// Stable reference to a node slot in an [`Arena`](super::arena::Arena).
///
/// Stored as `index + 1` so that `Option<Handle>` costs nothing over a bare index,
/// which keeps the two child links of every node compact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Index>);

impl Handle {
    pub(crate) const MAX: usize = (Index::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        match NonZero::new((index + 1) as Index) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
