use crate::Key;

/// Failures reported by [`OrderedMultiMap`](crate::OrderedMultiMap) lookups and removals.
///
/// Every operation returning an `Error` leaves the container untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// The operation needs at least one entry but the container holds none.
    #[error("the container holds no entries")]
    EmptyContainer,

    /// No entry on the search path carries the requested key.
    #[error("no entry with key {0}")]
    NotFound(Key),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
