mod arena;
mod handle;
mod node;
mod raw_ordered_multimap;

pub(crate) use handle::Handle;
pub(crate) use node::Side;
pub(crate) use raw_ordered_multimap::RawOrderedMultiMap;
