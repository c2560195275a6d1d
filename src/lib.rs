//! An unbalanced binary search tree multimap keyed by unsigned integers.
//!
//! This crate provides [`OrderedMultiMap`], an ordered container in which several
//! entries may share the same [`Key`]:
//!
//! - [`insert`](OrderedMultiMap::insert) always adds a new entry, even for a key already present
//! - [`find`](OrderedMultiMap::find) returns the matching entry nearest the root
//! - [`find_min`](OrderedMultiMap::find_min) / [`find_max`](OrderedMultiMap::find_max) return the
//!   entries with the smallest and largest keys
//! - [`remove_first`](OrderedMultiMap::remove_first) removes one matching entry,
//!   [`remove_all`](OrderedMultiMap::remove_all) removes every one of them
//!
//! # Example
//!
//! ```
//! use multi_bst::{Error, OrderedMultiMap};
//!
//! let mut tree = OrderedMultiMap::new();
//! tree.insert(5, "a");
//! tree.insert(3, "b");
//! tree.insert(8, "c");
//! tree.insert(3, "d");
//! assert_eq!(tree.len(), 4);
//!
//! // The first "3" inserted sits nearer the root than the second.
//! assert_eq!(*tree.find(3)?.value(), "b");
//! assert_eq!(tree.find_min()?.key(), 3);
//! assert_eq!(tree.find_max()?.key(), 8);
//!
//! assert_eq!(tree.remove_all(3), 2);
//! assert_eq!(tree.find(3).unwrap_err(), Error::NotFound(3));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Implementation
//!
//! The tree never rebalances: its shape, and therefore the cost of every operation,
//! depends only on insertion order. Keys smaller than a node's key go to its left,
//! equal or greater keys go to its right, so duplicates line up below their first
//! occurrence. Nodes live in an arena and every traversal is a loop, so even a
//! tree built from sorted keys (a single long path) cannot exhaust the stack.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod ordered_multimap;

pub use error::{Error, Result};
pub use ordered_multimap::OrderedMultiMap;

/// The key type of every entry.
pub type Key = usize;
