//! Depot Module
//!
//! In-memory string-keyed object store.
//!
//! ## Responsibilities
//! - Conflict / not-found checked mutation
//! - Eager encodability check on insert and update
//! - Export, bulk load and serialization through the active [`Format`](crate::codec::Format)
//! - Alive / destroyed lifecycle gating every operation
//!
//! ## Data Structure Choice
//! Using BTreeMap for the mapping:
//! - Deterministic iteration order (stable serialized output)
//! - No internal locking; callers serialize concurrent access themselves

mod store;

use std::collections::BTreeMap;

pub use store::Depot;

/// Lifecycle of a depot instance
///
/// `Destroyed` is terminal: there is no transition out of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
    /// Usable, holding the current mapping
    Alive(BTreeMap<String, T>),

    /// Permanently invalidated
    Destroyed,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Lifecycle::Alive(BTreeMap::new())
    }
}
