//! Dense, id-indexed storage for design entities.
//!
//! Signals, processes, and ROM declarations all live in an [`Arena`] and are
//! addressed by a small integer id, never by pointer.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque id types used as arena keys.
///
/// Implementors provide a bijection between `u32` indices and the id type.
pub trait ArenaId: Copy {
    /// Creates an id from a raw index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw index.
    fn as_raw(self) -> u32;
}

/// An append-only table keyed by `I`.
///
/// Items are never reordered or removed, so ids stay valid for the lifetime
/// of the arena and iteration order equals declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends an item and returns its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns the id the next [`alloc`](Self::alloc) will hand out.
    pub fn next_id(&self) -> I {
        I::from_raw(self.items.len() as u32)
    }

    /// Returns the item with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns the item with the given id, or `None` if it is out of bounds.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.as_raw() as usize)
    }

    /// Returns a mutable reference to the item with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns `true` if `id` addresses an allocated item.
    pub fn contains(&self, id: I) -> bool {
        (id.as_raw() as usize) < self.items.len()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(id, &item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over item references in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SignalId;

    #[test]
    fn alloc_and_get() {
        let mut arena: Arena<SignalId, &str> = Arena::new();
        let id = arena.alloc("clk");
        assert_eq!(arena[id], "clk");
        assert_eq!(id.as_raw(), 0);
    }

    #[test]
    fn next_id_tracks_alloc() {
        let mut arena: Arena<SignalId, u32> = Arena::new();
        let predicted = arena.next_id();
        let actual = arena.alloc(7);
        assert_eq!(predicted, actual);
        assert_eq!(arena.next_id(), SignalId::from_raw(1));
    }

    #[test]
    fn try_get_out_of_bounds() {
        let mut arena: Arena<SignalId, u32> = Arena::new();
        arena.alloc(1);
        assert_eq!(arena.try_get(SignalId::from_raw(0)), Some(&1));
        assert!(arena.try_get(SignalId::from_raw(5)).is_none());
        assert!(!arena.contains(SignalId::from_raw(1)));
    }

    #[test]
    fn get_mut_modifies() {
        let mut arena: Arena<SignalId, u32> = Arena::new();
        let id = arena.alloc(1);
        *arena.get_mut(id) = 2;
        assert_eq!(arena[id], 2);
    }

    #[test]
    fn iter_in_declaration_order() {
        let mut arena: Arena<SignalId, &str> = Arena::new();
        arena.alloc("a");
        arena.alloc("b");
        let ids: Vec<u32> = arena.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1]);
        let vals: Vec<&str> = arena.values().copied().collect();
        assert_eq!(vals, vec!["a", "b"]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut arena: Arena<SignalId, String> = Arena::new();
        arena.alloc("first".to_string());
        arena.alloc("second".to_string());
        let json = serde_json::to_string(&arena).unwrap();
        let restored: Arena<SignalId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[SignalId::from_raw(1)], "second");
    }
}
