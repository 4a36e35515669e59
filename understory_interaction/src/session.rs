// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer sessions: one persistent primary session plus pooled touch sessions.
//!
//! Touch sessions live in an arena of slots. A slot is always in exactly one of two places: the
//! free list, or mapped to a single active [`TouchId`]. Ending a touch returns its slot to the
//! free list; the next touch start pops it again instead of allocating.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::data::InteractionData;
use crate::types::{PointerId, TouchId};

/// Owner of all pointer sessions.
#[derive(Clone, Debug)]
pub struct SessionPool<K, E> {
    primary: InteractionData<K, E>,
    slots: Vec<InteractionData<K, E>>,
    free: Vec<usize>,
    active: HashMap<TouchId, usize>,
}

impl<K, E> Default for SessionPool<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> SessionPool<K, E> {
    /// Create a pool holding only the primary session.
    pub fn new() -> Self {
        Self {
            primary: InteractionData::new(PointerId::Primary),
            slots: Vec::new(),
            free: Vec::new(),
            active: HashMap::new(),
        }
    }

    /// The primary (mouse) session.
    pub fn primary(&self) -> &InteractionData<K, E> {
        &self.primary
    }

    /// The primary (mouse) session, mutably.
    pub fn primary_mut(&mut self) -> &mut InteractionData<K, E> {
        &mut self.primary
    }

    /// Start a session for `id`, reusing a pooled slot when one is free.
    ///
    /// If `id` already has a live session it is returned as is; a touch identifier never maps to
    /// two sessions. The returned session keeps whatever position and event it last held, so
    /// callers overwrite both before use.
    pub fn acquire(&mut self, id: TouchId) -> &mut InteractionData<K, E> {
        let slot = if let Some(&slot) = self.active.get(&id) {
            log::warn!("touch {id:?} started twice without ending; reusing its session");
            slot
        } else {
            let slot = match self.free.pop() {
                Some(slot) => slot,
                None => {
                    self.slots.push(InteractionData::new(PointerId::Touch(id)));
                    self.slots.len() - 1
                }
            };
            self.active.insert(id, slot);
            slot
        };
        let session = &mut self.slots[slot];
        session.pointer = PointerId::Touch(id);
        session.target = None;
        session
    }

    /// End the session for `id` and return its slot to the pool.
    ///
    /// Returns `false` if `id` had no live session.
    pub fn release(&mut self, id: TouchId) -> bool {
        match self.active.remove(&id) {
            Some(slot) => {
                self.free.push(slot);
                true
            }
            None => false,
        }
    }

    /// Live session for `id`.
    pub fn get(&self, id: TouchId) -> Option<&InteractionData<K, E>> {
        self.active.get(&id).map(|&slot| &self.slots[slot])
    }

    /// Live session for `id`, mutably.
    pub fn get_mut(&mut self, id: TouchId) -> Option<&mut InteractionData<K, E>> {
        let slot = *self.active.get(&id)?;
        self.slots.get_mut(slot)
    }

    /// Arena slot currently mapped to `id`.
    pub fn slot_of(&self, id: TouchId) -> Option<usize> {
        self.active.get(&id).copied()
    }

    /// Number of live touch sessions.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of pooled (free) touch sessions.
    pub fn pooled_len(&self) -> usize {
        self.free.len()
    }

    /// Number of touch sessions ever allocated.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    type Pool = SessionPool<u32, &'static str>;

    #[test]
    fn primary_always_exists() {
        let mut pool = Pool::new();
        assert_eq!(pool.primary().pointer, PointerId::Primary);
        pool.primary_mut().global = Point::new(1.0, 2.0);
        assert_eq!(pool.primary().global, Point::new(1.0, 2.0));
        assert_eq!(pool.allocated(), 0);
    }

    #[test]
    fn released_sessions_are_reused() {
        let mut pool = Pool::new();
        pool.acquire(TouchId(7)).global = Point::new(5.0, 5.0);
        let slot = pool.slot_of(TouchId(7));
        assert!(pool.release(TouchId(7)));
        assert_eq!(pool.pooled_len(), 1);
        assert!(pool.get(TouchId(7)).is_none());

        let reused = pool.acquire(TouchId(9));
        assert_eq!(reused.pointer, PointerId::Touch(TouchId(9)));
        reused.global = Point::new(1.0, 1.0);
        assert_eq!(pool.slot_of(TouchId(9)), slot);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.pooled_len(), 0);
        assert_eq!(pool.get(TouchId(9)).unwrap().global, Point::new(1.0, 1.0));
    }

    #[test]
    fn concurrent_touches_get_distinct_slots() {
        let mut pool = Pool::new();
        pool.acquire(TouchId(1));
        pool.acquire(TouchId(2));
        assert_eq!(pool.active_len(), 2);
        assert_ne!(pool.slot_of(TouchId(1)), pool.slot_of(TouchId(2)));

        assert!(pool.release(TouchId(1)));
        assert!(pool.get(TouchId(2)).is_some());
        assert!(!pool.release(TouchId(1)));
    }

    #[test]
    fn duplicate_start_keeps_a_single_mapping() {
        let mut pool = Pool::new();
        pool.acquire(TouchId(3));
        let first = pool.slot_of(TouchId(3));
        pool.acquire(TouchId(3));
        assert_eq!(pool.slot_of(TouchId(3)), first);
        assert_eq!(pool.active_len(), 1);
        assert_eq!(pool.allocated(), 1);
    }
}
