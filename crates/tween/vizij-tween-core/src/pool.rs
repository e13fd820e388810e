//! Typed object pools with generational handles.
//!
//! Engine-owned records (script instances, property animations) live in a `Pool<T>`.
//! `free` resets the record to its defaults and bumps the slot generation, so a handle
//! kept past `free` no longer resolves. Double frees are reported as `PoolError` and
//! counted; `check_consistency` cross-checks the counters in tests and debug tooling.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Records stored in a pool. `reset` must bring every field back to its documented
/// default; the default implementation replaces the value wholesale.
pub trait Poolable: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Handle into a `Pool<T>`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

/// Allocation counters, kept in release builds too (they are a handful of integers).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Instances built with `T::default()` (fresh or pre-sized).
    pub constructed: u64,
    pub allocs: u64,
    /// Allocations served from the free list.
    pub reused: u64,
    pub frees: u64,
    /// Rejected frees (double free or stale handle).
    pub misuse: u64,
}

impl PoolStats {
    #[inline]
    pub fn live(&self) -> u64 {
        self.allocs - self.frees
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    generation: u32,
    live: bool,
}

#[derive(Debug)]
pub struct Pool<T: Poolable> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    stats: PoolStats,
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            stats: PoolStats::default(),
        }
    }

    /// Pre-size the pool with `capacity` default instances on the free list.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            stats: PoolStats::default(),
        };
        pool.slots.extend((0..capacity).map(|_| Slot {
            value: T::default(),
            generation: 0,
            live: false,
        }));
        // Pop order hands out low indices first.
        pool.free.extend((0..capacity as u32).rev());
        pool.stats.constructed = capacity as u64;
        pool
    }

    /// Take an instance from the free list (already reset) or construct a new one.
    pub fn alloc(&mut self) -> Handle<T> {
        self.stats.allocs += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.live = true;
            self.stats.reused += 1;
            return Handle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            value: T::default(),
            generation: 0,
            live: true,
        });
        self.stats.constructed += 1;
        Handle::new(index, 0)
    }

    /// Reset the instance and return it to the free list.
    pub fn free(&mut self, handle: Handle<T>) -> Result<(), PoolError> {
        let Some(slot) = self.live_slot_mut(handle) else {
            self.stats.misuse += 1;
            log::error!("pool: rejected free of {handle:?} (double free or stale handle)");
            return Err(PoolError::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            });
        };
        slot.value.reset();
        slot.generation = slot.generation.wrapping_add(1);
        slot.live = false;
        self.free.push(handle.index);
        self.stats.frees += 1;
        Ok(())
    }

    #[inline]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.live && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.live_slot_mut(handle).map(|s| &mut s.value)
    }

    #[inline]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total slots ever constructed (live + free).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Collect live handles into `out` (cleared first).
    pub fn collect_handles(&self, out: &mut Vec<Handle<T>>) {
        out.clear();
        out.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.live)
                .map(|(i, s)| Handle::new(i as u32, s.generation)),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live)
            .map(|(i, s)| (Handle::new(i as u32, s.generation), &s.value))
    }

    /// Cross-check live flags, free list and counters.
    pub fn check_consistency(&self) -> Result<(), PoolError> {
        let live = self.slots.iter().filter(|s| s.live).count();
        if live as u64 != self.stats.live() {
            return Err(PoolError::Inconsistent(format!(
                "{live} live slots but counters say {}",
                self.stats.live()
            )));
        }
        if live + self.free.len() != self.slots.len() {
            return Err(PoolError::Inconsistent(format!(
                "{live} live + {} free != {} slots",
                self.free.len(),
                self.slots.len()
            )));
        }
        for &index in &self.free {
            match self.slots.get(index as usize) {
                Some(slot) if !slot.live => {}
                _ => {
                    return Err(PoolError::Inconsistent(format!(
                        "free list holds live or missing slot {index}"
                    )))
                }
            }
        }
        Ok(())
    }

    fn live_slot_mut(&mut self, handle: Handle<T>) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.live && s.generation == handle.generation)
    }
}

impl<T: Poolable + Clone> Pool<T> {
    /// Deep-copy a live instance into a fresh allocation.
    pub fn duplicate(&mut self, handle: Handle<T>) -> Option<Handle<T>> {
        let source = self.get(handle)?.clone();
        let copy = self.alloc();
        if let Some(slot) = self.get_mut(copy) {
            *slot = source;
        }
        Some(copy)
    }
}
