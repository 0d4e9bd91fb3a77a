//! Actor handles and their allocation.
//!
//! An [`ActorId`] is a slot index plus the slot's *generation*. Destroying an
//! actor bumps the generation of its slot, so handles kept by other behaviours
//! (a spawned spark emitter, a partner reference) go stale instead of silently
//! aliasing a new actor.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// A generational actor handle. Orders by generation, then index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId {
    generation: u32,
    index: u32,
}

impl ActorId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { generation, index }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({self})")
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// ---------------------------------------------------------------------------
// ActorAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    generation: u32,
    occupied: bool,
}

/// Hands out [`ActorId`]s and recycles released slots oldest-first.
#[derive(Debug, Default)]
pub struct ActorAllocator {
    slots: Vec<SlotState>,
    recycled: VecDeque<u32>,
    live: usize,
}

impl ActorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ActorId {
        self.live += 1;
        match self.recycled.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.occupied = true;
                ActorId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(SlotState {
                    generation: 0,
                    occupied: true,
                });
                ActorId::new(index, 0)
            }
        }
    }

    /// Free the slot behind `id`. Returns `false` for a stale handle.
    pub fn release(&mut self, id: ActorId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = &mut self.slots[id.index as usize];
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.recycled.push_back(id.index);
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.occupied && slot.generation == id.generation)
    }

    /// The live handle occupying slot `index`, if any.
    pub fn current(&self, index: u32) -> Option<ActorId> {
        self.slots
            .get(index as usize)
            .filter(|slot| slot.occupied)
            .map(|slot| ActorId::new(index, slot.generation))
    }

    pub fn alive_count(&self) -> usize {
        self.live
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
