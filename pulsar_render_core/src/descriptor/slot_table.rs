/// DescriptorSlotTable - bounded shader-visible descriptor heap with a
/// per-frame view-identity cache
///
/// The table owns every slot of the heap. At any time at most one ring
/// segment (a contiguous sub-range) is active; producers allocate out of it
/// through `acquire`. Binding the same view identity twice within a frame
/// returns the already-assigned slot instead of burning a second one.

use std::sync::Mutex;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::descriptor::slot::{DescriptorSlot, SlotIndex, ViewIdentity};

/// Descriptor allocation counters
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorStats {
    /// Slots handed out (cache misses that allocated)
    pub allocations: u64,
    /// Acquires satisfied from the per-frame cache
    pub cache_hits: u64,
    /// Acquires rejected with CapacityExceeded
    pub capacity_drops: u64,
}

/// Active segment scope: cursor + cache, reset every generation
struct ActiveScope {
    base: u32,
    capacity: u32,
    cursor: u32,
    generation: u64,
    /// View identity -> slot assigned this generation
    cache: FxHashMap<ViewIdentity, SlotIndex>,
    /// CapacityExceeded is logged once per frame, not per occurrence
    exhaustion_logged: bool,
}

struct TableState {
    slots: Vec<DescriptorSlot>,
    active: Option<ActiveScope>,
    stats: DescriptorStats,
}

/// Bounded table of GPU-visible descriptor slots
///
/// Internally synchronized: any number of producer threads may call
/// `acquire` concurrently while recording. The lock guards only the active
/// segment's cursor and cache map and is never held across a blocking call.
pub struct DescriptorSlotTable {
    state: Mutex<TableState>,
    heap_size: u32,
}

impl DescriptorSlotTable {
    /// Create a table covering a heap of `heap_size` slots
    pub fn new(heap_size: u32) -> Self {
        Self {
            state: Mutex::new(TableState {
                slots: vec![DescriptorSlot::default(); heap_size as usize],
                active: None,
                stats: DescriptorStats::default(),
            }),
            heap_size,
        }
    }

    /// Total number of slots in the heap
    pub fn heap_size(&self) -> u32 {
        self.heap_size
    }

    /// Scope the table to a fresh segment for a new frame generation
    ///
    /// Clears the view cache and resets the bump cursor to the segment base.
    /// Called by the frame lifecycle after the segment's previous occupant
    /// generation is confirmed complete on the GPU.
    pub fn activate(&self, base: u32, capacity: u32, generation: u64) -> Result<()> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(Error::InvalidState(
                "descriptor table already scoped to an active frame".to_string(),
            ));
        }
        debug_assert!(base
            .checked_add(capacity)
            .is_some_and(|end| end <= self.heap_size));
        state.active = Some(ActiveScope {
            base,
            capacity,
            cursor: base,
            generation,
            cache: FxHashMap::default(),
            exhaustion_logged: false,
        });
        Ok(())
    }

    /// Acquire a slot for `identity` within the active generation
    ///
    /// Returns the previously assigned slot on a cache hit; otherwise
    /// allocates the next free slot of the active segment and records the
    /// binding.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` when the segment's slot range is exhausted.
    ///   Callers must treat this as fatal for the remaining draws of the
    ///   frame (skip them) rather than corrupting the heap.
    /// - `InvalidState` when no frame is active.
    pub fn acquire(&self, identity: ViewIdentity) -> Result<SlotIndex> {
        let mut guard = self.lock();
        let TableState { slots, active, stats } = &mut *guard;
        let scope = active.as_mut().ok_or_else(|| {
            Error::InvalidState("acquire called outside an active frame".to_string())
        })?;

        if let Some(&slot) = scope.cache.get(&identity) {
            stats.cache_hits += 1;
            return Ok(slot);
        }

        if scope.cursor >= scope.base + scope.capacity {
            stats.capacity_drops += 1;
            if !scope.exhaustion_logged {
                scope.exhaustion_logged = true;
                crate::render_warn!(
                    "pulsar::SlotTable",
                    "Descriptor capacity exhausted ({} slots) in generation {}; dropping remaining draws this frame",
                    scope.capacity,
                    scope.generation
                );
            }
            return Err(Error::CapacityExceeded {
                capacity: scope.capacity,
                generation: scope.generation,
            });
        }

        let slot = SlotIndex(scope.cursor);
        scope.cursor += 1;
        slots[slot.0 as usize] = DescriptorSlot {
            bound: Some(identity),
            generation: scope.generation,
        };
        scope.cache.insert(identity, slot);
        stats.allocations += 1;
        Ok(slot)
    }

    /// Release the active generation's scope
    ///
    /// Clears every cache entry scoped to that generation and returns the
    /// number of slots it used (the segment's high-water mark). Cross-frame
    /// slot reuse is deliberately disallowed: a resource's bound view may
    /// change between frames, so the cache never outlives its generation.
    pub fn release(&self, generation: u64) -> Result<u32> {
        let mut state = self.lock();
        match state.active.take() {
            Some(scope) if scope.generation == generation => Ok(scope.cursor - scope.base),
            Some(scope) => {
                // Wrong generation: restore and report
                let active_generation = scope.generation;
                state.active = Some(scope);
                Err(Error::InvalidState(format!(
                    "release for generation {} but generation {} is active",
                    generation, active_generation
                )))
            }
            None => Err(Error::InvalidState(
                "release called with no active frame".to_string(),
            )),
        }
    }

    /// Generation tag currently recorded for a heap slot (test/debug aid)
    pub fn slot_generation(&self, slot: SlotIndex) -> u64 {
        self.lock().slots[slot.0 as usize].generation
    }

    /// Snapshot of the allocation counters
    pub fn stats(&self) -> DescriptorStats {
        self.lock().stats
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TableState> {
        // Descriptor state stays consistent even if a producer panicked
        // mid-acquire; recover the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_table_tests.rs"]
mod tests;
