//! Mark-and-sweep cell heap.
//!
//! Cells are kept alive by being reachable from rooted cells through traced edges.
//! Collection runs when the number of allocations since the previous cycle reaches
//! the threshold, or when an allocation would push the heap past its byte budget.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{HostError, HostResult};

// ============================================================================
// CellId - stable index of a cell in the arena
// ============================================================================

/// Index of a cell in the arena.
///
/// Ids are reused after their cell is swept, so an id held past the point where
/// its cell became unreachable may name an unrelated cell. Rooting is what makes
/// an id safe to hold.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CellId(u32);

impl CellId {
    pub const fn new(index: u32) -> Self {
        CellId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn chunk(self) -> usize {
        self.index() / CHUNK_CAPACITY
    }

    fn offset(self) -> usize {
        self.index() % CHUNK_CAPACITY
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// ChunkBitmask - 256-bit mark set for one chunk
// ============================================================================

/// Slots per chunk. 256 = 4 × 64 bits, matching `ChunkBitmask`.
const CHUNK_CAPACITY: usize = 256;

/// Default collection threshold: collect after this many allocations
pub const DEFAULT_GC_THRESHOLD: usize = 100;

/// 256-bit bitmask for marking the slots of one chunk
#[derive(Clone, Copy, Default)]
struct ChunkBitmask {
    bits: [u64; 4],
}

impl ChunkBitmask {
    #[inline]
    fn set(&mut self, index: usize) {
        debug_assert!(index < CHUNK_CAPACITY);
        if let Some(word) = self.bits.get_mut(index >> 6) {
            *word |= 1 << (index & 63);
        }
    }

    #[inline]
    fn get(&self, index: usize) -> bool {
        debug_assert!(index < CHUNK_CAPACITY);
        self.bits
            .get(index >> 6)
            .is_some_and(|word| word & (1 << (index & 63)) != 0)
    }

    #[inline]
    fn clear(&mut self) {
        self.bits = [0; 4];
    }

    /// Iterate over unmarked indices up to `len`
    fn iter_unmarked(&self, len: usize) -> UnmarkedIter {
        UnmarkedIter {
            bits: self.bits,
            len,
            word: 0,
            current: !self.bits.first().copied().unwrap_or(u64::MAX),
        }
    }
}

/// Iterator over the zero bits of a `ChunkBitmask`
struct UnmarkedIter {
    bits: [u64; 4],
    len: usize,
    word: usize,
    /// Inverted bits of the current word (1 = unmarked)
    current: u64,
}

impl Iterator for UnmarkedIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let index = (self.word << 6) + self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                if index < self.len {
                    return Some(index);
                }
                return None;
            }

            self.word += 1;
            if self.word >= 4 || (self.word << 6) >= self.len {
                return None;
            }
            self.current = !self.bits.get(self.word).copied().unwrap_or(u64::MAX);
        }
    }
}

// ============================================================================
// Trace - edges and size of a cell
// ============================================================================

/// Trait for cell types stored in the arena.
pub trait Trace {
    /// Visit every cell this one holds a strong edge to.
    fn trace<F: FnMut(CellId)>(&self, visitor: F);

    /// Payload bytes charged against the heap's byte budget while this cell lives.
    fn heap_size(&self) -> usize;
}

// ============================================================================
// Arena
// ============================================================================

/// Statistics about the heap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeapStatistics {
    /// Cells currently allocated
    pub live_cells: usize,
    /// Swept slots waiting for reuse
    pub free_cells: usize,
    /// Distinct cells with at least one root
    pub rooted_cells: usize,
    /// Payload bytes charged against the budget
    pub used_bytes: usize,
    /// Byte budget, if any
    pub byte_limit: Option<usize>,
    /// Completed collection cycles
    pub collections: usize,
}

/// Arena of traced cells with root counting and mark-and-sweep collection.
pub struct Arena<T: Trace> {
    /// Fixed-capacity chunks of slots. `None` marks a free slot.
    chunks: Vec<Vec<Option<T>>>,

    /// One mark bitmask per chunk
    marked_chunks: Vec<ChunkBitmask>,

    /// Swept slots available for reuse
    free_list: Vec<CellId>,

    /// Root counts; a cell is a root while its count is non-zero
    roots: FxHashMap<CellId, usize>,

    /// Mark stack kept between cycles to preserve its capacity
    mark_stack: Vec<CellId>,

    allocs_since_gc: usize,

    /// Allocations between automatic collections (0 = never)
    gc_threshold: usize,

    used_bytes: usize,
    byte_limit: Option<usize>,
    collections: usize,
}

impl<T: Trace> Arena<T> {
    pub fn new(gc_threshold: usize, byte_limit: Option<usize>) -> Self {
        Self {
            chunks: Vec::new(),
            marked_chunks: Vec::new(),
            free_list: Vec::new(),
            roots: FxHashMap::default(),
            mark_stack: Vec::new(),
            allocs_since_gc: 0,
            gc_threshold,
            used_bytes: 0,
            byte_limit,
            collections: 0,
        }
    }

    /// Allocate a cell.
    ///
    /// May run a collection first, so every cell the caller still needs must be
    /// rooted or reachable from a root.
    pub fn alloc(&mut self, cell: T) -> HostResult<CellId> {
        let bytes = cell.heap_size();
        self.alloc_with(bytes, || Ok(cell))
    }

    /// Allocate a cell whose payload is built only once `bytes` have been
    /// charged, so an over-budget request fails before any memory is touched.
    pub fn alloc_with<F>(&mut self, bytes: usize, build: F) -> HostResult<CellId>
    where
        F: FnOnce() -> HostResult<T>,
    {
        if self.gc_threshold > 0 && self.allocs_since_gc >= self.gc_threshold {
            self.collect();
        }
        self.reserve(bytes)?;
        let cell = match build() {
            Ok(cell) => cell,
            Err(err) => {
                self.release(bytes);
                return Err(err);
            }
        };
        debug_assert_eq!(cell.heap_size(), bytes);
        self.allocs_since_gc += 1;
        Ok(self.insert(cell))
    }

    /// Charge `bytes` against the budget, collecting once if they don't fit.
    /// The total never wraps: a request that would overflow the counter fails
    /// even without a limit, so `release` only undoes what was added.
    pub fn reserve(&mut self, bytes: usize) -> HostResult<()> {
        let total = match self.charge(bytes) {
            Some(total) => total,
            None => {
                self.collect();
                self.charge(bytes)
                    .ok_or_else(|| self.out_of_memory(bytes))?
            }
        };
        self.used_bytes = total;
        Ok(())
    }

    /// Return `bytes` to the budget
    pub fn release(&mut self, bytes: usize) {
        self.used_bytes = self.used_bytes.saturating_sub(bytes);
    }

    /// Bytes in use after charging `bytes`, if that fits
    fn charge(&self, bytes: usize) -> Option<usize> {
        let total = self.used_bytes.checked_add(bytes)?;
        match self.byte_limit {
            Some(limit) if total > limit => None,
            _ => Some(total),
        }
    }

    /// The error for a request of `bytes` that can't be satisfied now
    pub fn out_of_memory(&self, bytes: usize) -> HostError {
        HostError::OutOfMemory {
            requested: bytes,
            used: self.used_bytes,
            limit: self.byte_limit.unwrap_or(usize::MAX),
        }
    }

    fn insert(&mut self, cell: T) -> CellId {
        if let Some(id) = self.free_list.pop() {
            if let Some(slot) = self.slot_mut(id) {
                *slot = Some(cell);
                return id;
            }
        }

        if self
            .chunks
            .last()
            .is_none_or(|chunk| chunk.len() >= CHUNK_CAPACITY)
        {
            self.chunks.push(Vec::with_capacity(CHUNK_CAPACITY));
            self.marked_chunks.push(ChunkBitmask::default());
        }

        let chunk_idx = self.chunks.len().saturating_sub(1);
        let mut index = chunk_idx * CHUNK_CAPACITY;
        if let Some(chunk) = self.chunks.last_mut() {
            index += chunk.len();
            chunk.push(Some(cell));
        }
        CellId(index as u32)
    }

    fn slot(&self, id: CellId) -> Option<&Option<T>> {
        self.chunks.get(id.chunk())?.get(id.offset())
    }

    fn slot_mut(&mut self, id: CellId) -> Option<&mut Option<T>> {
        self.chunks.get_mut(id.chunk())?.get_mut(id.offset())
    }

    pub fn get(&self, id: CellId) -> Option<&T> {
        self.slot(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut T> {
        self.slot_mut(id)?.as_mut()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.get(id).is_some()
    }

    pub fn add_root(&mut self, id: CellId) {
        *self.roots.entry(id).or_insert(0) += 1;
    }

    pub fn remove_root(&mut self, id: CellId) {
        let Some(count) = self.roots.get_mut(&id) else {
            tracing::warn!(cell = %id, "removing a root that was never added");
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.roots.remove(&id);
        }
    }

    /// Run a full mark-and-sweep cycle. Returns the number of cells swept.
    pub fn collect(&mut self) -> usize {
        self.mark();
        let (swept, freed_bytes) = self.sweep();
        self.release(freed_bytes);
        self.allocs_since_gc = 0;
        self.collections += 1;
        tracing::trace!(
            swept,
            freed_bytes,
            live = self.live_cells(),
            "collection finished"
        );
        swept
    }

    fn mark(&mut self) {
        for bitmask in &mut self.marked_chunks {
            bitmask.clear();
        }

        let mut stack = std::mem::take(&mut self.mark_stack);
        stack.clear();
        stack.extend(self.roots.keys().copied());

        while let Some(id) = stack.pop() {
            let Some(bitmask) = self.marked_chunks.get_mut(id.chunk()) else {
                continue;
            };
            if bitmask.get(id.offset()) {
                continue;
            }
            bitmask.set(id.offset());

            let cell = self
                .chunks
                .get(id.chunk())
                .and_then(|chunk| chunk.get(id.offset()))
                .and_then(Option::as_ref);
            if let Some(cell) = cell {
                cell.trace(|child| stack.push(child));
            }
        }

        self.mark_stack = stack;
    }

    /// Free every unmarked live slot. Returns (cells swept, bytes freed).
    fn sweep(&mut self) -> (usize, usize) {
        let mut swept = 0;
        let mut freed_bytes = 0;
        let free_list = &mut self.free_list;

        for (chunk_idx, (chunk, bitmask)) in self
            .chunks
            .iter_mut()
            .zip(self.marked_chunks.iter())
            .enumerate()
        {
            for offset in bitmask.iter_unmarked(chunk.len()) {
                let Some(slot) = chunk.get_mut(offset) else {
                    continue;
                };
                if let Some(cell) = slot.take() {
                    freed_bytes += cell.heap_size();
                    swept += 1;
                    free_list.push(CellId((chunk_idx * CHUNK_CAPACITY + offset) as u32));
                }
            }
        }

        (swept, freed_bytes)
    }

    fn live_cells(&self) -> usize {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        total - self.free_list.len()
    }

    pub fn statistics(&self) -> HeapStatistics {
        HeapStatistics {
            live_cells: self.live_cells(),
            free_cells: self.free_list.len(),
            rooted_cells: self.roots.len(),
            used_bytes: self.used_bytes,
            byte_limit: self.byte_limit,
            collections: self.collections,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
