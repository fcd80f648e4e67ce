//! Memory organization and filling algorithm for Argon2.
//!
//! Memory is a matrix of lanes (rows) and columns, each cell holding one
//! 1024-byte block. Every lane is cut into 4 slices; the segment of a lane
//! within one slice can be filled independently of the other lanes, which
//! is what makes Argon2 parallel.
//!
//! Storage is a list of [`ZeroedBuffer`] chunks so that very large memory
//! costs do not require a single huge allocation. Indexing hides the chunk
//! boundaries and presents one contiguous sequence of blocks.

use std::collections::TryReserveError;
use std::marker::PhantomData;

use tracing::{trace, warn};

use super::block::{AddressGenerator, Block, BLOCK_WORDS};
use super::core::Argon2Error;
use super::params::{Argon2Config, SYNC_POINTS, Variant, Version};
use super::reference::{Position, reference_index, reference_lane};
use crate::primitives::ZeroedBuffer;

/// Memory layout parameters for Argon2.
///
/// - Total memory is divided into `lanes` independent rows.
/// - Each lane contains `lane_len` blocks.
/// - Each lane is divided into 4 slices (sync points).
/// - Each slice contains `segment_len` blocks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MemoryLayout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

impl MemoryLayout {
    pub(crate) fn new(config: &Argon2Config) -> Self {
        let lanes = config.lanes;
        let total_blocks = config.memory_blocks();
        let lane_len = total_blocks / lanes;
        let segment_len = lane_len / SYNC_POINTS;

        Self {
            lanes,
            lane_len,
            segment_len,
            total_blocks,
        }
    }

    #[inline]
    pub(crate) fn index(&self, lane: u32, index_in_lane: u32) -> usize {
        lane as usize * self.lane_len as usize + index_in_lane as usize
    }
}

/// Block storage, possibly split over several allocations.
pub(crate) struct BlockMemory {
    chunks: Vec<ZeroedBuffer<Block>>,
    chunk_len: usize,
    len: usize,
}

impl BlockMemory {
    /// Allocates `total_blocks` zeroed blocks in chunks of at most
    /// `max_chunk_blocks`.
    ///
    /// On failure, chunks allocated so far are released before the error
    /// is returned.
    pub(crate) fn allocate(
        total_blocks: usize,
        max_chunk_blocks: usize,
        lanes: u32,
    ) -> Result<Self, Argon2Error> {
        let (chunks, chunk_len) =
            allocate_chunks(total_blocks, max_chunk_blocks, lanes, ZeroedBuffer::try_new)?;

        Ok(Self {
            chunks,
            chunk_len,
            len: total_blocks,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub(crate) fn block(&self, index: usize) -> &Block {
        &self.chunks[index / self.chunk_len][index % self.chunk_len]
    }

    #[inline]
    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.chunks[index / self.chunk_len][index % self.chunk_len]
    }

    /// Zeroes every block.
    pub(crate) fn wipe(&mut self) {
        for chunk in &mut self.chunks {
            chunk.iter_mut().for_each(zeroize::Zeroize::zeroize);
        }
    }

    fn shared(&mut self) -> SharedBlocks<'_> {
        SharedBlocks {
            chunks: self
                .chunks
                .iter_mut()
                .map(|chunk| chunk.as_mut_slice().as_mut_ptr())
                .collect(),
            chunk_len: self.chunk_len,
            len: self.len,
            _memory: PhantomData,
        }
    }
}

/// Splits `total_blocks` into chunks of at most `max_chunk_blocks` and
/// obtains each one from `alloc`. Returns the chunks and the chunk length.
///
/// The first failure drops every chunk obtained so far and is reported
/// with its position.
fn allocate_chunks<C>(
    total_blocks: usize,
    max_chunk_blocks: usize,
    lanes: u32,
    mut alloc: impl FnMut(usize) -> Result<C, TryReserveError>,
) -> Result<(Vec<C>, usize), Argon2Error> {
    let chunk_len = max_chunk_blocks.clamp(1, total_blocks.max(1));
    let chunk_count = total_blocks.div_ceil(chunk_len);

    let mut chunks = Vec::with_capacity(chunk_count);
    for chunk in 0..chunk_count {
        let len = chunk_len.min(total_blocks - chunk * chunk_len);

        match alloc(len) {
            Ok(buffer) => chunks.push(buffer),
            Err(_) => {
                warn!(
                    requested_blocks = total_blocks,
                    lanes,
                    chunk,
                    chunk_count,
                    "argon2 working memory allocation failed"
                );
                drop(chunks);

                return Err(Argon2Error::OutOfMemory {
                    requested_blocks: total_blocks,
                    lanes,
                    chunk,
                    chunk_count,
                });
            }
        }
    }

    Ok((chunks, chunk_len))
}

/// View of [`BlockMemory`] shared between the lane workers of one slice.
///
/// Within a slice each worker writes only the blocks of its own segments and
/// reads blocks that were completed before the slice started, or earlier
/// blocks of its own segment. No block is ever written by one worker while
/// another accesses it.
struct SharedBlocks<'a> {
    chunks: Vec<*mut Block>,
    chunk_len: usize,
    len: usize,
    _memory: PhantomData<&'a mut BlockMemory>,
}

// SAFETY: access discipline is documented on the type; pointers stay valid
// for `'a` because the view mutably borrows the memory.
unsafe impl Send for SharedBlocks<'_> {}
unsafe impl Sync for SharedBlocks<'_> {}

impl SharedBlocks<'_> {
    #[inline]
    fn slot(&self, index: usize) -> *mut Block {
        assert!(index < self.len, "block index {index} out of range");
        // SAFETY: `index < len`, so the offset lies inside its chunk.
        unsafe { self.chunks[index / self.chunk_len].add(index % self.chunk_len) }
    }

    /// # Safety
    /// No thread may be writing block `index` for the lifetime of the
    /// returned reference.
    #[inline]
    unsafe fn get(&self, index: usize) -> &Block {
        unsafe { &*self.slot(index) }
    }

    /// # Safety
    /// The caller must be the only thread accessing block `index` for the
    /// lifetime of the returned reference.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn get_mut(&self, index: usize) -> &mut Block {
        unsafe { &mut *self.slot(index) }
    }
}

/// Per-computation constants needed while filling.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FillParams {
    pub passes: u32,
    pub variant: Variant,
    pub version: Version,
    pub threads: u32,
}

/// Fills all memory blocks over the configured number of passes.
///
/// Each pass iterates through the 4 slices in order. Within a slice every
/// lane fills one segment; with more than one thread the lanes are spread
/// over scoped workers, and the end of the scope is the barrier: the next
/// slice only starts once every lane has finished the current one.
pub(crate) fn fill(memory: &mut BlockMemory, layout: &MemoryLayout, params: FillParams) {
    let threads = params.threads.clamp(1, layout.lanes);
    let blocks = memory.shared();

    for pass in 0..params.passes {
        for slice in 0..SYNC_POINTS {
            if threads == 1 {
                for lane in 0..layout.lanes {
                    fill_segment(&blocks, layout, &params, pass, slice, lane);
                }
                continue;
            }

            std::thread::scope(|scope| {
                for worker in 0..threads {
                    let blocks = &blocks;
                    let params = &params;

                    scope.spawn(move || {
                        for lane in (worker..layout.lanes).step_by(threads as usize) {
                            fill_segment(blocks, layout, params, pass, slice, lane);
                        }
                    });
                }
            });
        }

        trace!(pass, "argon2 pass complete");
    }
}

/// Fills one segment (the part of a lane within a slice).
///
/// For each block position:
/// 1. take the pseudo-random value from the address generator or from the
///    first word of the previous block,
/// 2. derive the reference lane and index,
/// 3. write `G(previous, reference)`, XORed into the old contents on later
///    passes of version 1.3.
fn fill_segment(
    blocks: &SharedBlocks<'_>,
    layout: &MemoryLayout,
    params: &FillParams,
    pass: u32,
    slice: u32,
    lane: u32,
) {
    let mut addresses = params.variant.data_independent(pass, slice).then(|| {
        AddressGenerator::new(
            pass,
            lane,
            slice,
            layout.total_blocks,
            params.passes,
            params.variant,
        )
    });

    // The first two blocks of every lane are seeded from H0.
    let start = if pass == 0 && slice == 0 { 2 } else { 0 };
    if start != 0 {
        if let Some(generator) = addresses.as_mut() {
            generator.refresh();
        }
    }

    let accumulate = params.version == Version::V0x13 && pass > 0;

    for index in start..layout.segment_len {
        let index_in_lane = slice * layout.segment_len + index;
        let current = layout.index(lane, index_in_lane);
        let previous = if index_in_lane == 0 {
            layout.index(lane, layout.lane_len - 1)
        } else {
            current - 1
        };

        let pseudo_rand = match addresses.as_mut() {
            Some(generator) => {
                if index as usize % BLOCK_WORDS == 0 {
                    generator.refresh();
                }
                generator.address(index as usize)
            }
            // SAFETY: the previous block is either earlier in this segment
            // (written by this worker) or from a completed slice.
            None => unsafe { blocks.get(previous).0[0] },
        };

        let position = Position {
            pass,
            lane,
            slice,
            index,
        };
        let ref_lane = reference_lane(&position, layout.lanes, pseudo_rand);
        let ref_index = reference_index(&position, layout, pseudo_rand, ref_lane == lane);
        let reference = layout.index(ref_lane, ref_index);

        // SAFETY: `current` belongs to this worker's segment and differs
        // from `previous` and `reference`, both of which are finished
        // blocks no other worker writes during this slice.
        unsafe {
            blocks
                .get_mut(current)
                .fill(blocks.get(previous), blocks.get(reference), accumulate);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Chunk {
        len: usize,
        live: Rc<Cell<usize>>,
    }

    impl Drop for Chunk {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    fn reserve_error() -> TryReserveError {
        Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err()
    }

    #[test]
    fn allocate_chunks_splits_memory() {
        let live = Rc::new(Cell::new(0));
        let (chunks, chunk_len) = allocate_chunks(10, 4, 2, |len| {
            live.set(live.get() + 1);
            Ok(Chunk {
                len,
                live: Rc::clone(&live),
            })
        })
        .unwrap();

        assert_eq!(chunk_len, 4);
        assert_eq!(chunks.iter().map(|c| c.len).collect::<Vec<_>>(), [4, 4, 2]);
        assert_eq!(live.get(), 3);

        drop(chunks);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn allocate_chunks_failure_releases_earlier_chunks() {
        let live = Rc::new(Cell::new(0));
        let mut calls = 0;

        let result = allocate_chunks(10, 2, 4, |len| {
            calls += 1;
            if calls == 3 {
                return Err(reserve_error());
            }
            live.set(live.get() + 1);
            Ok(Chunk {
                len,
                live: Rc::clone(&live),
            })
        });

        match result {
            Err(Argon2Error::OutOfMemory {
                requested_blocks,
                lanes,
                chunk,
                chunk_count,
            }) => {
                assert_eq!(requested_blocks, 10);
                assert_eq!(lanes, 4);
                assert_eq!(chunk, 2);
                assert_eq!(chunk_count, 5);
            }
            Err(other) => panic!("expected out of memory, got {other:?}"),
            Ok(_) => panic!("expected out of memory, got chunks"),
        }

        assert_eq!(calls, 3, "allocation stops at the first failure");
        assert_eq!(live.get(), 0, "earlier chunks were not released");
    }

    #[test]
    fn block_memory_allocation_failure_is_reported() {
        let err = BlockMemory::allocate(usize::MAX / 2, usize::MAX, 1).err().unwrap();
        assert!(matches!(err, Argon2Error::OutOfMemory { chunk: 0, chunk_count: 1, .. }));
    }

    #[test]
    fn block_memory_indexes_across_chunks() {
        let mut memory = BlockMemory::allocate(10, 3, 1).unwrap();
        assert_eq!(memory.chunk_count(), 4);

        memory.block_mut(7).0[0] = 7;
        assert_eq!(memory.block(7).0[0], 7);
        assert_eq!(memory.chunks[2][1].0[0], 7);

        memory.wipe();
        assert_eq!(memory.block(7).0[0], 0);
    }
}
