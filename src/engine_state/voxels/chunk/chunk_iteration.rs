//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air blocks of a chunk.
//!
//! The iterator takes the chunk's solid mask once and walks its set bits, so
//! air cells are skipped without reading the palette. Uniform air chunks yield
//! nothing and allocate nothing.

use bitvec::prelude::BitVec;

use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::coords::ChunkLocalBlockPos;

use super::block_container::BlockContainer;
use super::Chunk;

/// An iterator over all non-air blocks in a chunk, in cell index order
/// (x fastest, then z, then y).
pub struct ChunkBlockIterator<'a> {
    /// Storage of the chunk being iterated over
    blocks: &'a BlockContainer,
    /// Solid cells of the chunk, `None` for an all-air chunk
    solid: Option<BitVec>,
    /// Next cell index to examine
    next_cell: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    ///
    /// # Arguments
    /// * `chunk_ref` - A reference to the chunk to iterate over
    ///
    /// # Returns
    /// A new `ChunkBlockIterator` positioned before the first non-air block
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        let blocks = chunk_ref.blocks();
        ChunkBlockIterator {
            blocks,
            solid: (!blocks.is_empty()).then(|| blocks.solid_mask()),
            next_cell: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (ChunkLocalBlockPos, Block);

    fn next(&mut self) -> Option<Self::Item> {
        let solid = self.solid.as_ref()?;
        let offset = solid.get(self.next_cell..)?.first_one()?;
        let cell = self.next_cell + offset;
        self.next_cell = cell + 1;

        let local = ChunkLocalBlockPos::from_index(cell);
        Some((local, self.blocks.get(local)))
    }
}
