//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 32x32x32 block of voxel data plus
//! the deferred structure writes that belong to it.
//!
//! ## Storage
//!
//! Blocks live in a [`BlockContainer`], which keeps a whole chunk of one block
//! as a single value and switches to palette indices once the chunk holds more
//! than one kind of block.
//!
//! ## Population
//!
//! Structure placement runs while a chunk generates, before its neighbors have
//! necessarily generated. Writes go through [`Chunk::set_block_population`]:
//! - writes inside this chunk are kept in `population_changes`
//! - writes into any other chunk are kept in `adjacent_population_changes`
//!
//! Both lists stay pending until the target chunk populates. At that point the
//! world hands the chunk its own list plus every neighbor's adjacent changes
//! that target it, and [`Chunk::apply_population`] resolves the age conflicts
//! and writes the winners into air cells.

use bitvec::prelude::BitVec;

use block_container::BlockContainer;
use population::{
    resolve_population_changes, AdjacentPopulationChange, PopulationAge, PopulationChange,
};

use super::block::block_side::BlockSide;
use super::block::Block;
use super::coords::{BlockPos, ChunkLocalBlockPos, ChunkPos};

pub mod block_container;
pub mod chunk_iteration;
pub mod population;

/// Represents a 32x32x32 collection of voxel blocks in the world.
///
/// Chunks are the fundamental unit of world data. Each chunk knows its position
/// in the world and owns its blocks and pending population changes.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    position: ChunkPos,

    /// Compressed block storage.
    blocks: BlockContainer,

    /// Pending structure writes inside this chunk.
    population_changes: Vec<PopulationChange>,

    /// Pending structure writes this chunk produced for other chunks.
    ///
    /// These are never applied to this chunk. Neighbors collect the entries
    /// targeting them when they populate.
    adjacent_population_changes: Vec<AdjacentPopulationChange>,

    /// Whether the population changes have been written into `blocks`.
    populated: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn new(position: ChunkPos) -> Self {
        Self::filled(position, Block::AIR)
    }

    /// Creates a chunk where every cell holds `block`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `block` - The fill block
    pub fn filled(position: ChunkPos, block: Block) -> Self {
        Chunk {
            position,
            blocks: BlockContainer::filled(block),
            population_changes: Vec::new(),
            adjacent_population_changes: Vec::new(),
            populated: false,
        }
    }

    /// Creates a chunk around existing block storage.
    pub fn with_blocks(position: ChunkPos, blocks: BlockContainer) -> Self {
        Chunk {
            blocks,
            ..Self::new(position)
        }
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    pub fn blocks(&self) -> &BlockContainer {
        &self.blocks
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Gets the block at the specified chunk-relative coordinates.
    pub fn get(&self, local: ChunkLocalBlockPos) -> Block {
        self.blocks.get(local)
    }

    /// Sets the block at the specified chunk-relative coordinates.
    pub fn set(&mut self, local: ChunkLocalBlockPos, block: Block) {
        self.blocks.set(local, block);
    }

    /// Whether every block in this chunk is air.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Solid cells of the face facing `side`, see
    /// [`BlockContainer::solid_face_mask`].
    pub fn solid_face_mask(&self, side: BlockSide) -> BitVec {
        self.blocks.solid_face_mask(side)
    }

    /// Records a structure write of `block` at `position` with the given age.
    ///
    /// Writes inside this chunk are queued for this chunk's population; any
    /// other position is queued as an adjacent change for the chunk containing
    /// it. Nothing is written to the block storage yet.
    ///
    /// # Arguments
    /// * `position` - Absolute position of the write
    /// * `block` - The block to write
    /// * `age` - Conflict priority; higher ages win
    pub fn set_block_population(&mut self, position: BlockPos, block: Block, age: PopulationAge) {
        if position.chunk() == self.position {
            self.population_changes.push(PopulationChange {
                local: position.local(),
                block,
                age,
            });
        } else {
            self.adjacent_population_changes.push(AdjacentPopulationChange {
                position,
                block,
                age,
            });
        }
    }

    pub fn population_changes(&self) -> &[PopulationChange] {
        &self.population_changes
    }

    pub fn adjacent_population_changes(&self) -> &[AdjacentPopulationChange] {
        &self.adjacent_population_changes
    }

    /// Adjacent changes this chunk holds for the chunk at `target`, converted to
    /// that chunk's local coordinates.
    pub fn adjacent_changes_for(
        &self,
        target: ChunkPos,
    ) -> impl Iterator<Item = PopulationChange> + '_ {
        self.adjacent_population_changes
            .iter()
            .filter(move |change| change.position.chunk() == target)
            .map(|change| PopulationChange {
                local: change.position.local(),
                block: change.block,
                age: change.age,
            })
    }

    /// Resolves this chunk's own pending changes together with `incoming` ones
    /// collected from neighbors, and writes the winners.
    ///
    /// Structures only grow into air: a winning change over a solid terrain
    /// cell is dropped. The own change list is consumed; the adjacent list is
    /// kept, since neighbors that populate later still need it.
    ///
    /// # Returns
    /// The number of cells written.
    pub fn apply_population<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = PopulationChange>,
    {
        let own = std::mem::take(&mut self.population_changes);
        let resolved = resolve_population_changes(own.into_iter().chain(incoming));

        let mut written = 0;
        for change in resolved {
            if self.blocks.get(change.local).is_air() {
                self.blocks.set(change.local, change.block);
                written += 1;
            }
        }
        self.populated = true;
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> ChunkPos {
        ChunkPos::new(2, 0, -3)
    }

    #[test]
    fn population_is_routed_by_target_chunk() {
        let mut chunk = Chunk::new(origin());
        let inside = origin().origin().offset(5, 5, 5);
        let outside = origin().origin().offset(-1, 5, 5);

        chunk.set_block_population(inside, Block::from_id(7), 10);
        chunk.set_block_population(outside, Block::from_id(8), 5);

        assert_eq!(chunk.population_changes().len(), 1);
        assert_eq!(chunk.adjacent_population_changes().len(), 1);
        assert!(chunk.get(inside.local()).is_air(), "writes are deferred");

        let west = origin().neighbor(BlockSide::LEFT);
        let for_west: Vec<_> = chunk.adjacent_changes_for(west).collect();
        assert_eq!(for_west.len(), 1);
        assert_eq!(for_west[0].local, ChunkLocalBlockPos::new(31, 5, 5));
        assert_eq!(chunk.adjacent_changes_for(origin()).count(), 0);
    }

    #[test]
    fn higher_age_wins_regardless_of_order() {
        let target = origin().origin().offset(1, 1, 1);
        for flipped in [false, true] {
            let mut chunk = Chunk::new(origin());
            let writes = [(Block::from_id(8), 5), (Block::from_id(7), 10)];
            let ordered: Vec<_> = if flipped {
                writes.iter().rev().copied().collect()
            } else {
                writes.to_vec()
            };
            for (block, age) in ordered {
                chunk.set_block_population(target, block, age);
            }
            chunk.apply_population(std::iter::empty());
            assert_eq!(chunk.get(target.local()), Block::from_id(7));
        }
    }

    #[test]
    fn incoming_changes_compete_with_own_changes() {
        let mut chunk = Chunk::new(origin());
        let target = origin().origin().offset(3, 3, 3);
        chunk.set_block_population(target, Block::from_id(8), 5);
        let incoming = PopulationChange {
            local: target.local(),
            block: Block::from_id(7),
            age: 10,
        };
        assert_eq!(chunk.apply_population([incoming]), 1);
        assert_eq!(chunk.get(target.local()), Block::from_id(7));
        assert!(chunk.is_populated());
        assert!(chunk.population_changes().is_empty());
    }

    #[test]
    fn population_does_not_overwrite_terrain() {
        let mut chunk = Chunk::filled(origin(), Block::from_id(1));
        chunk.set_block_population(origin().origin(), Block::from_id(8), 10);
        assert_eq!(chunk.apply_population(std::iter::empty()), 0);
        assert_eq!(chunk.get(ChunkLocalBlockPos::new(0, 0, 0)), Block::from_id(1));
    }

    #[test]
    fn adjacent_changes_survive_population() {
        let mut chunk = Chunk::new(origin());
        chunk.set_block_population(origin().origin().offset(0, 32, 0), Block::from_id(8), 5);
        chunk.apply_population(std::iter::empty());
        assert_eq!(chunk.adjacent_population_changes().len(), 1);
    }
}
