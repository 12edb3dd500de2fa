//! # Block Container
//!
//! Palette-compressed block storage for one chunk.
//!
//! A chunk rarely contains more than a handful of distinct blocks, so cells
//! store an index into a per-chunk palette instead of the block itself:
//!
//! - `Uniform`: the whole chunk is one block. No array is allocated. Chunks
//!   entirely in the sky, entirely underground or below the world floor stay here.
//! - `Byte`: one `u8` palette index per cell, up to 256 palette entries.
//! - `Short`: one `u16` palette index per cell, once the palette outgrows 256
//!   entries.
//!
//! The only transitions are `Uniform → Byte` on the first write of a different
//! block and `Byte → Short` when the palette overflows. Palette entries are
//! append-only: an index, once handed out, names the same block for the life of
//! the container, and growth copies the existing indices as they are.
//!
//! ### Performance Characteristics
//! - **Uniform read**: O(1), no indexing
//! - **Indexed read**: O(1) array access plus palette lookup
//! - **Write of a known block**: O(palette) search, palettes are tiny in practice
//! - **Face mask**: O(CHUNK_AREA), only the boundary plane is read

use bitvec::prelude::BitVec;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};
use crate::engine_state::voxels::coords::ChunkLocalBlockPos;
use crate::engine_state::voxels::{CHUNK_AREA, CHUNK_SIZE, CHUNK_VOLUME};

/// Palette entries addressable with 8-bit indices.
const BYTE_PALETTE_CAPACITY: usize = u8::MAX as usize + 1;

/// Ordered list of the distinct blocks a container has stored.
///
/// Index 0 is always air, so a zero-filled index array is an empty chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Block>,
}

impl Palette {
    fn new() -> Self {
        Palette {
            entries: vec![Block::AIR],
        }
    }

    fn get(&self, index: usize) -> Block {
        self.entries[index]
    }

    fn find(&self, block: Block) -> Option<usize> {
        self.entries.iter().position(|entry| *entry == block)
    }

    /// Index of `block`, appending it if it is new.
    fn index_of_or_insert(&mut self, block: Block) -> usize {
        match self.find(block) {
            Some(index) => index,
            None => {
                self.entries.push(block);
                self.entries.len() - 1
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Block] {
        &self.entries
    }
}

/// Compressed block array of one chunk. Exactly one representation is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockContainer {
    /// Every cell holds this block.
    Uniform(Block),
    /// 8-bit palette indices.
    Byte { indices: Box<[u8]>, palette: Palette },
    /// 16-bit palette indices.
    Short { indices: Box<[u16]>, palette: Palette },
}

impl Default for BlockContainer {
    fn default() -> Self {
        BlockContainer::Uniform(Block::AIR)
    }
}

impl BlockContainer {
    /// A container where every cell holds `block`.
    pub fn filled(block: Block) -> Self {
        BlockContainer::Uniform(block)
    }

    /// Reads the block at `pos`.
    pub fn get(&self, pos: ChunkLocalBlockPos) -> Block {
        self.get_index(pos.index())
    }

    fn get_index(&self, cell: usize) -> Block {
        match self {
            BlockContainer::Uniform(block) => *block,
            BlockContainer::Byte { indices, palette } => palette.get(indices[cell] as usize),
            BlockContainer::Short { indices, palette } => palette.get(indices[cell] as usize),
        }
    }

    /// Writes `block` at `pos`, growing the representation when needed.
    pub fn set(&mut self, pos: ChunkLocalBlockPos, block: Block) {
        let cell = pos.index();
        if let BlockContainer::Uniform(fill) = self {
            if *fill == block {
                return;
            }
            *self = Self::expand_uniform(*fill);
        }

        if let BlockContainer::Byte { palette, .. } = self {
            if palette.find(block).is_none() && palette.len() == BYTE_PALETTE_CAPACITY {
                self.grow_to_short();
            }
        }

        match self {
            BlockContainer::Uniform(_) => unreachable!("uniform container was expanded above"),
            BlockContainer::Byte { indices, palette } => {
                let index = palette.index_of_or_insert(block);
                indices[cell] = index as u8;
            }
            BlockContainer::Short { indices, palette } => {
                let index = palette.index_of_or_insert(block);
                assert!(
                    index <= u16::MAX as usize,
                    "chunk palette exceeded {} entries",
                    u16::MAX as usize + 1
                );
                indices[cell] = index as u16;
            }
        }
    }

    /// Byte-indexed container with every cell set to `fill`.
    fn expand_uniform(fill: Block) -> Self {
        let mut palette = Palette::new();
        let fill_index = palette.index_of_or_insert(fill) as u8;
        BlockContainer::Byte {
            indices: vec![fill_index; CHUNK_VOLUME].into_boxed_slice(),
            palette,
        }
    }

    /// Byte → Short. Indices are widened in place order, the palette is moved
    /// as-is.
    fn grow_to_short(&mut self) {
        if let BlockContainer::Byte { indices, palette } = self {
            let wide: Box<[u16]> = indices.iter().map(|&index| index as u16).collect();
            let palette = std::mem::replace(palette, Palette::new());
            log::trace!(
                "Growing block container to 16-bit indices ({} palette entries)",
                palette.len()
            );
            *self = BlockContainer::Short {
                indices: wide,
                palette,
            };
        }
    }

    /// Whether every cell is air.
    pub fn is_empty(&self) -> bool {
        match self {
            BlockContainer::Uniform(block) => block.is_air(),
            BlockContainer::Byte { indices, .. } => indices.iter().all(|&index| index == 0),
            BlockContainer::Short { indices, .. } => indices.iter().all(|&index| index == 0),
        }
    }

    /// One bit per cell, set where the cell is not air. Bit `i` corresponds to
    /// `ChunkLocalBlockPos::from_index(i)`.
    pub fn solid_mask(&self) -> BitVec {
        match self {
            BlockContainer::Uniform(block) => BitVec::repeat(!block.is_air(), CHUNK_VOLUME),
            BlockContainer::Byte { indices, .. } => {
                indices.iter().map(|&index| index != 0).collect()
            }
            BlockContainer::Short { indices, .. } => {
                indices.iter().map(|&index| index != 0).collect()
            }
        }
    }

    /// One bit per cell of the chunk face facing `side`, set where the cell is
    /// not air. Bit `i` corresponds to the cell whose
    /// [`ChunkLocalBlockPos::face_index`] is `i`.
    ///
    /// Only the boundary plane is read.
    pub fn solid_face_mask(&self, side: BlockSide) -> BitVec {
        if let BlockContainer::Uniform(block) = self {
            return BitVec::repeat(!block.is_air(), CHUNK_AREA);
        }

        let size = CHUNK_SIZE as usize;
        let mut mask = BitVec::repeat(false, CHUNK_AREA);
        for v in 0..size {
            for u in 0..size {
                let pos = ChunkLocalBlockPos::on_face(side, u, v);
                if !self.get_index(pos.index()).is_air() {
                    mask.set(pos.face_index(side), true);
                }
            }
        }
        mask
    }

    /// The palette, if the container is indexed.
    pub fn palette(&self) -> Option<&Palette> {
        match self {
            BlockContainer::Uniform(_) => None,
            BlockContainer::Byte { palette, .. } | BlockContainer::Short { palette, .. } => {
                Some(palette)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(index: usize) -> ChunkLocalBlockPos {
        ChunkLocalBlockPos::from_index(index)
    }

    #[test]
    fn uniform_reads_without_allocating() {
        let container = BlockContainer::filled(Block::from_id(4));
        assert_eq!(container.get(local(12_345)), Block::from_id(4));
        assert!(container.palette().is_none());
        assert!(!container.is_empty());
        assert!(BlockContainer::default().is_empty());
    }

    #[test]
    fn writing_the_fill_block_keeps_uniform() {
        let mut container = BlockContainer::filled(Block::from_id(2));
        container.set(local(5), Block::from_id(2));
        assert!(matches!(container, BlockContainer::Uniform(_)));
    }

    #[test]
    fn first_write_expands_to_bytes() {
        let mut container = BlockContainer::default();
        container.set(local(100), Block::from_id(7));
        assert!(matches!(container, BlockContainer::Byte { .. }));
        assert_eq!(container.get(local(100)), Block::from_id(7));
        assert_eq!(container.get(local(101)), Block::AIR);
        assert!(!container.is_empty());
    }

    #[test]
    fn palette_round_trip_below_capacity() {
        let mut container = BlockContainer::default();
        let mut rng = fastrand::Rng::with_seed(99);
        let mut expected = vec![Block::AIR; CHUNK_VOLUME];
        for cell in 0..CHUNK_VOLUME {
            let block = Block::from_id(rng.u16(0..=255));
            container.set(local(cell), block);
            expected[cell] = block;
        }
        assert!(matches!(container, BlockContainer::Byte { .. }));
        for (cell, block) in expected.iter().enumerate() {
            assert_eq!(container.get(local(cell)), *block);
        }
    }

    #[test]
    fn the_256th_distinct_block_grows_to_shorts() {
        let mut container = BlockContainer::default();
        for id in 1..=255u16 {
            container.set(local(id as usize * 3), Block::from_id(id));
        }
        assert!(matches!(container, BlockContainer::Byte { .. }));
        assert_eq!(container.palette().unwrap().len(), 256);

        let before: Vec<Block> = (0..CHUNK_VOLUME).map(|cell| container.get(local(cell))).collect();
        container.set(local(1), Block::from_id(256));

        assert!(matches!(container, BlockContainer::Short { .. }));
        for (cell, block) in before.iter().enumerate() {
            if cell != 1 {
                assert_eq!(container.get(local(cell)), *block, "cell {cell} changed");
            }
        }
        assert_eq!(container.get(local(1)), Block::from_id(256));
    }

    #[test]
    fn growth_preserves_palette_order() {
        let mut container = BlockContainer::default();
        for id in 1..=255u16 {
            container.set(local(id as usize), Block::from_id(id));
        }
        let order_before = container.palette().unwrap().entries().to_vec();
        container.set(local(0), Block::from_id(1000));
        let order_after = container.palette().unwrap().entries();
        assert_eq!(&order_after[..order_before.len()], &order_before[..]);
        assert_eq!(order_after.last(), Some(&Block::from_id(1000)));
    }

    #[test]
    fn palette_indices_are_not_reused() {
        let mut container = BlockContainer::default();
        container.set(local(0), Block::from_id(5));
        container.set(local(0), Block::AIR);
        container.set(local(1), Block::from_id(6));
        assert_eq!(
            container.palette().unwrap().entries(),
            &[Block::AIR, Block::from_id(5), Block::from_id(6)]
        );
    }

    #[test]
    fn clearing_every_written_cell_is_empty_again() {
        let mut container = BlockContainer::default();
        container.set(local(10), Block::from_id(3));
        container.set(local(10), Block::AIR);
        assert!(container.is_empty());
    }

    #[test]
    fn solid_mask_marks_non_air_cells() {
        let mut container = BlockContainer::default();
        container.set(local(0), Block::from_id(1));
        container.set(local(CHUNK_VOLUME - 1), Block::from_id(2));
        let mask = container.solid_mask();
        assert_eq!(mask.len(), CHUNK_VOLUME);
        assert_eq!(mask.count_ones(), 2);
        assert!(mask[0] && mask[CHUNK_VOLUME - 1]);
    }

    #[test]
    fn face_mask_reads_only_the_boundary_plane() {
        let mut container = BlockContainer::default();
        let on_top = ChunkLocalBlockPos::new(3, 31, 4);
        let below_top = ChunkLocalBlockPos::new(5, 30, 6);
        container.set(on_top, Block::from_id(1));
        container.set(below_top, Block::from_id(1));

        let top = container.solid_face_mask(BlockSide::TOP);
        assert_eq!(top.len(), CHUNK_AREA);
        assert_eq!(top.count_ones(), 1);
        assert!(top[on_top.face_index(BlockSide::TOP)]);
        assert_eq!(container.solid_face_mask(BlockSide::BOTTOM).count_ones(), 0);
    }

    #[test]
    fn uniform_face_masks_are_full_or_empty() {
        assert_eq!(
            BlockContainer::filled(Block::from_id(1))
                .solid_face_mask(BlockSide::LEFT)
                .count_ones(),
            CHUNK_AREA
        );
        assert_eq!(
            BlockContainer::default()
                .solid_face_mask(BlockSide::LEFT)
                .count_ones(),
            0
        );
    }
}
