//! # Block Module
//!
//! This module provides the block value stored in chunks, the generator's block
//! types and the six block faces.

use block_type::BlockType;

use block_side::BlockSide;

pub mod block_side;
pub mod block_type;

/// The underlying integer type of a block id.
///
/// 16 bits so a chunk palette can outgrow what 8-bit indices address.
pub type BlockTypeSize = u16;

/// Maps each block type to its texture index for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array is indexed by `BlockSide`:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u32; 6]; BlockType::COUNT] = [
    [0, 0, 0, 0, 0, 0],       // AIR (never meshed)
    [1, 1, 1, 1, 1, 1],       // STONE
    [2, 2, 2, 2, 2, 2],       // DIRT
    [3, 3, 2, 4, 3, 3],       // GRASS (top: 4, bottom: dirt, sides: 3)
    [5, 5, 5, 5, 5, 5],       // SAND
    [6, 6, 2, 7, 6, 6],       // SNOW (snowy sides over dirt)
    [8, 8, 8, 8, 8, 8],       // GRAVEL
    [9, 9, 10, 10, 9, 9],     // LOG (bark sides, rings on top/bottom)
    [11, 11, 11, 11, 11, 11], // LEAVES
    [12, 12, 13, 13, 12, 12], // CACTUS
    [14, 14, 14, 14, 14, 14], // BEDROCK
];

/// Texture used for block ids the generator does not know about.
pub const MISSING_TEXTURE_INDEX: u32 = 15;

/// Represents a single voxel block in the world.
///
/// A block is just its type id; id 0 is air. Two blocks are equal when their
/// ids are.
///
/// # Memory Layout
/// `#[repr(C)]` and `Pod` so block arrays can be viewed as raw bytes.
#[repr(C)]
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, bytemuck::Pod, bytemuck::Zeroable, Debug,
)]
pub struct Block {
    /// The type id of this block.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Empty space.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub const fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Creates a block from a raw id.
    pub const fn from_id(id: BlockTypeSize) -> Self {
        Block { block_type: id }
    }

    pub fn id(&self) -> BlockTypeSize {
        self.block_type
    }

    pub fn is_air(&self) -> bool {
        self.block_type == 0
    }

    /// The generator type of this block, if it has one.
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_id(self.block_type)
    }

    /// Texture index for one face of this block.
    pub fn texture_index(&self, side: BlockSide) -> u32 {
        BLOCK_TYPE_TO_TEXTURE_INDICES
            .get(self.block_type as usize)
            .map(|indices| indices[side as usize])
            .unwrap_or(MISSING_TEXTURE_INDEX)
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_uses_dirt_underneath() {
        let grass = Block::new(BlockType::GRASS);
        assert_eq!(grass.texture_index(BlockSide::TOP), 4);
        assert_eq!(
            grass.texture_index(BlockSide::BOTTOM),
            Block::new(BlockType::DIRT).texture_index(BlockSide::TOP)
        );
    }

    #[test]
    fn unknown_ids_get_the_missing_texture() {
        assert_eq!(Block::from_id(900).texture_index(BlockSide::LEFT), MISSING_TEXTURE_INDEX);
        assert_eq!(Block::from_id(900).block_type(), None);
    }
}
