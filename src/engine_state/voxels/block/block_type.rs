//! # Block Type Module
//!
//! This module defines the block types the world generator knows about.
//! The palette storage itself only sees [`super::Block`] ids, so ids outside
//! this enum are valid blocks too; they simply have no generator meaning.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the generated block types.
///
/// The discriminant is the block id stored in chunks. `FromPrimitive` allows
/// going back from an id to the enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Always id 0.
    AIR = 0,
    STONE = 1,
    DIRT = 2,
    /// Grass on top, dirt on the bottom, grass-on-dirt on the sides.
    GRASS = 3,
    SAND = 4,
    SNOW = 5,
    GRAVEL = 6,
    /// Tree trunk.
    LOG = 7,
    LEAVES = 8,
    CACTUS = 9,
    /// Fill below the world floor.
    BEDROCK = 10,
}

impl BlockType {
    /// Number of variants; sizes the texture table.
    pub const COUNT: usize = 11;

    /// Converts a block id back to a `BlockType`, or `None` for ids the
    /// generator never produces.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u16(id)
    }
}
