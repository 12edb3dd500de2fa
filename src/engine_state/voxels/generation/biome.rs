//! # Biome Module
//!
//! Biomes are picked from a 16×16 table indexed by quantized temperature and
//! humidity. Each biome decides the surface and subsurface blocks of a column
//! and which structures grow on it.

use num_derive::FromPrimitive;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::structures::StructureKind;

/// Number of temperature and humidity bands.
pub const BIOME_TABLE_SIZE: usize = 16;

/// Terrain biome of one block column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Biome {
    Tundra = 0,
    Taiga,
    Plains,
    Forest,
    Desert,
    Savanna,
    Rainforest,
}

/// Biome for every (temperature band, humidity band) pair, indexed
/// `[temperature][humidity]`.
pub static BIOME_TABLE: [[Biome; BIOME_TABLE_SIZE]; BIOME_TABLE_SIZE] = build_biome_table();

const fn build_biome_table() -> [[Biome; BIOME_TABLE_SIZE]; BIOME_TABLE_SIZE] {
    let mut table = [[Biome::Plains; BIOME_TABLE_SIZE]; BIOME_TABLE_SIZE];
    let mut t = 0;
    while t < BIOME_TABLE_SIZE {
        let mut h = 0;
        while h < BIOME_TABLE_SIZE {
            table[t][h] = if t < 4 {
                if h < 8 {
                    Biome::Tundra
                } else {
                    Biome::Taiga
                }
            } else if t < 9 {
                if h < 6 {
                    Biome::Plains
                } else {
                    Biome::Forest
                }
            } else if h < 5 {
                Biome::Desert
            } else if h < 10 {
                Biome::Savanna
            } else {
                Biome::Rainforest
            };
            h += 1;
        }
        t += 1;
    }
    table
}

/// Maps a noise sample in `[-1, 1]` to a band in `[0, BIOME_TABLE_SIZE)`.
/// Samples outside the range are clamped.
pub fn quantize(sample: f32) -> usize {
    let scaled = (sample + 1.0) * 0.5 * BIOME_TABLE_SIZE as f32;
    (scaled.max(0.0) as usize).min(BIOME_TABLE_SIZE - 1)
}

impl Biome {
    /// Biome for raw temperature and humidity samples.
    pub fn lookup(temperature: f32, humidity: f32) -> Biome {
        BIOME_TABLE[quantize(temperature)][quantize(humidity)]
    }

    /// The block on top of the column.
    pub fn surface_block(self) -> Block {
        Block::new(match self {
            Biome::Tundra => BlockType::SNOW,
            Biome::Desert => BlockType::SAND,
            Biome::Taiga | Biome::Plains | Biome::Forest | Biome::Savanna | Biome::Rainforest => {
                BlockType::GRASS
            }
        })
    }

    /// The block under the surface.
    pub fn subsurface_block(self) -> Block {
        Block::new(match self {
            Biome::Desert => BlockType::SAND,
            Biome::Tundra => BlockType::GRAVEL,
            _ => BlockType::DIRT,
        })
    }

    /// How many subsurface blocks lie between the surface and stone.
    pub fn subsurface_depth(self) -> i32 {
        match self {
            Biome::Desert => 5,
            Biome::Tundra => 2,
            _ => 3,
        }
    }

    /// Structure attempts per chunk column and which structure grows.
    pub fn structure(self) -> Option<(u32, StructureKind)> {
        match self {
            Biome::Tundra => None,
            Biome::Taiga => Some((4, StructureKind::SpruceTree)),
            Biome::Plains => Some((1, StructureKind::OakTree)),
            Biome::Forest => Some((6, StructureKind::OakTree)),
            Biome::Desert => Some((2, StructureKind::Cactus)),
            Biome::Savanna => Some((1, StructureKind::OakTree)),
            Biome::Rainforest => Some((8, StructureKind::OakTree)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps() {
        assert_eq!(quantize(-5.0), 0);
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(1.0), BIOME_TABLE_SIZE - 1);
        assert_eq!(quantize(9.0), BIOME_TABLE_SIZE - 1);
        assert_eq!(quantize(0.0), BIOME_TABLE_SIZE / 2);
    }

    #[test]
    fn table_corners() {
        assert_eq!(Biome::lookup(-1.0, -1.0), Biome::Tundra);
        assert_eq!(Biome::lookup(-1.0, 1.0), Biome::Taiga);
        assert_eq!(Biome::lookup(1.0, -1.0), Biome::Desert);
        assert_eq!(Biome::lookup(1.0, 1.0), Biome::Rainforest);
        assert_eq!(Biome::lookup(0.0, -1.0), Biome::Plains);
    }

    #[test]
    fn every_biome_is_reachable() {
        for id in 0..7u8 {
            let biome: Biome = num::FromPrimitive::from_u8(id).unwrap();
            assert!(BIOME_TABLE.iter().flatten().any(|b| *b == biome), "{biome:?}");
        }
    }
}
