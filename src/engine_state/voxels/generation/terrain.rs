//! Terrain fill for a single chunk.
//!
//! Each block column is, from the top down: air above the surface height, the
//! biome's surface block at the surface height, a few blocks of the biome's
//! subsurface, then stone, and bedrock below [`WORLD_FLOOR`].
//!
//! Chunks that lie entirely in one of those layers are produced as uniform
//! containers without touching individual cells.

use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::chunk::block_container::BlockContainer;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::coords::{ChunkLocalBlockPos, ChunkPos};
use crate::engine_state::voxels::{CHUNK_SIZE, WORLD_FLOOR};

use super::ColumnParameters;

/// Deepest subsurface layer of any biome.
const MAX_SUBSURFACE_DEPTH: i32 = 5;

/// Block at height `y` of a column with the given surface height and biome.
fn column_block(y: i32, height: i32, column: &ColumnParameters, x: usize, z: usize) -> Block {
    if y < WORLD_FLOOR {
        return Block::new(BlockType::BEDROCK);
    }
    if y > height {
        return Block::AIR;
    }
    let biome = column.biome(x, z);
    if y == height {
        biome.surface_block()
    } else if y >= height - biome.subsurface_depth() {
        biome.subsurface_block()
    } else {
        Block::new(BlockType::STONE)
    }
}

/// Fills the chunk at `position` from its column's parameters.
pub fn fill_terrain(position: ChunkPos, column: &ColumnParameters) -> Chunk {
    let bottom = position.y() * CHUNK_SIZE;
    let top = bottom + CHUNK_SIZE - 1;

    if top < WORLD_FLOOR {
        return Chunk::filled(position, Block::new(BlockType::BEDROCK));
    }
    if bottom > column.max_height {
        return Chunk::new(position);
    }
    if bottom >= WORLD_FLOOR && top < column.min_height - MAX_SUBSURFACE_DEPTH {
        return Chunk::filled(position, Block::new(BlockType::STONE));
    }

    let size = CHUNK_SIZE as usize;
    let mut blocks = BlockContainer::default();
    for z in 0..size {
        for x in 0..size {
            let height = column.height(x, z);
            for y in 0..size {
                let block = column_block(bottom + y as i32, height, column, x, z);
                if !block.is_air() {
                    blocks.set(ChunkLocalBlockPos::new(x, y, z), block);
                }
            }
        }
    }
    Chunk::with_blocks(position, blocks)
}
