//! Deterministic per-chunk random number generator.
//!
//! Structure placement must not depend on the order chunks are generated in, so
//! every chunk gets its own generator seeded from the world seed and its
//! coordinates. The coordinates are folded in one at a time through a 64-bit
//! finalizer, so neighboring chunks get unrelated streams.

use crate::engine_state::voxels::coords::ChunkPos;

/// splitmix64 finalizer.
fn avalanche(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Seed for the generator of the chunk at `position`.
pub fn chunk_seed(world_seed: u64, position: ChunkPos) -> u64 {
    let mut hash = avalanche(world_seed ^ 0x9e37_79b9_7f4a_7c15);
    for coordinate in [position.x(), position.y(), position.z()] {
        hash = avalanche(hash ^ (coordinate as i64 as u64));
    }
    hash
}

/// Generator for the chunk at `position`.
pub fn chunk_rng(world_seed: u64, position: ChunkPos) -> fastrand::Rng {
    fastrand::Rng::with_seed(chunk_seed(world_seed, position))
}
