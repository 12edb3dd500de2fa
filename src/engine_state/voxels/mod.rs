//! # Voxel Simulation Core
//!
//! This module contains the voxel world itself: how positions wrap around the
//! toroidal world, how blocks are stored inside chunks, how chunks move through
//! the generation pipeline and how the world orchestrates all of it.
//!
//! ## Architecture
//!
//! * **Coords**: block, chunk, chunk-local and column positions with wrap arithmetic
//! * **Block**: block types, per-side texture lookup and block faces
//! * **Chunk**: palette-compressed storage plus deferred population changes
//! * **Chunk Status**: per-chunk load/mesh stages with push-based neighbor readiness
//! * **Generation**: noise sources, column parameters, terrain fill and structures
//! * **World**: chunk registry, priority queues and the per-tick pipeline
//!
//! ## Data Flow
//!
//! 1. `World::tick` enqueues chunks around the load center
//! 2. Loaded chunks get terrain and structure placement (GENERATED)
//! 3. Once all 26 neighbors are generated, deferred structure writes are applied (POPULATED)
//! 4. Once the six face neighbors are populated, a mesh payload is built and queued
//!    for the render thread
//!
//! ## Thread Safety
//!
//! Everything in here is owned and mutated by the simulation thread only.
//! The render thread receives finished mesh payloads through
//! [`crate::core::SwapQueue`] and never touches chunk storage.

pub mod block;
pub mod chunk;
pub mod chunk_status;
pub mod coords;
pub mod generation;
pub mod world;

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 32;
/// Number of blocks in one chunk face (CHUNK_SIZE²).
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
/// Number of blocks in a chunk (CHUNK_SIZE³).
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_SIZE as usize;

/// Half the world's extent along x and z, in chunks.
pub const WORLD_RADIUS_CHUNK: i32 = 256;
/// Half the world's extent along x and z, in blocks.
pub const WORLD_RADIUS_BLOCK: i32 = WORLD_RADIUS_CHUNK * CHUNK_SIZE;

/// Height sampled by the terrain noise is centered on this y level.
pub const SEA_LEVEL: i32 = 16;
/// Blocks below this y level are bedrock.
pub const WORLD_FLOOR: i32 = -96;
