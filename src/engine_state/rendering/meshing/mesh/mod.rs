//! Mesh generation for voxel rendering.
//!
//! This module converts chunk block data into per-side vertex and index buffers.
//! Hidden faces are culled, both inside the chunk and against the touching faces
//! of neighboring chunks, and runs of equal faces along x are merged into one
//! quad.
//!
//! # Architecture
//! - [`Mesh`]: The main structure representing a complete mesh with vertices and indices
//! - [`Face`]: Represents a single face of a voxel with its vertices and properties
//! - [`culled`]: Builds a [`Mesh`] from a chunk and its neighbors' face masks
//!
//! # Usage
//! ```
//! use toroidal_voxel_world::engine_state::rendering::meshing::mesh::{culled, NeighborFaces};
//! use toroidal_voxel_world::engine_state::voxels::{
//!     block::Block, chunk::Chunk, coords::{ChunkLocalBlockPos, ChunkPos},
//! };
//!
//! let mut chunk = Chunk::new(ChunkPos::new(0, 0, 0));
//! chunk.set(ChunkLocalBlockPos::new(1, 1, 1), Block::from_id(1));
//! let neighbors: NeighborFaces = Default::default();
//! let mesh = culled(&chunk, &neighbors);
//! assert_eq!(mesh.face_count(), 6);
//! ```

mod culled;
mod face;
mod mesh;

pub use culled::{culled, NeighborFaces};
pub use face::Face;
pub use mesh::*;
