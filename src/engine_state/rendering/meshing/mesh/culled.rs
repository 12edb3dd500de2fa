//! Face-culling mesh builder.
//!
//! Emits a quad for every block face that touches air and merges runs of equal
//! quads along x. Faces on the chunk boundary are tested against the touching
//! face of the neighboring chunk, supplied as a solid face mask, so no face is
//! emitted between two solid blocks in different chunks.

use bitvec::prelude::BitVec;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    chunk::{chunk_iteration::ChunkBlockIterator, Chunk},
    coords::ChunkLocalBlockPos,
};

use super::{face::Face, mesh::Mesh};

/// Solid face masks of the six face neighbors, indexed by the `BlockSide` that
/// leads to each neighbor. Entry `s` is the neighbor's face touching this chunk,
/// i.e. `neighbor.solid_face_mask(s.opposite())`. A missing neighbor counts as
/// all air.
pub type NeighborFaces = [Option<BitVec>; 6];

/// Whether the cell next to `local` across `side` is solid.
fn is_covered(
    local: ChunkLocalBlockPos,
    side: BlockSide,
    solid: &BitVec,
    neighbors: &NeighborFaces,
) -> bool {
    if local.is_on_face(side) {
        return neighbors[side as usize]
            .as_ref()
            .is_some_and(|mask| mask[local.face_index(side)]);
    }
    let [dx, dy, dz] = side.normal();
    let adjacent = ChunkLocalBlockPos::new(
        (local.x() as i32 + dx) as usize,
        (local.y() as i32 + dy) as usize,
        (local.z() as i32 + dz) as usize,
    );
    solid[adjacent.index()]
}

/// Builds the mesh of `chunk`.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `neighbors` - Touching faces of the six face neighbors
///
/// # Returns
/// A `Mesh` with one buffer pair per block side.
///
/// # Performance
/// Runs in O(n) over the chunk's solid blocks. Uniform air chunks return
/// immediately.
pub fn culled(chunk: &Chunk, neighbors: &NeighborFaces) -> Mesh {
    let mut mesh = Mesh::new();
    if chunk.is_empty() {
        return mesh;
    }

    let time = Instant::now();
    let solid = chunk.blocks().solid_mask();
    let mut pending: [Option<Face>; 6] = [None; 6];

    for (local, block) in ChunkBlockIterator::new(chunk) {
        for side in BlockSide::all() {
            if is_covered(local, side, &solid, neighbors) {
                continue;
            }
            let face = Face::new(local.x(), local.y(), local.z(), block, side);
            let slot = &mut pending[side as usize];
            *slot = match slot.and_then(|previous| previous.merge_along_x(&face)) {
                Some(merged) => Some(merged),
                None => {
                    if let Some(previous) = slot.take() {
                        mesh.add_face(&previous);
                    }
                    Some(face)
                }
            };
        }
    }
    for face in pending.iter().flatten() {
        mesh.add_face(face);
    }

    debug!(
        "Meshed chunk {} ({} faces) in {:?}",
        chunk.position(),
        mesh.face_count(),
        time.elapsed()
    );
    mesh
}
