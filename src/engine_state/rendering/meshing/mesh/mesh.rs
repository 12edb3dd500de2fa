//! Mesh data structures and operations for voxel rendering.
//!
//! This module provides the per-side vertex and index buffers a chunk mesh is
//! made of and the conversion from faces to vertices.

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Represents a single side of a mesh with its associated vertices and indices.
///
/// Each `MeshSide` corresponds to one of the six possible block faces and contains
/// the vertex and index data needed to render that face.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSide {
    /// The vertex data for this mesh side
    pub vertices: Vec<Vertex>,
    /// The index data for this mesh side
    pub indices: Vec<u32>,
    /// Which block side this mesh represents
    pub side: BlockSide,
}

impl MeshSide {
    /// Creates a new, empty `MeshSide` for the specified block side.
    ///
    /// # Arguments
    /// * `side` - The block side this mesh side represents
    pub fn new(side: BlockSide) -> Self {
        MeshSide {
            vertices: Vec::new(),
            indices: Vec::new(),
            side,
        }
    }

    /// Number of quads on this side.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Represents a complete mesh for a voxel chunk with all six possible sides.
///
/// The mesh keeps separate vertex and index buffers for each side of the blocks,
/// so a renderer can skip whole sides that face away from the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Array of mesh sides, indexed by `BlockSide` enum values.
    /// The order matches the `BlockSide` enum variant order.
    pub mesh: [MeshSide; 6],
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Creates a new, empty mesh with all sides initialized.
    pub fn new() -> Self {
        Mesh {
            mesh: BlockSide::all().map(MeshSide::new),
        }
    }

    /// Appends one face to the side it belongs to.
    pub fn add_face(&mut self, face: &Face) {
        let side = &mut self.mesh[face.block_side as usize];
        let faces_generated = side.face_count() as u32;
        side.vertices.extend(Self::generate_face_vertices(face));
        side.indices.extend(Self::generate_face_indices(faces_generated));
    }

    /// Whether the mesh has no faces at all.
    pub fn is_empty(&self) -> bool {
        self.mesh.iter().all(|side| side.vertices.is_empty())
    }

    /// Number of quads across all sides.
    pub fn face_count(&self) -> usize {
        self.mesh.iter().map(MeshSide::face_count).sum()
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// # Arguments
    /// * `face` - The face to generate vertices for
    ///
    /// # Returns
    /// The four corners of the face in the order ll, lr, ul, ur, which forms
    /// two triangles when combined with the indices from `generate_face_indices`.
    pub fn generate_face_vertices(face: &Face) -> [Vertex; 4] {
        let texture_index = face.block.texture_index(face.block_side);
        let u_offset = face.width() as u8;
        let corner = |p: cgmath::Point3<usize>| p.map(|c| c as i32);

        [
            Vertex::new(corner(face.ll), texture_index, 0, 1),
            Vertex::new(corner(face.lr), texture_index, u_offset, 1),
            Vertex::new(corner(face.ul), texture_index, 0, 0),
            Vertex::new(corner(face.ur), texture_index, u_offset, 0),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Arguments
    /// * `num_faces_generated` - The number of faces that have been generated so far
    ///
    /// # Returns
    /// Six indices forming two triangles for the face.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 3, base, base + 3, base + 2]
    }
}
