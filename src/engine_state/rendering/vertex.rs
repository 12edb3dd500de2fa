//! Vertex data structures for voxel mesh payloads.
//!
//! This module defines the vertex format produced by mesh building and handed to
//! the render thread. The layout is plain old data so a payload's vertex list
//! can be uploaded as raw bytes.

use cgmath::Point3;

/// A vertex of a chunk mesh.
///
/// Positions are chunk-local block corners in `0..=CHUNK_SIZE`; the renderer
/// places the mesh using the payload's chunk position.
///
/// # Memory Layout
/// - Position: 3x i32 (12 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// X coordinate in chunk space
    x: i32,
    /// Y coordinate in chunk space
    y: i32,
    /// Z coordinate in chunk space
    z: i32,
    /// Index of the texture in the texture array
    texture_index: u32,
    /// Texture coordinates in blocks; a merged face repeats its texture along u
    tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The position of the vertex in chunk space
    /// * `texture_index` - Index of the texture in the texture array
    /// * `u` - U texture coordinate in blocks
    /// * `v` - V texture coordinate in blocks
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(pos: Point3<i32>, texture_index: u32, u: u8, v: u8) -> Self {
        Vertex {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            texture_index,
            tex_coords: [u as f32, v as f32],
        }
    }

    pub fn texture_index(&self) -> u32 {
        self.texture_index
    }

    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }
}
