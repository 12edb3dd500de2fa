//! # Block Side Module
//!
//! This module defines the six faces of a voxel block (and, equivalently, of a
//! chunk). Sides drive face culling during meshing and pick which neighbor chunk
//! a boundary face has to be checked against.

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a fixed integer so it can index per-side arrays
/// (mesh sides, texture tables). The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> [i32; 3] {
        match self {
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::TOP => [0, 1, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }
}
