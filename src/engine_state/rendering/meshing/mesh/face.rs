use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-left,
/// upper-right) and the block and side it belongs to. Corners are ordered so
/// that "right" crossed with "up" points out of the block, which gives
/// counter-clockwise triangles when seen from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<usize>,
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<usize>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<usize>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<usize>,
    /// The block this face shows, used for texture mapping
    pub block: Block,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a voxel at the given coordinates.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `block` - The block, used for texture mapping
    /// * `block_side` - Which side of the block this face represents
    pub fn new(i: usize, j: usize, k: usize, block: Block, block_side: BlockSide) -> Self {
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::FRONT => (
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i, j + 1, k),
            ),
            BlockSide::BOTTOM => (
                Point3::new(i, j, k),
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
            ),
            BlockSide::TOP => (
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i + 1, j + 1, k),
            ),
            BlockSide::LEFT => (
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
            ),
            BlockSide::RIGHT => (
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
            ),
        };
        Face {
            ll,
            lr,
            ul,
            ur,
            block,
            block_side,
        }
    }

    /// Number of blocks this face spans horizontally.
    pub fn width(&self) -> usize {
        let (a, b) = (self.ll, self.lr);
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y) + a.z.abs_diff(b.z)
    }

    /// Attempts to merge this face with another face that is directly to its right.
    ///
    /// # Arguments
    /// * `other` - The face to merge with (should be directly to the right of this face)
    ///
    /// # Returns
    /// `Some(merged_face)` if the faces can be merged, or `None` if they cannot be merged.
    ///
    /// # Note
    /// Faces can only be merged if they show the same block and their edges align perfectly.
    pub fn merge_right(&self, other: &Face) -> Option<Face> {
        if self.block == other.block && self.lr == other.ll && self.ur == other.ul {
            return Some(Face {
                ul: self.ul,
                ur: other.ur,
                ll: self.ll,
                lr: other.lr,
                block_side: self.block_side,
                block: self.block,
            });
        }

        None
    }

    /// Attempts to merge this face with another face that is directly to its left.
    ///
    /// # Arguments
    /// * `other` - The face to merge with (should be directly to the left of this face)
    ///
    /// # Returns
    /// `Some(merged_face)` if the faces can be merged, or `None` if they cannot be merged.
    ///
    /// # Note
    /// Faces can only be merged if they show the same block and their edges align perfectly.
    pub fn merge_left(&self, other: &Face) -> Option<Face> {
        if self.block == other.block && self.ll == other.lr && self.ul == other.ur {
            return Some(Face {
                ul: other.ul,
                ur: self.ur,
                ll: other.ll,
                lr: self.lr,
                block_side: self.block_side,
                block: self.block,
            });
        }

        None
    }

    /// Merges a face that follows this one along +x, in whichever direction
    /// this side's "right" points. LEFT and RIGHT faces do not extend along x
    /// and never merge.
    pub fn merge_along_x(&self, next: &Face) -> Option<Face> {
        match self.block_side {
            BlockSide::FRONT | BlockSide::TOP | BlockSide::BOTTOM => self.merge_right(next),
            BlockSide::BACK => self.merge_left(next),
            BlockSide::LEFT | BlockSide::RIGHT => None,
        }
    }
}
