//! # Coordinates
//!
//! Position types for the wrapped voxel world.
//!
//! The world is a torus along x and z: walking past `WORLD_RADIUS_BLOCK - 1`
//! brings you back to `-WORLD_RADIUS_BLOCK`. The y axis is unbounded. Every
//! constructor and offset re-applies the wrap, so a `BlockPos` or `ChunkPos` in
//! hand is always canonical and can be hashed and compared directly.
//!
//! Distances between chunks are always the shortest way around the torus,
//! see [`ChunkPos::offset`].

use std::fmt;

use cgmath::{Point3, Vector3};

use super::block::block_side::BlockSide;
use super::{CHUNK_SIZE, WORLD_RADIUS_BLOCK, WORLD_RADIUS_CHUNK};

/// Wraps `x` into `[-radius, radius)`.
///
/// Values already in range are returned unchanged; anything else is reduced
/// modulo the diameter and re-centered.
///
/// ```
/// use toroidal_voxel_world::engine_state::voxels::coords::wrap;
///
/// assert_eq!(wrap(5, 8), 5);
/// assert_eq!(wrap(8, 8), -8);
/// assert_eq!(wrap(-9, 8), 7);
/// ```
pub fn wrap(x: i32, radius: i32) -> i32 {
    wrap_wide(x as i64, radius)
}

/// Wrap on a widened value so offsets cannot overflow before reduction.
fn wrap_wide(x: i64, radius: i32) -> i32 {
    let radius = radius as i64;
    if (-radius..radius).contains(&x) {
        return x as i32;
    }
    ((x + radius).rem_euclid(2 * radius) - radius) as i32
}

/// Shortest signed delta from `from` to `to` on a wrapped axis.
///
/// When the plain delta reaches the radius in either direction the diameter is
/// subtracted or added, which keeps `delta(a, b) == -delta(b, a)` even for the
/// antipodal point.
fn wrapped_delta(from: i32, to: i32, radius: i32) -> i32 {
    let delta = to as i64 - from as i64;
    let radius = radius as i64;
    let delta = if delta >= radius {
        delta - 2 * radius
    } else if delta <= -radius {
        delta + 2 * radius
    } else {
        delta
    };
    delta as i32
}

/// Absolute block coordinate. `x` and `z` are wrapped, `y` is not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockPos {
    x: i32,
    y: i32,
    z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPos {
            x: wrap(x, WORLD_RADIUS_BLOCK),
            y,
            z: wrap(z, WORLD_RADIUS_BLOCK),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Block containing a point in world space.
    pub fn from_world_point(point: Point3<f64>) -> Self {
        BlockPos::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// This position moved by the given amounts, wrapped.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        BlockPos {
            x: wrap_wide(self.x as i64 + dx as i64, WORLD_RADIUS_BLOCK),
            y: self.y + dy,
            z: wrap_wide(self.z as i64 + dz as i64, WORLD_RADIUS_BLOCK),
        }
    }

    /// Shortest signed delta from this position to `other`, per axis.
    pub fn delta_to(&self, other: &BlockPos) -> Vector3<i32> {
        Vector3::new(
            wrapped_delta(self.x, other.x, WORLD_RADIUS_BLOCK),
            other.y - self.y,
            wrapped_delta(self.z, other.z, WORLD_RADIUS_BLOCK),
        )
    }

    /// The chunk containing this block.
    pub fn chunk(&self) -> ChunkPos {
        ChunkPos::new(
            self.x.div_euclid(CHUNK_SIZE),
            self.y.div_euclid(CHUNK_SIZE),
            self.z.div_euclid(CHUNK_SIZE),
        )
    }

    /// Position of this block relative to its chunk's origin.
    pub fn local(&self) -> ChunkLocalBlockPos {
        ChunkLocalBlockPos {
            x: self.x.rem_euclid(CHUNK_SIZE) as usize,
            y: self.y.rem_euclid(CHUNK_SIZE) as usize,
            z: self.z.rem_euclid(CHUNK_SIZE) as usize,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Chunk coordinate. `x` and `z` are wrapped into
/// `[-WORLD_RADIUS_CHUNK, WORLD_RADIUS_CHUNK)`.
///
/// Ordering is lexicographic on (x, y, z), which the derive provides from the
/// field order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkPos {
    x: i32,
    y: i32,
    z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkPos {
            x: wrap(x, WORLD_RADIUS_CHUNK),
            y,
            z: wrap(z, WORLD_RADIUS_CHUNK),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// This chunk position moved by the given amounts, wrapped.
    pub fn translated(&self, dx: i32, dy: i32, dz: i32) -> Self {
        ChunkPos {
            x: wrap_wide(self.x as i64 + dx as i64, WORLD_RADIUS_CHUNK),
            y: self.y + dy,
            z: wrap_wide(self.z as i64 + dz as i64, WORLD_RADIUS_CHUNK),
        }
    }

    /// The chunk sharing the given face with this one.
    pub fn neighbor(&self, side: BlockSide) -> Self {
        let [dx, dy, dz] = side.normal();
        self.translated(dx, dy, dz)
    }

    /// Shortest signed offset from this chunk to `other`.
    ///
    /// x and z go the short way around the world, so two chunks on either side
    /// of the seam are one chunk apart, not a world apart.
    pub fn offset(&self, other: &ChunkPos) -> ChunkOffset {
        ChunkOffset {
            x: wrapped_delta(self.x, other.x, WORLD_RADIUS_CHUNK),
            y: other.y - self.y,
            z: wrapped_delta(self.z, other.z, WORLD_RADIUS_CHUNK),
        }
    }

    /// Euclidean distance in chunks along the shortest wrapped offset.
    pub fn distance(&self, other: &ChunkPos) -> f64 {
        self.offset(other).length()
    }

    /// Block position of this chunk's minimum corner.
    pub fn origin(&self) -> BlockPos {
        BlockPos::new(self.x * CHUNK_SIZE, self.y * CHUNK_SIZE, self.z * CHUNK_SIZE)
    }

    /// The column this chunk belongs to.
    pub fn column(&self) -> ChunkPos2D {
        ChunkPos2D {
            x: self.x,
            z: self.z,
        }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// The x/z projection of a chunk position: one column of vertically stacked
/// chunks that share a heightmap and a biome map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkPos2D {
    x: i32,
    z: i32,
}

impl ChunkPos2D {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPos2D {
            x: wrap(x, WORLD_RADIUS_CHUNK),
            z: wrap(z, WORLD_RADIUS_CHUNK),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Block x coordinate of the column's minimum corner.
    pub fn origin_x(&self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// Block z coordinate of the column's minimum corner.
    pub fn origin_z(&self) -> i32 {
        self.z * CHUNK_SIZE
    }
}

/// Signed, minimal wrapped delta between two chunk positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChunkOffset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkOffset {
    pub fn length_squared(&self) -> i64 {
        let (x, y, z) = (self.x as i64, self.y as i64, self.z as i64);
        x * x + y * y + z * z
    }

    pub fn length(&self) -> f64 {
        (self.length_squared() as f64).sqrt()
    }

    /// Sum of absolute components; used as queue priority.
    pub fn manhattan(&self) -> u32 {
        self.x.unsigned_abs() + self.y.unsigned_abs() + self.z.unsigned_abs()
    }

    /// Squared horizontal distance, ignoring y.
    pub fn horizontal_length_squared(&self) -> i64 {
        let (x, z) = (self.x as i64, self.z as i64);
        x * x + z * z
    }
}

impl std::ops::Neg for ChunkOffset {
    type Output = ChunkOffset;

    fn neg(self) -> ChunkOffset {
        ChunkOffset {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Block coordinate relative to its chunk's minimum corner, each axis in
/// `[0, CHUNK_SIZE)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkLocalBlockPos {
    x: usize,
    y: usize,
    z: usize,
}

impl ChunkLocalBlockPos {
    /// Creates a chunk-local position.
    ///
    /// # Panics
    /// Panics if any axis lies outside `[0, CHUNK_SIZE)`. An out-of-range local
    /// position is always a bug in the caller, never something to clamp.
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        match Self::try_new(x, y, z) {
            Some(local) => local,
            None => panic!(
                "chunk-local block position ({}, {}, {}) is outside [0, {})",
                x, y, z, CHUNK_SIZE
            ),
        }
    }

    /// Creates a chunk-local position, or `None` if any axis is out of range.
    pub fn try_new(x: usize, y: usize, z: usize) -> Option<Self> {
        let size = CHUNK_SIZE as usize;
        (x < size && y < size && z < size).then_some(ChunkLocalBlockPos { x, y, z })
    }

    /// Inverse of [`ChunkLocalBlockPos::index`].
    ///
    /// # Panics
    /// Panics if `index` is not below `CHUNK_VOLUME`.
    pub fn from_index(index: usize) -> Self {
        let size = CHUNK_SIZE as usize;
        let x = index % size;
        let z = (index / size) % size;
        let y = index / (size * size);
        Self::new(x, y, z)
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn z(&self) -> usize {
        self.z
    }

    /// Linear index into a chunk's block array. x varies fastest, then z, then y.
    pub fn index(&self) -> usize {
        let size = CHUNK_SIZE as usize;
        self.x + size * (self.z + size * self.y)
    }

    /// Absolute block position given the chunk this position is relative to.
    pub fn to_block_pos(&self, chunk: ChunkPos) -> BlockPos {
        chunk
            .origin()
            .offset(self.x as i32, self.y as i32, self.z as i32)
    }

    /// Whether this position lies on the chunk face facing `side`.
    pub fn is_on_face(&self, side: BlockSide) -> bool {
        let last = CHUNK_SIZE as usize - 1;
        match side {
            BlockSide::LEFT => self.x == 0,
            BlockSide::RIGHT => self.x == last,
            BlockSide::BOTTOM => self.y == 0,
            BlockSide::TOP => self.y == last,
            BlockSide::BACK => self.z == 0,
            BlockSide::FRONT => self.z == last,
        }
    }

    /// Index of this position within the 2D mask of the face it lies on.
    ///
    /// The two axes not along the face normal form the plane; the same index is
    /// produced for the touching cell in the neighboring chunk's opposite face.
    pub fn face_index(&self, side: BlockSide) -> usize {
        let size = CHUNK_SIZE as usize;
        match side {
            BlockSide::LEFT | BlockSide::RIGHT => self.z + size * self.y,
            BlockSide::BOTTOM | BlockSide::TOP => self.x + size * self.z,
            BlockSide::BACK | BlockSide::FRONT => self.x + size * self.y,
        }
    }

    /// The cell of the face facing `side` at plane coordinates `(u, v)`, the
    /// inverse of [`ChunkLocalBlockPos::face_index`].
    pub fn on_face(side: BlockSide, u: usize, v: usize) -> Self {
        let last = CHUNK_SIZE as usize - 1;
        match side {
            BlockSide::LEFT => Self::new(0, v, u),
            BlockSide::RIGHT => Self::new(last, v, u),
            BlockSide::BOTTOM => Self::new(u, 0, v),
            BlockSide::TOP => Self::new(u, last, v),
            BlockSide::BACK => Self::new(u, v, 0),
            BlockSide::FRONT => Self::new(u, v, last),
        }
    }
}

/// Offsets of the 26 face, edge and corner neighbors of a chunk, in
/// lexicographic (x, y, z) order. The neighbor at `NEIGHBOR_OFFSETS[i]` sees
/// this chunk at `NEIGHBOR_OFFSETS[opposite_neighbor(i)]`.
pub const NEIGHBOR_OFFSETS: [[i32; 3]; 26] = {
    let mut offsets = [[0; 3]; 26];
    let mut slot = 0;
    let mut n = 0;
    while n < 27 {
        if n != 13 {
            offsets[slot] = [n / 9 - 1, (n / 3) % 3 - 1, n % 3 - 1];
            slot += 1;
        }
        n += 1;
    }
    offsets
};

/// Slot of the neighbor at the given offset, each component in `-1..=1`.
///
/// # Panics
/// Panics on the zero offset or on components outside `-1..=1`.
pub fn neighbor_index(offset: [i32; 3]) -> usize {
    let [dx, dy, dz] = offset;
    assert!(
        (-1..=1).contains(&dx) && (-1..=1).contains(&dy) && (-1..=1).contains(&dz),
        "neighbor offset {:?} is not adjacent",
        offset
    );
    let n = ((dx + 1) * 9 + (dy + 1) * 3 + (dz + 1)) as usize;
    assert!(n != 13, "a chunk is not its own neighbor");
    if n < 13 {
        n
    } else {
        n - 1
    }
}

/// Slot under which the neighbor in `slot` records this chunk.
pub fn opposite_neighbor(slot: usize) -> usize {
    25 - slot
}
