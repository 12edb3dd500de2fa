//! # Structures Module
//!
//! Trees and cacti placed on top of generated terrain.
//!
//! Placement happens while a chunk generates. Every block of a structure is
//! written through [`Chunk::set_block_population`], so parts that reach into
//! neighboring chunks are deferred until those chunks populate. Trunks are
//! written with a higher age than leaves: wherever two structures overlap, a
//! trunk survives and a leaf gives way.
//!
//! Each structure is recorded in the [`StructureRegistry`] under its origin (the
//! block its trunk or stem starts at) together with its bounding box and the
//! chunk that placed it.

use std::collections::HashMap;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::chunk::population::PopulationAge;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::coords::{BlockPos, ChunkPos};
use crate::engine_state::voxels::CHUNK_SIZE;

use super::chunk_rng::chunk_rng;
use super::ColumnParameters;

/// Age of trunk, log and cactus writes.
pub const TRUNK_AGE: PopulationAge = 10;
/// Age of leaf writes.
pub const LEAF_AGE: PopulationAge = 5;

/// Placement attempts per chunk.
const PLACEMENT_ATTEMPTS: usize = 8;

/// Kinds of structures the generator places.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    OakTree,
    SpruceTree,
    Cactus,
}

/// Axis-aligned box in block space. `min` is wrapped like any `BlockPos`, so a
/// box may straddle the world seam.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min: BlockPos,
    pub size: [i32; 3],
}

impl BoundingBox {
    pub fn new(min: BlockPos, size: [i32; 3]) -> Self {
        BoundingBox { min, size }
    }

    /// Whether the two boxes share at least one block.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let delta = self.min.delta_to(&other.min);
        let overlaps = |delta: i32, own: i32, theirs: i32| -theirs < delta && delta < own;
        overlaps(delta.x, self.size[0], other.size[0])
            && overlaps(delta.y, self.size[1], other.size[1])
            && overlaps(delta.z, self.size[2], other.size[2])
    }

    /// Whether `pos` lies inside the box.
    pub fn contains(&self, pos: BlockPos) -> bool {
        let delta = self.min.delta_to(&pos);
        (0..self.size[0]).contains(&delta.x)
            && (0..self.size[1]).contains(&delta.y)
            && (0..self.size[2]).contains(&delta.z)
    }
}

/// A placed structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub kind: StructureKind,
    pub origin: BlockPos,
    pub bounds: BoundingBox,
    /// Chunk whose generation placed this structure.
    pub source_chunk: ChunkPos,
}

/// Every structure placed by a currently loaded chunk.
#[derive(Debug, Default)]
pub struct StructureRegistry {
    structures: HashMap<BlockPos, Structure>,
    by_chunk: HashMap<ChunkPos, Vec<BlockPos>>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, structure: Structure) {
        self.by_chunk
            .entry(structure.source_chunk)
            .or_default()
            .push(structure.origin);
        self.structures.insert(structure.origin, structure);
    }

    /// The structure whose origin is `origin`, if any.
    pub fn get(&self, origin: BlockPos) -> Option<&Structure> {
        self.structures.get(&origin)
    }

    /// Structures whose bounding box intersects `bounds`.
    pub fn intersecting<'a>(
        &'a self,
        bounds: &'a BoundingBox,
    ) -> impl Iterator<Item = &'a Structure> + 'a {
        self.structures
            .values()
            .filter(move |structure| structure.bounds.intersects(bounds))
    }

    /// Structures placed by the chunk at `chunk`.
    pub fn placed_by(&self, chunk: ChunkPos) -> impl Iterator<Item = &Structure> + '_ {
        self.by_chunk
            .get(&chunk)
            .into_iter()
            .flatten()
            .filter_map(|origin| self.structures.get(origin))
    }

    /// Forgets every structure `chunk` placed.
    ///
    /// # Returns
    /// The number of structures removed.
    pub fn remove_chunk(&mut self, chunk: ChunkPos) -> usize {
        let origins = self.by_chunk.remove(&chunk).unwrap_or_default();
        for origin in &origins {
            self.structures.remove(origin);
        }
        origins.len()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

/// One placement attempt, drawn up front so that rejected attempts consume the
/// same random values as accepted ones.
struct Attempt {
    local_x: usize,
    local_z: usize,
    chance: u32,
    shape: u32,
}

/// Places the structures of `chunk` and records them in `registry`.
///
/// A structure is rooted in the chunk containing the block just above its
/// column's surface, so every column is decided by exactly one chunk. A
/// candidate whose bounding box intersects a structure this chunk already
/// placed is rejected.
///
/// # Returns
/// The number of structures placed.
pub fn place_structures(
    chunk: &mut Chunk,
    column: &ColumnParameters,
    world_seed: u64,
    registry: &mut StructureRegistry,
) -> usize {
    let position = chunk.position();
    let bottom = position.y() * CHUNK_SIZE;
    let top = bottom + CHUNK_SIZE - 1;
    if column.max_height + 1 < bottom || column.min_height + 1 > top {
        return 0;
    }

    let mut rng = chunk_rng(world_seed, position);
    let size = CHUNK_SIZE as usize;
    let attempts: Vec<Attempt> = (0..PLACEMENT_ATTEMPTS)
        .map(|_| Attempt {
            local_x: rng.usize(..size),
            local_z: rng.usize(..size),
            chance: rng.u32(..PLACEMENT_ATTEMPTS as u32),
            shape: rng.u32(..),
        })
        .collect();

    let mut placed = 0;
    for attempt in attempts {
        let surface = column.height(attempt.local_x, attempt.local_z);
        let root_y = surface + 1;
        if !(bottom..=top).contains(&root_y) {
            continue;
        }
        let biome = column.biome(attempt.local_x, attempt.local_z);
        let Some((density, kind)) = biome.structure() else {
            continue;
        };
        if attempt.chance >= density {
            continue;
        }

        let origin = position
            .origin()
            .offset(attempt.local_x as i32, root_y - bottom, attempt.local_z as i32);
        let shape = Shape::new(kind, attempt.shape);
        let bounds = shape.bounds(origin);
        let blocked = registry
            .intersecting(&bounds)
            .any(|other| other.source_chunk == position);
        if blocked {
            log::trace!("Rejected {:?} at {} in chunk {}", kind, origin, position);
            continue;
        }

        shape.write(chunk, origin);
        registry.insert(Structure {
            kind,
            origin,
            bounds,
            source_chunk: position,
        });
        placed += 1;
    }
    placed
}

/// A structure kind with its rolled dimensions.
#[derive(Copy, Clone, Debug)]
struct Shape {
    kind: StructureKind,
    height: i32,
}

impl Shape {
    fn new(kind: StructureKind, roll: u32) -> Self {
        let (base, spread) = match kind {
            StructureKind::OakTree => (4, 3),
            StructureKind::SpruceTree => (6, 3),
            StructureKind::Cactus => (2, 3),
        };
        Shape {
            kind,
            height: base + (roll % spread) as i32,
        }
    }

    fn bounds(&self, origin: BlockPos) -> BoundingBox {
        match self.kind {
            StructureKind::OakTree | StructureKind::SpruceTree => {
                BoundingBox::new(origin.offset(-2, 0, -2), [5, self.height + 1, 5])
            }
            StructureKind::Cactus => BoundingBox::new(origin, [1, self.height, 1]),
        }
    }

    fn write(&self, chunk: &mut Chunk, origin: BlockPos) {
        let log = Block::new(BlockType::LOG);
        let leaves = Block::new(BlockType::LEAVES);
        match self.kind {
            StructureKind::OakTree => {
                for dy in 0..self.height {
                    chunk.set_block_population(origin.offset(0, dy, 0), log, TRUNK_AGE);
                }
                let crown = self.height - 1;
                for dy in -2..=1 {
                    let radius: i32 = if dy <= 0 { 2 } else { 1 };
                    for dx in -radius..=radius {
                        for dz in -radius..=radius {
                            if radius == 2 && dx.abs() == 2 && dz.abs() == 2 {
                                continue;
                            }
                            chunk.set_block_population(
                                origin.offset(dx, crown + dy, dz),
                                leaves,
                                LEAF_AGE,
                            );
                        }
                    }
                }
            }
            StructureKind::SpruceTree => {
                for dy in 0..self.height {
                    chunk.set_block_population(origin.offset(0, dy, 0), log, TRUNK_AGE);
                }
                for dy in 2..=self.height {
                    let radius = ((self.height - dy + 1) / 2).min(2);
                    for dx in -radius..=radius {
                        for dz in -radius..=radius {
                            if radius > 0 && dx.abs() == radius && dz.abs() == radius {
                                continue;
                            }
                            chunk.set_block_population(origin.offset(dx, dy, dz), leaves, LEAF_AGE);
                        }
                    }
                }
            }
            StructureKind::Cactus => {
                let cactus = Block::new(BlockType::CACTUS);
                for dy in 0..self.height {
                    chunk.set_block_population(origin.offset(0, dy, 0), cactus, TRUNK_AGE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::generation::biome::Biome;
    use crate::engine_state::voxels::{CHUNK_AREA, WORLD_RADIUS_BLOCK};

    fn flat_column(height: i32, biome: Biome) -> ColumnParameters {
        ColumnParameters {
            heights: vec![height; CHUNK_AREA],
            biomes: vec![biome; CHUNK_AREA],
            min_height: height,
            max_height: height,
        }
    }

    #[test]
    fn boxes_intersect_across_the_seam() {
        let east = BoundingBox::new(BlockPos::new(WORLD_RADIUS_BLOCK - 2, 0, 0), [3, 3, 3]);
        let west = BoundingBox::new(BlockPos::new(-WORLD_RADIUS_BLOCK, 1, 1), [2, 2, 2]);
        assert!(east.intersects(&west));
        assert!(west.intersects(&east));
        assert!(east.contains(BlockPos::new(-WORLD_RADIUS_BLOCK, 0, 0)));

        let far = BoundingBox::new(BlockPos::new(-WORLD_RADIUS_BLOCK + 1, 0, 0), [2, 2, 2]);
        assert!(!east.intersects(&far));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(BlockPos::new(0, 0, 0), [2, 2, 2]);
        let b = BoundingBox::new(BlockPos::new(2, 0, 0), [2, 2, 2]);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn registry_forgets_a_chunks_structures() {
        let mut registry = StructureRegistry::new();
        let chunk = ChunkPos::new(0, 0, 0);
        let other = ChunkPos::new(1, 0, 0);
        for (origin, source) in [
            (BlockPos::new(1, 5, 1), chunk),
            (BlockPos::new(9, 5, 9), chunk),
            (BlockPos::new(40, 5, 1), other),
        ] {
            registry.insert(Structure {
                kind: StructureKind::Cactus,
                origin,
                bounds: BoundingBox::new(origin, [1, 3, 1]),
                source_chunk: source,
            });
        }
        assert_eq!(registry.placed_by(chunk).count(), 2);
        assert_eq!(registry.remove_chunk(chunk), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(BlockPos::new(40, 5, 1)).is_some());
        assert!(registry.get(BlockPos::new(1, 5, 1)).is_none());
    }

    #[test]
    fn placement_is_deterministic() {
        let column = flat_column(40, Biome::Rainforest);
        let position = ChunkPos::new(0, 1, 0);

        let run = || {
            let mut chunk = Chunk::new(position);
            let mut registry = StructureRegistry::new();
            let placed = place_structures(&mut chunk, &column, 77, &mut registry);
            (
                placed,
                chunk.population_changes().to_vec(),
                chunk.adjacent_population_changes().to_vec(),
            )
        };
        let first = run();
        assert!(first.0 > 0, "rainforest chunk placed nothing");
        assert_eq!(first, run());
    }

    #[test]
    fn accepted_structures_from_one_chunk_never_overlap() {
        let column = flat_column(40, Biome::Rainforest);
        for seed in 0..20 {
            let mut chunk = Chunk::new(ChunkPos::new(0, 1, 0));
            let mut registry = StructureRegistry::new();
            place_structures(&mut chunk, &column, seed, &mut registry);
            let placed: Vec<_> = registry.placed_by(chunk.position()).copied().collect();
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    assert!(!a.bounds.intersects(&b.bounds), "seed {seed}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn only_the_surface_chunk_places() {
        let column = flat_column(40, Biome::Forest);
        let mut registry = StructureRegistry::new();
        let mut below = Chunk::new(ChunkPos::new(0, 0, 0));
        let mut above = Chunk::new(ChunkPos::new(0, 2, 0));
        assert_eq!(place_structures(&mut below, &column, 5, &mut registry), 0);
        assert_eq!(place_structures(&mut above, &column, 5, &mut registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn oak_crown_skips_its_corners_and_keeps_the_trunk() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0, 0));
        let origin = BlockPos::new(8, 2, 8);
        let oak = Shape::new(StructureKind::OakTree, 0);
        assert_eq!(oak.height, 4);
        oak.write(&mut chunk, origin);
        assert!(chunk.adjacent_population_changes().is_empty());

        let leaves = chunk
            .population_changes()
            .iter()
            .filter(|change| change.block.block_type() == Some(BlockType::LEAVES))
            .count();
        // Three 5x5 layers without corners plus a 3x3 cap.
        assert_eq!(leaves, 3 * 21 + 9);

        chunk.apply_population(std::iter::empty());
        let crown = origin.offset(0, oak.height - 1, 0);
        let at = |pos: BlockPos| chunk.get(pos.local()).block_type();
        assert_eq!(at(crown), Some(BlockType::LOG));
        assert_eq!(at(crown.offset(2, 0, 1)), Some(BlockType::LEAVES));
        assert!(chunk.get(crown.offset(2, 0, 2).local()).is_air());
        assert_eq!(at(crown.offset(1, 1, 1)), Some(BlockType::LEAVES));
        assert!(chunk.get(crown.offset(2, 1, 0).local()).is_air());
    }

    #[test]
    fn tundra_grows_nothing() {
        let column = flat_column(40, Biome::Tundra);
        let mut chunk = Chunk::new(ChunkPos::new(0, 1, 0));
        let mut registry = StructureRegistry::new();
        assert_eq!(place_structures(&mut chunk, &column, 5, &mut registry), 0);
    }
}
