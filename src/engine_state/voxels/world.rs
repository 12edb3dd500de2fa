//! # World Module
//!
//! The chunk registry and the per-tick generation pipeline.
//!
//! ## Pipeline
//!
//! Each call to [`World::tick`] runs four steps:
//!
//! 1. **Area update**: when the load center moved into another chunk, chunks
//!    outside the load cylinder are unloaded and new ones inside it are queued
//!    for loading. All queues are re-prioritized around the new center.
//! 2. **Load**: up to `load_batch_size` chunks are generated (terrain and
//!    structure placement).
//! 3. **Populate**: up to `populate_batch_size` chunks whose 26 neighbors are
//!    generated get their deferred structure writes applied.
//! 4. **Mesh**: up to `mesh_batch_size` chunks whose 6 face neighbors are
//!    populated are meshed and handed to the render thread.
//!
//! Readiness is never polled. Every load stage change goes through
//! [`ChunkStatusMap::set_load_status`], which reports the chunks that became
//! ready, and those are queued right away.
//!
//! ## Queues
//!
//! The three queues are min-heaps keyed on the Manhattan distance from the load
//! center. Entries are not removed when a chunk's state changes under them;
//! each batch skips entries whose chunk is no longer in the expected stage.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Duration;

use log::{debug, info, trace};
use web_time::Instant;

use crate::config::WorldConfig;
use crate::engine_state::rendering::meshing::mesh::{culled, NeighborFaces};
use crate::engine_state::rendering::{MeshDeletion, MeshPayload, MeshQueues};
use crate::error::Result;

use super::block::{block_side::BlockSide, Block};
use super::chunk::{population::PopulationChange, Chunk};
use super::chunk_status::{ChunkStatusMap, LoadStatus, MeshStatus, ReadinessUpdate};
use super::coords::{BlockPos, ChunkPos, NEIGHBOR_OFFSETS};
use super::generation::structures::StructureRegistry;
use super::generation::WorldGenerator;

/// Priority queue of chunk positions, nearest to the load center first.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    heap: BinaryHeap<Reverse<(u32, ChunkPos)>>,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `position` with its distance from `center` as priority.
    pub fn push(&mut self, position: ChunkPos, center: ChunkPos) {
        let priority = center.offset(&position).manhattan();
        self.heap.push(Reverse((priority, position)));
    }

    /// Removes and returns the nearest queued position.
    pub fn pop(&mut self) -> Option<ChunkPos> {
        self.heap.pop().map(|Reverse((_, position))| position)
    }

    /// Recomputes every priority against a new center.
    pub fn reprioritize(&mut self, center: ChunkPos) {
        let positions: Vec<ChunkPos> = self
            .heap
            .drain()
            .map(|Reverse((_, position))| position)
            .collect();
        for position in positions {
            self.push(position, center);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// What one call to [`World::tick`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: u64,
    /// Chunks newly queued for loading by the area update.
    pub enqueued: usize,
    /// Chunks dropped by the area update.
    pub unloaded: usize,
    pub loaded: usize,
    pub populated: usize,
    pub meshed: usize,
    /// Mesh payloads pushed to the render thread.
    pub payloads: usize,
    /// Deletion notices pushed to the render thread.
    pub deletions: usize,
    pub elapsed: Duration,
}

impl TickSummary {
    /// Whether the tick changed anything at all.
    pub fn is_idle(&self) -> bool {
        self.enqueued + self.unloaded + self.loaded + self.populated + self.meshed == 0
    }
}

/// Snapshot of the world's size, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub tick: u64,
    /// Chunks present in the registry.
    pub loaded_chunks: usize,
    /// Chunks tracked by the status table, including queued ones.
    pub tracked_chunks: usize,
    pub populated_chunks: usize,
    /// Chunks whose last mesh was non-empty and handed to the render thread.
    pub meshed_chunks: usize,
    pub load_queue: usize,
    pub populate_queue: usize,
    pub mesh_queue: usize,
    pub structures: usize,
    pub cached_columns: usize,
}

/// The simulation-side world.
///
/// Owns every loaded chunk, the status table and the structure registry. Only
/// the simulation thread touches it; finished meshes leave through the
/// [`MeshQueues`] given at construction.
pub struct World {
    config: WorldConfig,
    generator: WorldGenerator,
    chunks: HashMap<ChunkPos, Chunk>,
    status: ChunkStatusMap,
    structures: StructureRegistry,
    load_queue: ChunkQueue,
    populate_queue: ChunkQueue,
    mesh_queue: ChunkQueue,
    load_center: ChunkPos,
    center_dirty: bool,
    /// Chunks the render thread currently holds a mesh for.
    resident_meshes: HashSet<ChunkPos>,
    mesh_queues: MeshQueues,
    pending_payloads: Vec<MeshPayload>,
    pending_deletions: Vec<MeshDeletion>,
    tick: u64,
}

impl World {
    /// Creates an empty world centered on the origin chunk.
    ///
    /// Nothing is loaded until the first [`tick`](Self::tick).
    ///
    /// # Errors
    /// Fails if `config` does not validate or one of its noise graphs cannot
    /// be parsed.
    pub fn new(config: WorldConfig, mesh_queues: MeshQueues) -> Result<Self> {
        config.validate()?;
        let generator = WorldGenerator::new(&config)?;
        info!(
            "World created with seed {} and load distance {}/{}",
            config.seed, config.load_distance, config.vertical_load_distance
        );
        Ok(World {
            config,
            generator,
            chunks: HashMap::new(),
            status: ChunkStatusMap::new(),
            structures: StructureRegistry::new(),
            load_queue: ChunkQueue::new(),
            populate_queue: ChunkQueue::new(),
            mesh_queue: ChunkQueue::new(),
            load_center: ChunkPos::new(0, 0, 0),
            center_dirty: true,
            resident_meshes: HashSet::new(),
            mesh_queues,
            pending_payloads: Vec::new(),
            pending_deletions: Vec::new(),
            tick: 0,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn load_center(&self) -> ChunkPos {
        self.load_center
    }

    /// Moves the load center to the chunk containing `position`.
    ///
    /// The area update runs on the next tick, and only if the chunk changed.
    pub fn set_load_center(&mut self, position: BlockPos) {
        let center = position.chunk();
        if center != self.load_center {
            self.load_center = center;
            self.center_dirty = true;
        }
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn chunk(&self, position: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn status(&self) -> &ChunkStatusMap {
        &self.status
    }

    pub fn structures(&self) -> &StructureRegistry {
        &self.structures
    }

    /// The block at `position`, if its chunk is loaded.
    pub fn block_at(&self, position: BlockPos) -> Option<Block> {
        self.chunks
            .get(&position.chunk())
            .map(|chunk| chunk.get(position.local()))
    }

    /// Replaces the block at `position`.
    ///
    /// Only populated chunks can be edited; earlier writes would be overwritten
    /// or shadowed by the pipeline. The chunk is queued for meshing again, and
    /// so is every face neighbor whose touching face the edit lies on.
    ///
    /// # Returns
    /// `true` if the block was written.
    pub fn set_block(&mut self, position: BlockPos, block: Block) -> bool {
        let chunk_position = position.chunk();
        let local = position.local();
        match self.chunks.get_mut(&chunk_position) {
            Some(chunk) if chunk.is_populated() => chunk.set(local, block),
            _ => return false,
        }

        self.requeue_mesh(chunk_position);
        for side in BlockSide::all() {
            if local.is_on_face(side) {
                self.requeue_mesh(chunk_position.neighbor(side));
            }
        }
        trace!("Block {} set to {:?}", position, block);
        true
    }

    fn requeue_mesh(&mut self, position: ChunkPos) {
        if self.status.mesh_status(position) == MeshStatus::Meshed {
            self.status.set_mesh_status(position, MeshStatus::Queued);
            self.mesh_queue.push(position, self.load_center);
        }
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            loaded_chunks: self.chunks.len(),
            tracked_chunks: self.status.len(),
            populated_chunks: self.status.positions_with(LoadStatus::Populated).count(),
            meshed_chunks: self.resident_meshes.len(),
            load_queue: self.load_queue.len(),
            populate_queue: self.populate_queue.len(),
            mesh_queue: self.mesh_queue.len(),
            structures: self.structures.len(),
            cached_columns: self.generator.cached_columns(),
        }
    }

    /// Advances the pipeline by one step.
    ///
    /// # Returns
    /// A summary of what changed. Payloads and deletion notices produced in
    /// this tick are pushed to the mesh queues as one batch each before
    /// returning.
    pub fn tick(&mut self) -> TickSummary {
        self.tick += 1;
        let time = Instant::now();
        let mut summary = TickSummary {
            tick: self.tick,
            ..TickSummary::default()
        };

        if self.center_dirty {
            self.update_load_area(&mut summary);
            self.center_dirty = false;
        }
        self.load_batch(&mut summary);
        self.populate_batch(&mut summary);
        self.mesh_batch(&mut summary);

        summary.payloads = self.pending_payloads.len();
        summary.deletions = self.pending_deletions.len();
        if !self.pending_deletions.is_empty() {
            self.mesh_queues
                .deletions
                .push_batch(std::mem::take(&mut self.pending_deletions));
        }
        if !self.pending_payloads.is_empty() {
            self.mesh_queues
                .meshes
                .push_batch(std::mem::take(&mut self.pending_payloads));
        }

        summary.elapsed = time.elapsed();
        if !summary.is_idle() {
            debug!(
                "Tick {}: +{} queued, -{} unloaded, {} loaded, {} populated, {} meshed in {:?}",
                summary.tick,
                summary.enqueued,
                summary.unloaded,
                summary.loaded,
                summary.populated,
                summary.meshed,
                summary.elapsed
            );
        }
        summary
    }

    /// Runs ticks until one does nothing, at most `max_ticks` times.
    ///
    /// # Returns
    /// The number of ticks run.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        for ran in 1..=max_ticks {
            if self.tick().is_idle() {
                return ran;
            }
        }
        max_ticks
    }

    fn in_range(&self, position: ChunkPos) -> bool {
        let offset = self.load_center.offset(&position);
        let horizontal = self.config.load_distance as i64;
        offset.horizontal_length_squared() <= horizontal * horizontal
            && offset.y.abs() <= self.config.vertical_load_distance
    }

    fn update_load_area(&mut self, summary: &mut TickSummary) {
        let out_of_range: Vec<ChunkPos> = [
            LoadStatus::QueuedLoad,
            LoadStatus::Loaded,
            LoadStatus::Generated,
            LoadStatus::QueuedPopulate,
            LoadStatus::Populated,
        ]
        .into_iter()
        .flat_map(|load| self.status.positions_with(load).collect::<Vec<_>>())
        .filter(|position| !self.in_range(*position))
        .collect();
        for position in out_of_range {
            self.unload(position);
            summary.unloaded += 1;
        }

        let center = self.load_center;
        let horizontal = self.config.load_distance;
        let vertical = self.config.vertical_load_distance;
        for dx in -horizontal..=horizontal {
            for dz in -horizontal..=horizontal {
                if (dx * dx + dz * dz) as i64 > horizontal as i64 * horizontal as i64 {
                    continue;
                }
                for dy in -vertical..=vertical {
                    let position = center.translated(dx, dy, dz);
                    if self.status.load_status(position) == LoadStatus::NonExistent {
                        let update = self.status.set_load_status(position, LoadStatus::QueuedLoad);
                        self.apply_readiness(update);
                        self.load_queue.push(position, center);
                        summary.enqueued += 1;
                    }
                }
            }
        }

        self.load_queue.reprioritize(center);
        self.populate_queue.reprioritize(center);
        self.mesh_queue.reprioritize(center);
        debug!(
            "Load center {}: {} queued, {} unloaded, {} tracked",
            center,
            summary.enqueued,
            summary.unloaded,
            self.status.len()
        );
    }

    fn unload(&mut self, position: ChunkPos) {
        if self.resident_meshes.remove(&position) {
            self.pending_deletions.push(MeshDeletion {
                position,
                tick: self.tick,
            });
        }
        self.chunks.remove(&position);
        // Meshed face neighbors were culled against this chunk; they mesh again
        // once it is populated again. Queued ones are reset by `mesh_batch`.
        for side in BlockSide::all() {
            let neighbor = position.neighbor(side);
            if self.status.mesh_status(neighbor) == MeshStatus::Meshed {
                self.status.set_mesh_status(neighbor, MeshStatus::NonExistent);
            }
        }
        let removed = self.structures.remove_chunk(position);
        let update = self.status.set_load_status(position, LoadStatus::NonExistent);
        self.apply_readiness(update);
        trace!("Unloaded chunk {} ({} structures dropped)", position, removed);
    }

    /// Queues every chunk an update reported as ready.
    fn apply_readiness(&mut self, update: ReadinessUpdate) {
        let mut pending = vec![update];
        while let Some(update) = pending.pop() {
            for position in update.populate_ready {
                if self.status.load_status(position) == LoadStatus::Generated {
                    pending.push(
                        self.status
                            .set_load_status(position, LoadStatus::QueuedPopulate),
                    );
                    self.populate_queue.push(position, self.load_center);
                }
            }
            for position in update.mesh_ready {
                if self.status.mesh_status(position) == MeshStatus::NonExistent {
                    self.status.set_mesh_status(position, MeshStatus::Queued);
                    self.mesh_queue.push(position, self.load_center);
                }
            }
        }
    }

    fn load_batch(&mut self, summary: &mut TickSummary) {
        while summary.loaded < self.config.load_batch_size {
            let Some(position) = self.load_queue.pop() else {
                break;
            };
            if self.status.load_status(position) != LoadStatus::QueuedLoad {
                continue;
            }

            let update = self.status.set_load_status(position, LoadStatus::Loaded);
            self.apply_readiness(update);
            let chunk = self.generator.generate_chunk(position, &mut self.structures);
            self.chunks.insert(position, chunk);
            let update = self.status.set_load_status(position, LoadStatus::Generated);
            self.apply_readiness(update);
            summary.loaded += 1;
        }
    }

    fn populate_batch(&mut self, summary: &mut TickSummary) {
        while summary.populated < self.config.populate_batch_size {
            let Some(position) = self.populate_queue.pop() else {
                break;
            };
            if self.status.load_status(position) != LoadStatus::QueuedPopulate {
                continue;
            }
            if !self.status.can_populate(position) {
                // A neighbor was unloaded; the chunk is reported again once it is back.
                let update = self.status.set_load_status(position, LoadStatus::Generated);
                self.apply_readiness(update);
                continue;
            }

            let incoming: Vec<PopulationChange> = NEIGHBOR_OFFSETS
                .iter()
                .filter_map(|[dx, dy, dz]| self.chunks.get(&position.translated(*dx, *dy, *dz)))
                .flat_map(|neighbor| neighbor.adjacent_changes_for(position))
                .collect();
            let written = match self.chunks.get_mut(&position) {
                Some(chunk) => chunk.apply_population(incoming),
                None => panic!("chunk {} queued for population is not loaded", position),
            };
            trace!("Populated chunk {} ({} cells written)", position, written);

            let update = self.status.set_load_status(position, LoadStatus::Populated);
            self.apply_readiness(update);
            summary.populated += 1;
        }
    }

    fn mesh_batch(&mut self, summary: &mut TickSummary) {
        while summary.meshed < self.config.mesh_batch_size {
            let Some(position) = self.mesh_queue.pop() else {
                break;
            };
            if self.status.mesh_status(position) != MeshStatus::Queued {
                continue;
            }
            if !self.status.can_mesh(position) {
                self.status.set_mesh_status(position, MeshStatus::NonExistent);
                continue;
            }

            let chunk = match self.chunks.get(&position) {
                Some(chunk) => chunk,
                None => panic!("chunk {} queued for meshing is not loaded", position),
            };
            let neighbors: NeighborFaces = BlockSide::all().map(|side| {
                self.chunks
                    .get(&position.neighbor(side))
                    .map(|neighbor| neighbor.solid_face_mask(side.opposite()))
            });
            let mesh = culled(chunk, &neighbors);

            if mesh.is_empty() {
                if self.resident_meshes.remove(&position) {
                    self.pending_deletions.push(MeshDeletion {
                        position,
                        tick: self.tick,
                    });
                }
            } else {
                self.resident_meshes.insert(position);
                self.pending_payloads.push(MeshPayload {
                    position,
                    tick: self.tick,
                    mesh,
                });
            }
            self.status.set_mesh_status(position, MeshStatus::Meshed);
            summary.meshed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::meshing::mesh::Mesh;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::{CHUNK_SIZE, SEA_LEVEL};

    /// 49 columns of 5 chunks: the chunks next to the center can still be
    /// meshed, since their face neighbors have all 26 of theirs loaded.
    const AREA: usize = 49 * 5;

    fn small_config(seed: u64) -> WorldConfig {
        WorldConfig {
            seed,
            load_distance: 4,
            vertical_load_distance: 2,
            load_batch_size: 64,
            populate_batch_size: 64,
            mesh_batch_size: 64,
            ..WorldConfig::default()
        }
    }

    fn world(seed: u64) -> World {
        World::new(small_config(seed), MeshQueues::new()).unwrap()
    }

    #[test]
    fn queue_pops_nearest_first() {
        let center = ChunkPos::new(0, 0, 0);
        let mut queue = ChunkQueue::new();
        queue.push(ChunkPos::new(3, 0, 0), center);
        queue.push(ChunkPos::new(1, 0, 0), center);
        queue.push(ChunkPos::new(0, 2, 0), center);
        assert_eq!(queue.pop(), Some(ChunkPos::new(1, 0, 0)));
        assert_eq!(queue.pop(), Some(ChunkPos::new(0, 2, 0)));
        assert_eq!(queue.pop(), Some(ChunkPos::new(3, 0, 0)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn reprioritize_follows_the_new_center() {
        let mut queue = ChunkQueue::new();
        let origin = ChunkPos::new(0, 0, 0);
        queue.push(ChunkPos::new(0, 0, 0), origin);
        queue.push(ChunkPos::new(5, 0, 0), origin);
        queue.reprioritize(ChunkPos::new(6, 0, 0));
        assert_eq!(queue.pop(), Some(ChunkPos::new(5, 0, 0)));
    }

    #[test]
    fn first_tick_queues_the_load_cylinder() {
        let mut world = world(1);
        let summary = world.tick();
        assert_eq!(summary.enqueued, AREA);
        assert_eq!(summary.loaded, 64);
        assert_eq!(world.stats().loaded_chunks, 64);
        assert_eq!(world.stats().load_queue, AREA - 64);
    }

    #[test]
    fn settled_world_populates_and_meshes_its_interior() {
        let mut world = world(2);
        world.settle(32);
        let center = ChunkPos::new(0, 0, 0);
        assert_eq!(world.status().load_status(center), LoadStatus::Populated);
        assert_eq!(world.status().mesh_status(center), MeshStatus::Meshed);
        // The rim never has all 26 neighbors generated.
        let rim = ChunkPos::new(4, 0, 0);
        assert_eq!(world.status().load_status(rim), LoadStatus::Generated);
    }

    #[test]
    fn block_edits_need_a_populated_chunk() {
        let mut world = world(3);
        world.settle(32);
        let inside = BlockPos::new(4, SEA_LEVEL + 40, 4);
        assert!(world.set_block(inside, Block::new(BlockType::STONE)));
        assert_eq!(world.block_at(inside), Some(Block::new(BlockType::STONE)));

        let rim = BlockPos::new(4 * CHUNK_SIZE + 1, 0, 0);
        assert!(!world.set_block(rim, Block::new(BlockType::STONE)));
        assert!(world.block_at(BlockPos::new(40 * CHUNK_SIZE, 0, 0)).is_none());
    }

    #[test]
    fn boundary_edit_requeues_the_face_neighbor() {
        let mut world = world(4);
        world.settle(32);
        let center = ChunkPos::new(0, 0, 0);
        let east = center.neighbor(BlockSide::RIGHT);
        let north = center.neighbor(BlockSide::FRONT);
        assert_eq!(world.status().mesh_status(east), MeshStatus::Meshed);
        assert_eq!(world.status().mesh_status(north), MeshStatus::Meshed);

        assert!(world.set_block(BlockPos::new(CHUNK_SIZE - 1, 3, 3), Block::AIR));
        assert_eq!(world.status().mesh_status(center), MeshStatus::Queued);
        assert_eq!(world.status().mesh_status(east), MeshStatus::Queued);
        assert_eq!(world.status().mesh_status(north), MeshStatus::Meshed);
        world.tick();
        assert_eq!(world.status().mesh_status(center), MeshStatus::Meshed);
    }

    #[test]
    fn moving_the_center_unloads_and_notifies() {
        let queues = MeshQueues::new();
        let mut world = World::new(small_config(5), queues.clone()).unwrap();
        world.settle(32);
        let meshed = world.stats().meshed_chunks;
        queues.meshes.drain();

        world.set_load_center(BlockPos::new(20 * CHUNK_SIZE, 0, 0));
        let summary = world.tick();
        assert_eq!(summary.unloaded, AREA);
        assert_eq!(summary.deletions, meshed);
        assert_eq!(queues.deletions.len(), meshed);
        assert_eq!(world.stats().meshed_chunks, 0);
        assert!(world.chunk(ChunkPos::new(0, 0, 0)).is_none());
    }

    /// The last mesh sent for `position`, draining the queue.
    fn latest_mesh(queues: &MeshQueues, position: ChunkPos) -> Option<Mesh> {
        queues
            .meshes
            .drain()
            .into_iter()
            .filter(|payload| payload.position == position)
            .last()
            .map(|payload| payload.mesh)
    }

    #[test]
    fn neighbor_reload_remeshes_the_boundary() {
        let west = ChunkPos::new(1, 0, 0);
        let east = ChunkPos::new(2, 0, 0);
        // A generated air cell on the west face of `east`.
        let (queues, mut world, cell) = (0..16)
            .find_map(|seed| {
                let queues = MeshQueues::new();
                let mut world = World::new(small_config(seed), queues.clone()).unwrap();
                world.settle(32);
                let cell = (0..CHUNK_SIZE)
                    .flat_map(|z| (0..CHUNK_SIZE).map(move |y| east.origin().offset(0, y, z)))
                    .find(|cell| world.block_at(*cell) == Some(Block::AIR))?;
                Some((queues, world, cell))
            })
            .expect("no air on the boundary");
        assert_eq!(world.status().mesh_status(west), MeshStatus::Meshed);

        let stone = Block::new(BlockType::STONE);
        assert!(world.set_block(cell.offset(-1, 0, 0), stone));
        world.settle(32);
        let before = latest_mesh(&queues, west).expect("west was not remeshed");

        assert!(world.set_block(cell, stone));
        world.settle(32);
        let covered = latest_mesh(&queues, west).expect("west was not remeshed");
        assert_ne!(covered, before);

        world.set_load_center(BlockPos::new(-3 * CHUNK_SIZE, 0, 0));
        world.tick();
        assert!(world.chunk(east).is_none());
        assert!(world.chunk(west).is_some());
        assert_eq!(world.status().mesh_status(west), MeshStatus::NonExistent);

        world.set_load_center(BlockPos::new(0, 0, 0));
        world.settle(32);
        assert_eq!(world.block_at(cell), Some(Block::AIR));
        assert_eq!(world.status().mesh_status(west), MeshStatus::Meshed);
        assert_eq!(latest_mesh(&queues, west), Some(before));
    }

    #[test]
    fn queued_population_survives_a_neighbor_unload() {
        let config = WorldConfig {
            load_batch_size: 1024,
            populate_batch_size: 1,
            ..small_config(8)
        };
        let mut world = World::new(config, MeshQueues::new()).unwrap();
        let chunk = ChunkPos::new(2, 0, 0);
        world.tick();
        assert_eq!(world.status().load_status(chunk), LoadStatus::QueuedPopulate);

        // Drops (3, 0, 1), one of the chunk's neighbors.
        world.set_load_center(BlockPos::new(-CHUNK_SIZE, 0, 0));
        for _ in 0..200 {
            world.tick();
            if world.status().load_status(chunk) == LoadStatus::Generated {
                break;
            }
        }
        assert_eq!(world.status().load_status(chunk), LoadStatus::Generated);
        assert!(!world.status().can_populate(chunk));

        world.set_load_center(BlockPos::new(0, 0, 0));
        world.settle(400);
        assert_eq!(world.status().load_status(chunk), LoadStatus::Populated);
        let west = chunk.neighbor(BlockSide::LEFT);
        assert_eq!(world.status().mesh_status(west), MeshStatus::Meshed);
    }

    #[test]
    fn queued_mesh_survives_a_neighbor_unload() {
        let config = WorldConfig {
            load_batch_size: 1024,
            populate_batch_size: 1024,
            mesh_batch_size: 1,
            ..small_config(9)
        };
        let mut world = World::new(config, MeshQueues::new()).unwrap();
        let chunk = ChunkPos::new(1, 0, 0);
        world.tick();
        assert_eq!(world.status().mesh_status(chunk), MeshStatus::Queued);

        // Drops (2, 0, 0), the chunk's east neighbor.
        world.set_load_center(BlockPos::new(-3 * CHUNK_SIZE, 0, 0));
        for _ in 0..200 {
            world.tick();
            if world.status().mesh_status(chunk) == MeshStatus::NonExistent {
                break;
            }
        }
        assert_eq!(world.status().mesh_status(chunk), MeshStatus::NonExistent);
        assert_eq!(world.status().load_status(chunk), LoadStatus::Populated);

        world.set_load_center(BlockPos::new(0, 0, 0));
        world.settle(400);
        assert_eq!(world.status().mesh_status(chunk), MeshStatus::Meshed);
    }

    #[test]
    fn set_load_center_within_a_chunk_is_not_an_area_update() {
        let mut world = world(6);
        world.tick();
        world.set_load_center(BlockPos::new(5, 5, 5));
        assert_eq!(world.tick().enqueued, 0);
    }

    #[test]
    fn stats_count_the_structure_registry() {
        let mut world = world(7);
        world.settle(32);
        let stats = world.stats();
        assert_eq!(stats.structures, world.structures().len());
        assert!(stats.cached_columns > 0);
        assert_eq!(stats.tick, world.tick_count());
    }
}
