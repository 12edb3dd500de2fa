use toroidal_voxel_world::config::WorldConfig;
use toroidal_voxel_world::engine_state::rendering::{MeshConsumer, MeshQueues};
use toroidal_voxel_world::engine_state::voxels::block::{block_type::BlockType, Block};
use toroidal_voxel_world::engine_state::voxels::chunk::Chunk;
use toroidal_voxel_world::engine_state::voxels::chunk_status::{LoadStatus, MeshStatus};
use toroidal_voxel_world::engine_state::voxels::coords::{BlockPos, ChunkLocalBlockPos, ChunkPos};
use toroidal_voxel_world::engine_state::voxels::generation::structures::{
    StructureRegistry, LEAF_AGE, TRUNK_AGE,
};
use toroidal_voxel_world::engine_state::voxels::generation::WorldGenerator;
use toroidal_voxel_world::engine_state::voxels::world::World;
use toroidal_voxel_world::engine_state::voxels::{CHUNK_SIZE, WORLD_RADIUS_CHUNK};

fn config(seed: u64) -> WorldConfig {
    WorldConfig {
        seed,
        load_distance: 4,
        vertical_load_distance: 2,
        load_batch_size: 128,
        populate_batch_size: 128,
        mesh_batch_size: 128,
        ..WorldConfig::default()
    }
}

fn same_blocks(a: &Chunk, b: &Chunk) -> bool {
    (0..CHUNK_SIZE as usize).all(|x| {
        (0..CHUNK_SIZE as usize).all(|y| {
            (0..CHUNK_SIZE as usize).all(|z| {
                let local = ChunkLocalBlockPos::new(x, y, z);
                a.get(local) == b.get(local)
            })
        })
    })
}

#[test]
fn regenerating_a_chunk_is_deterministic() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let config = config(rng.u64(..));
    let mut first = WorldGenerator::new(&config).unwrap();
    let mut second = WorldGenerator::new(&config).unwrap();

    for _ in 0..8 {
        let position = ChunkPos::new(
            rng.i32(-WORLD_RADIUS_CHUNK..WORLD_RADIUS_CHUNK),
            rng.i32(-2..2),
            rng.i32(-WORLD_RADIUS_CHUNK..WORLD_RADIUS_CHUNK),
        );
        let a = first.generate_chunk(position, &mut StructureRegistry::new());
        let b = second.generate_chunk(position, &mut StructureRegistry::new());
        assert!(same_blocks(&a, &b), "terrain differs at {position}");
        assert_eq!(a.population_changes(), b.population_changes());
        assert_eq!(a.adjacent_population_changes(), b.adjacent_population_changes());
    }
}

#[test]
fn trunk_beats_leaves_in_either_order() {
    let position = ChunkPos::new(0, 0, 0);
    let cell = BlockPos::new(4, 4, 4);
    let log = Block::new(BlockType::LOG);
    let leaves = Block::new(BlockType::LEAVES);

    let mut leaves_first = Chunk::new(position);
    leaves_first.set_block_population(cell, leaves, LEAF_AGE);
    leaves_first.set_block_population(cell, log, TRUNK_AGE);
    leaves_first.apply_population(Vec::new());

    let mut trunk_first = Chunk::new(position);
    trunk_first.set_block_population(cell, log, TRUNK_AGE);
    trunk_first.set_block_population(cell, leaves, LEAF_AGE);
    trunk_first.apply_population(Vec::new());

    assert_eq!(leaves_first.get(cell.local()), log);
    assert_eq!(trunk_first.get(cell.local()), log);
}

#[test]
fn trunk_beats_leaves_across_a_chunk_border() {
    let west = ChunkPos::new(-1, 0, 0);
    let east = ChunkPos::new(0, 0, 0);
    let cell = BlockPos::new(0, 8, 8);

    let mut west_chunk = Chunk::new(west);
    west_chunk.set_block_population(cell, Block::new(BlockType::LEAVES), LEAF_AGE);
    let mut east_chunk = Chunk::new(east);
    east_chunk.set_block_population(cell, Block::new(BlockType::LOG), TRUNK_AGE);

    let incoming: Vec<_> = west_chunk.adjacent_changes_for(east).collect();
    assert_eq!(incoming.len(), 1);
    east_chunk.apply_population(incoming);
    assert_eq!(east_chunk.get(cell.local()), Block::new(BlockType::LOG));
}

#[test]
fn pipeline_meshes_reach_the_consumer_and_are_deleted_on_unload() {
    let queues = MeshQueues::new();
    let mut consumer = MeshConsumer::new(queues.clone());
    let mut world = World::new(config(11), queues).unwrap();
    world.settle(64);

    consumer.process();
    assert_eq!(consumer.len(), world.stats().meshed_chunks);
    assert!(!consumer.is_empty());

    let far = BlockPos::new(64 * CHUNK_SIZE, 0, 0);
    world.set_load_center(far);
    world.tick();
    let update = consumer.process();
    assert!(update.deleted > 0);
    assert!(consumer.get(ChunkPos::new(0, 0, 0)).is_none());
    // Anything still resident was meshed around the new center.
    assert_eq!(consumer.visible(far.chunk(), 8).count(), consumer.len());
}

#[test]
fn reloaded_area_matches_the_first_visit() {
    let mut world = World::new(config(12), MeshQueues::new()).unwrap();
    world.settle(64);

    let mut rng = fastrand::Rng::with_seed(12);
    let samples: Vec<BlockPos> = (0..256)
        .map(|_| BlockPos::new(rng.i32(-32..32), rng.i32(-32..48), rng.i32(-32..32)))
        .collect();
    let before: Vec<_> = samples.iter().map(|pos| world.block_at(*pos)).collect();
    assert!(before.iter().all(Option::is_some));

    world.set_load_center(BlockPos::new(32 * CHUNK_SIZE, 0, 0));
    world.settle(64);
    assert!(world.block_at(samples[0]).is_none());

    world.set_load_center(BlockPos::new(0, 0, 0));
    world.settle(64);
    let after: Vec<_> = samples.iter().map(|pos| world.block_at(*pos)).collect();
    assert_eq!(before, after);
}

#[test]
fn chunks_across_the_seam_are_neighbors() {
    let mut world = World::new(config(13), MeshQueues::new()).unwrap();
    let east_edge = ChunkPos::new(WORLD_RADIUS_CHUNK - 1, 0, 0);
    world.set_load_center(east_edge.origin());
    world.settle(64);

    let west_edge = ChunkPos::new(-WORLD_RADIUS_CHUNK, 0, 0);
    assert_eq!(world.status().load_status(east_edge), LoadStatus::Populated);
    assert_eq!(world.status().load_status(west_edge), LoadStatus::Populated);
    assert_eq!(world.status().mesh_status(east_edge), MeshStatus::Meshed);

    let across = east_edge.origin().offset(CHUNK_SIZE, 0, 0);
    assert_eq!(across.chunk(), west_edge);
    assert!(world.block_at(across).is_some());
}

#[test]
fn edits_survive_until_the_chunk_is_unloaded() {
    let mut world = World::new(config(14), MeshQueues::new()).unwrap();
    world.settle(64);
    let position = BlockPos::new(10, 20, 10);
    assert!(world.set_block(position, Block::new(BlockType::GRAVEL)));
    world.settle(8);
    assert_eq!(world.block_at(position), Some(Block::new(BlockType::GRAVEL)));
}
