//! # Engine State Module
//!
//! The simulation side of the voxel world and the walker that drives it.
//!
//! ## Key Components
//!
//! * `Simulation` - Owns the [`World`] and moves its load center every step
//! * `rendering` - Mesh building and the cross-thread mesh handoff
//! * `voxels` - Coordinates, chunks, generation and the world pipeline
//!
//! ## Architecture
//!
//! The simulation thread owns a `Simulation` and calls [`Simulation::step`] in a
//! loop. Each step advances a walker along +x and runs one world tick centered
//! on it. The walker starts just short of the x seam, so a run exercises
//! loading, populating and meshing on both sides of the wrap. Meshes reach the
//! render thread only through the [`rendering::MeshQueues`] passed in at
//! construction.

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Duration;

use crate::config::WorldConfig;
use crate::error::Result;

use rendering::MeshQueues;
use voxels::coords::BlockPos;
use voxels::world::{TickSummary, World, WorldStats};
use voxels::{SEA_LEVEL, WORLD_RADIUS_BLOCK};

pub mod rendering;
pub mod voxels;

/// Simulated time covered by one step.
pub const STEP_DURATION: Duration = Duration::from_millis(50);

/// Walker speed in blocks per second.
pub const WALK_SPEED: f64 = 96.0;

/// How far before the x seam the walker starts, in blocks.
pub const SEAM_APPROACH: i32 = 64;

/// The world plus a walker that moves its load center.
///
/// # Examples
///
/// ```
/// use toroidal_voxel_world::config::WorldConfig;
/// use toroidal_voxel_world::engine_state::{rendering::MeshQueues, Simulation};
///
/// let config = WorldConfig {
///     load_distance: 2,
///     vertical_load_distance: 1,
///     ..WorldConfig::default()
/// };
/// let mut simulation = Simulation::new(config, MeshQueues::new()).unwrap();
/// let summary = simulation.step();
/// assert!(summary.loaded > 0);
/// ```
pub struct Simulation {
    /// The voxel world being simulated
    world: World,
    /// Walker position in world space
    position: Point3<f64>,
    /// Walker velocity in blocks per second
    velocity: Vector3<f64>,
}

impl Simulation {
    /// Creates a simulation with the walker just west of the x seam.
    ///
    /// # Arguments
    ///
    /// * `config` - World configuration
    /// * `mesh_queues` - Queues shared with the render thread
    ///
    /// # Returns
    ///
    /// The simulation, or the configuration error that prevented building the world.
    pub fn new(config: WorldConfig, mesh_queues: MeshQueues) -> Result<Self> {
        let mut world = World::new(config, mesh_queues)?;
        let position = Point3::new(
            (WORLD_RADIUS_BLOCK - SEAM_APPROACH) as f64,
            SEA_LEVEL as f64,
            0.0,
        );
        world.set_load_center(BlockPos::from_world_point(position));
        Ok(Simulation {
            world,
            position,
            velocity: Vector3::new(WALK_SPEED, 0.0, 0.0),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The block the walker is in, wrapped into the world.
    pub fn walker(&self) -> BlockPos {
        BlockPos::from_world_point(self.position)
    }

    /// Moves the walker by one step and runs one world tick around it.
    pub fn step(&mut self) -> TickSummary {
        let summary = self.world.tick();
        self.position += self.velocity * STEP_DURATION.as_secs_f64();
        let walker = self.walker();
        // Keep the float position bounded; only x and z wrap.
        self.position.x = walker.x() as f64 + self.position.x.rem_euclid(1.0);
        self.position.z = walker.z() as f64 + self.position.z.rem_euclid(1.0);
        self.world.set_load_center(walker);
        summary
    }
}

/// Runs `steps` simulation steps and logs progress along the way.
///
/// # Returns
///
/// World statistics after the last step.
pub fn run_simulation(
    config: WorldConfig,
    mesh_queues: MeshQueues,
    steps: usize,
) -> Result<WorldStats> {
    let mut simulation = Simulation::new(config, mesh_queues)?;
    for step in 0..steps {
        simulation.step();
        if step % 20 == 0 {
            let stats = simulation.world().stats();
            info!(
                "Step {}: walker at {}, {} chunks loaded, {} meshed, queues {}/{}/{}",
                step,
                simulation.walker(),
                stats.loaded_chunks,
                stats.meshed_chunks,
                stats.load_queue,
                stats.populate_queue,
                stats.mesh_queue
            );
        }
    }
    Ok(simulation.world().stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walker_wraps_across_the_seam() {
        let config = WorldConfig {
            load_distance: 1,
            vertical_load_distance: 1,
            ..WorldConfig::default()
        };
        let mut simulation = Simulation::new(config, MeshQueues::new()).unwrap();
        assert!(simulation.walker().x() > 0);

        // 96 blocks at 4.8 blocks per step.
        for _ in 0..20 {
            simulation.step();
        }
        assert!(simulation.walker().x() < 0);
        assert_eq!(simulation.world().load_center(), simulation.walker().chunk());
    }
}
