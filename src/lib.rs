#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Toroidal Voxel World
//!
//! The simulation core of a voxel world that wraps around on x and z.
//!
//! Chunks are generated procedurally from a seed, decorated with structures
//! that may straddle chunk borders, meshed once their neighbors are final, and
//! handed to a render thread through a lock-and-swap queue.
//!
//! ## Key Modules
//!
//! * `config` - JSON world configuration
//! * `core` - Shared utilities, currently the cross-thread swap queue
//! * `engine_state` - The world pipeline, generation and mesh building
//! * `error` - The crate's error type
//!
//! ## Architecture
//!
//! The crate runs two threads:
//! * The simulation thread owns the [`engine_state::voxels::world::World`] and
//!   advances it one tick at a time
//! * The render thread owns a [`engine_state::rendering::MeshConsumer`] that
//!   drains finished meshes and deletion notices
//!
//! Nothing else is shared between them.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = toroidal_voxel_world::run() {
//!         log::error!("{error}");
//!     }
//! }
//! ```

use std::thread;

use log::info;
use web_time::{Duration, Instant};

use config::WorldConfig;
use engine_state::rendering::{MeshConsumer, MeshQueues};
use error::Result;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Steps simulated by [`run`] when no count is given.
pub const DEFAULT_STEPS: usize = 400;

/// How long the render thread waits between drains.
const RENDER_FRAME: Duration = Duration::from_millis(16);

/// Runs the headless simulation.
///
/// The first command line argument, if present, is a path to a JSON world
/// configuration; the second is the number of steps to simulate. The
/// simulation runs on its own thread while the calling thread drains meshes
/// like a renderer would.
///
/// # Errors
///
/// Returns the configuration error if the file cannot be read or is invalid.
pub fn run() -> Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_file(path)?,
        None => WorldConfig::default(),
    };
    let steps = args
        .next()
        .and_then(|steps| steps.parse().ok())
        .unwrap_or(DEFAULT_STEPS);

    let queues = MeshQueues::new();
    let mut consumer = MeshConsumer::new(queues.clone());
    let time = Instant::now();
    let simulation = thread::spawn(move || engine_state::run_simulation(config, queues, steps));

    let mut frames = 0usize;
    while !simulation.is_finished() {
        consumer.process();
        frames += 1;
        thread::sleep(RENDER_FRAME);
    }
    let stats = match simulation.join() {
        Ok(result) => result?,
        Err(panic) => std::panic::resume_unwind(panic),
    };
    consumer.process();

    info!(
        "Simulated {} steps in {:?} ({} render frames): {:?}",
        steps,
        time.elapsed(),
        frames,
        stats
    );
    info!("{} chunk meshes resident at exit", consumer.len());
    Ok(())
}
