//! # Toroidal Voxel World Entry Point
//!
//! Runs the headless simulation. See `run()` in the library for arguments.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json 400
//! ```

fn main() {
    if let Err(error) = toroidal_voxel_world::run() {
        log::error!("{error}");
        std::process::exit(1);
    }
}
