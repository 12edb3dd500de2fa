//! # Core Module
//!
//! Concurrency primitives shared by the simulation thread and the render thread.
//!
//! ## Key Components
//! - `SwapQueue`: mutex-guarded batch queue whose contents are exchanged wholesale,
//!   used to hand finished mesh payloads and deletion notices across threads
//!
//! Nothing in this module knows about voxels. The world never shares chunk data
//! across threads; only fully built, owned values travel through these queues.

pub mod swap_queue;

pub use swap_queue::SwapQueue;
