//! Render-facing side of the simulation.
//!
//! This module turns chunk data into mesh payloads and carries them to the
//! render thread. Graphics API setup, shaders and textures live with the
//! renderer that consumes the payloads; nothing here touches a GPU.

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::{MeshConsumer, MeshDeletion, MeshPayload, MeshQueues};
pub use vertex::Vertex;
