//! Mesh handoff between the simulation thread and the render thread.
//!
//! The simulation thread builds meshes; the render thread owns whatever it turns
//! them into. The two only share a [`MeshQueues`]: one [`SwapQueue`] of finished
//! [`MeshPayload`]s and one of [`MeshDeletion`] notices.
//!
//! # Architecture
//! - `mesh/`: Face culling and mesh building from chunk data
//! - [`MeshQueues`]: The two cross-thread queues, cloned into both threads
//! - [`MeshConsumer`]: Render-side owner of the resident meshes
//!
//! # Ordering
//! Every payload and notice carries the world tick it was produced in. The
//! consumer applies both kinds in tick order, deletions before payloads within a
//! tick, and ignores anything older than what it already holds for a chunk. A
//! chunk that is unloaded and meshed again therefore never ends up showing the
//! mesh from before the unload, whichever queue is drained first.

use std::collections::HashMap;

use crate::core::SwapQueue;
use crate::engine_state::voxels::coords::ChunkPos;

pub mod mesh;

pub use mesh::Mesh;

/// A finished chunk mesh on its way to the render thread.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPayload {
    /// Chunk the mesh belongs to; vertex positions are relative to its origin.
    pub position: ChunkPos,
    /// World tick the mesh was built in.
    pub tick: u64,
    pub mesh: Mesh,
}

/// Notice that the mesh of a chunk must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshDeletion {
    pub position: ChunkPos,
    /// World tick the notice was issued in.
    pub tick: u64,
}

/// The two queues shared by the simulation and render threads.
///
/// Cloning shares the queues.
#[derive(Clone, Default)]
pub struct MeshQueues {
    pub meshes: SwapQueue<MeshPayload>,
    pub deletions: SwapQueue<MeshDeletion>,
}

impl MeshQueues {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What a call to [`MeshConsumer::process`] changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerUpdate {
    /// Payloads installed.
    pub uploaded: usize,
    /// Resident meshes dropped.
    pub deleted: usize,
    /// Payloads or notices ignored because something newer was resident.
    pub stale: usize,
}

enum MeshEvent {
    Delete(MeshDeletion),
    Upload(MeshPayload),
}

impl MeshEvent {
    fn sort_key(&self) -> (u64, u8) {
        match self {
            MeshEvent::Delete(deletion) => (deletion.tick, 0),
            MeshEvent::Upload(payload) => (payload.tick, 1),
        }
    }
}

/// Render-side owner of every resident chunk mesh.
pub struct MeshConsumer {
    queues: MeshQueues,
    resident: HashMap<ChunkPos, MeshPayload>,
    payload_buffer: Vec<MeshPayload>,
    deletion_buffer: Vec<MeshDeletion>,
}

impl MeshConsumer {
    pub fn new(queues: MeshQueues) -> Self {
        MeshConsumer {
            queues,
            resident: HashMap::new(),
            payload_buffer: Vec::new(),
            deletion_buffer: Vec::new(),
        }
    }

    /// Drains both queues and applies their contents in tick order.
    ///
    /// Deletions are drained before payloads: a payload pushed before a
    /// notice that this call sees is then guaranteed to be seen by this call
    /// as well.
    pub fn process(&mut self) -> ConsumerUpdate {
        self.queues.deletions.swap(&mut self.deletion_buffer);
        self.queues.meshes.swap(&mut self.payload_buffer);

        let mut events: Vec<MeshEvent> = self
            .deletion_buffer
            .drain(..)
            .map(MeshEvent::Delete)
            .chain(self.payload_buffer.drain(..).map(MeshEvent::Upload))
            .collect();
        events.sort_by_key(MeshEvent::sort_key);

        let mut update = ConsumerUpdate::default();
        for event in events {
            match event {
                MeshEvent::Delete(deletion) => match self.resident.get(&deletion.position) {
                    Some(current) if current.tick > deletion.tick => update.stale += 1,
                    Some(_) => {
                        self.resident.remove(&deletion.position);
                        update.deleted += 1;
                    }
                    None => {}
                },
                MeshEvent::Upload(payload) => match self.resident.get(&payload.position) {
                    Some(current) if current.tick > payload.tick => update.stale += 1,
                    _ => {
                        self.resident.insert(payload.position, payload);
                        update.uploaded += 1;
                    }
                },
            }
        }

        if update.uploaded + update.deleted > 0 {
            log::debug!(
                "Render side: {} uploaded, {} deleted, {} resident",
                update.uploaded,
                update.deleted,
                self.resident.len()
            );
        }
        update
    }

    /// The resident mesh of `position`, if any.
    pub fn get(&self, position: ChunkPos) -> Option<&MeshPayload> {
        self.resident.get(&position)
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    /// Resident meshes within `render_distance` chunks of `center`, measured
    /// the short way around the world.
    pub fn visible(
        &self,
        center: ChunkPos,
        render_distance: i32,
    ) -> impl Iterator<Item = &MeshPayload> + '_ {
        let limit = render_distance as i64 * render_distance as i64;
        self.resident
            .values()
            .filter(move |payload| center.offset(&payload.position).length_squared() <= limit)
    }
}
