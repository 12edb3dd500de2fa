//! # Chunk Status Module
//!
//! Per-chunk pipeline state and neighbor readiness.
//!
//! Every tracked chunk has a load stage, a mesh stage and a 26-slot cache of the
//! load stage each of its neighbors last reported. The cache is kept current by
//! push: whenever a chunk's load stage changes, the new value is written into
//! the matching slot of every tracked neighbor. That makes [`can_populate`] and
//! [`can_mesh`] constant-time reads of one entry instead of 26 map lookups.
//!
//! [`can_populate`]: ChunkStatusMap::can_populate
//! [`can_mesh`]: ChunkStatusMap::can_mesh
//!
//! ## Load stages
//!
//! ```text
//! NonExistent → QueuedLoad → Loaded → Generated → QueuedPopulate → Populated
//! ```
//!
//! ## Mesh stages
//!
//! ```text
//! NonExistent → Queued → Meshed
//! ```

use std::collections::HashMap;

use super::block::block_side::BlockSide;
use super::coords::{neighbor_index, opposite_neighbor, ChunkPos, NEIGHBOR_OFFSETS};

/// Load stage of a chunk. Stages are ordered, so "at least generated" is a
/// comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LoadStatus {
    #[default]
    NonExistent,
    QueuedLoad,
    Loaded,
    Generated,
    QueuedPopulate,
    Populated,
}

/// Mesh stage of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MeshStatus {
    #[default]
    NonExistent,
    Queued,
    Meshed,
}

/// Tracked state of one chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkStatus {
    pub load: LoadStatus,
    pub mesh: MeshStatus,
    /// Last load stage reported by each neighbor, indexed like
    /// [`NEIGHBOR_OFFSETS`].
    pub neighbors: [LoadStatus; 26],
}

impl Default for ChunkStatus {
    fn default() -> Self {
        ChunkStatus {
            load: LoadStatus::NonExistent,
            mesh: MeshStatus::NonExistent,
            neighbors: [LoadStatus::NonExistent; 26],
        }
    }
}

impl ChunkStatus {
    /// Generated (or already queued for population) and every neighbor at
    /// least generated.
    fn can_populate(&self) -> bool {
        matches!(self.load, LoadStatus::Generated | LoadStatus::QueuedPopulate)
            && self
                .neighbors
                .iter()
                .all(|status| *status >= LoadStatus::Generated)
    }

    /// Populated itself and every face neighbor populated.
    fn can_mesh(&self) -> bool {
        self.load == LoadStatus::Populated
            && BlockSide::all()
                .iter()
                .all(|side| self.neighbors[neighbor_index(side.normal())] == LoadStatus::Populated)
    }
}

/// Chunks that became ready for the next pipeline step after a status update.
///
/// Only entries whose readiness could have changed are examined: the updated
/// chunk and its tracked neighbors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadinessUpdate {
    /// Generated chunks whose whole neighborhood is now generated.
    pub populate_ready: Vec<ChunkPos>,
    /// Populated, not yet meshed chunks whose face neighbors are now populated.
    pub mesh_ready: Vec<ChunkPos>,
}

impl ReadinessUpdate {
    pub fn is_empty(&self) -> bool {
        self.populate_ready.is_empty() && self.mesh_ready.is_empty()
    }
}

/// Status table of every chunk the world is tracking.
#[derive(Debug, Default)]
pub struct ChunkStatusMap {
    entries: HashMap<ChunkPos, ChunkStatus>,
}

impl ChunkStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked state of `position`, if any.
    pub fn get(&self, position: ChunkPos) -> Option<&ChunkStatus> {
        self.entries.get(&position)
    }

    pub fn load_status(&self, position: ChunkPos) -> LoadStatus {
        self.entries
            .get(&position)
            .map(|status| status.load)
            .unwrap_or_default()
    }

    pub fn mesh_status(&self, position: ChunkPos) -> MeshStatus {
        self.entries
            .get(&position)
            .map(|status| status.mesh)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked positions with the given load stage.
    pub fn positions_with(&self, load: LoadStatus) -> impl Iterator<Item = ChunkPos> + '_ {
        self.entries
            .iter()
            .filter(move |(_, status)| status.load == load)
            .map(|(position, _)| *position)
    }

    /// Sets the load stage of `position` and pushes it to every tracked
    /// neighbor.
    ///
    /// A new entry reads its tracked neighbors' stages once on creation.
    /// Setting `NonExistent` removes the entry after the neighbors have been
    /// told.
    ///
    /// # Returns
    /// The chunks among `position` and its neighbors that became ready to
    /// populate or mesh.
    pub fn set_load_status(&mut self, position: ChunkPos, load: LoadStatus) -> ReadinessUpdate {
        if load == LoadStatus::NonExistent {
            self.entries.remove(&position);
        } else if let Some(entry) = self.entries.get_mut(&position) {
            entry.load = load;
        } else {
            let mut entry = ChunkStatus {
                load,
                ..ChunkStatus::default()
            };
            for (slot, [dx, dy, dz]) in NEIGHBOR_OFFSETS.iter().enumerate() {
                if let Some(neighbor) = self.entries.get(&position.translated(*dx, *dy, *dz)) {
                    entry.neighbors[slot] = neighbor.load;
                }
            }
            self.entries.insert(position, entry);
        }

        let mut update = ReadinessUpdate::default();
        for (slot, [dx, dy, dz]) in NEIGHBOR_OFFSETS.iter().enumerate() {
            let neighbor_position = position.translated(*dx, *dy, *dz);
            if let Some(neighbor) = self.entries.get_mut(&neighbor_position) {
                neighbor.neighbors[opposite_neighbor(slot)] = load;
                Self::collect_readiness(neighbor_position, neighbor, &mut update);
            }
        }
        if let Some(entry) = self.entries.get(&position) {
            Self::collect_readiness(position, entry, &mut update);
        }
        update
    }

    fn collect_readiness(position: ChunkPos, status: &ChunkStatus, update: &mut ReadinessUpdate) {
        if status.load == LoadStatus::Generated && status.can_populate() {
            update.populate_ready.push(position);
        }
        if status.mesh == MeshStatus::NonExistent && status.can_mesh() {
            update.mesh_ready.push(position);
        }
    }

    /// Sets the mesh stage of `position`.
    ///
    /// # Panics
    /// Panics if `position` is not tracked. Only chunks that exist can be
    /// meshed.
    pub fn set_mesh_status(&mut self, position: ChunkPos, mesh: MeshStatus) {
        match self.entries.get_mut(&position) {
            Some(entry) => entry.mesh = mesh,
            None => panic!("mesh status set for untracked chunk {}", position),
        }
    }

    /// Whether `position` is generated or queued for population and all 26
    /// neighbors are at least generated.
    pub fn can_populate(&self, position: ChunkPos) -> bool {
        self.entries
            .get(&position)
            .is_some_and(ChunkStatus::can_populate)
    }

    /// Whether `position` and its 6 face neighbors are populated.
    pub fn can_mesh(&self, position: ChunkPos) -> bool {
        self.entries.get(&position).is_some_and(ChunkStatus::can_mesh)
    }
}
