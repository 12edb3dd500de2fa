//! # Population Changes
//!
//! Deferred block writes produced by structure placement.
//!
//! Structures are placed while their chunk generates, but a tree near a chunk
//! edge reaches into chunks that may not exist yet. Writes are therefore queued
//! as changes and applied when the target chunk populates. Every change carries
//! an age; when two structures write the same block the change with the higher
//! age wins and ties go to the higher block id, so a trunk (high age) is never
//! cut by a neighboring tree's leaves (low age).

use std::collections::HashMap;

use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::coords::{BlockPos, ChunkLocalBlockPos};

/// Age of a structure write. Higher ages win conflicts.
pub type PopulationAge = u8;

/// A pending write inside the chunk that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PopulationChange {
    pub local: ChunkLocalBlockPos,
    pub block: Block,
    pub age: PopulationAge,
}

/// A pending write into another chunk, kept on the chunk that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdjacentPopulationChange {
    pub position: BlockPos,
    pub block: Block,
    pub age: PopulationAge,
}

/// Whether a write of `block` with `age` replaces a pending write of
/// `existing_block` with `existing_age` at the same coordinate.
///
/// Higher age wins. Equal ages keep the higher block id, so the result does not
/// depend on the order the writes were produced in.
pub fn supersedes(
    age: PopulationAge,
    block: Block,
    existing_age: PopulationAge,
    existing_block: Block,
) -> bool {
    (age, block.id()) > (existing_age, existing_block.id())
}

/// Collapses a list of in-chunk changes to at most one per cell.
///
/// The result is ordered by cell index.
pub fn resolve_population_changes<I>(changes: I) -> Vec<PopulationChange>
where
    I: IntoIterator<Item = PopulationChange>,
{
    let mut winners: HashMap<usize, PopulationChange> = HashMap::new();
    for change in changes {
        winners
            .entry(change.local.index())
            .and_modify(|existing| {
                if supersedes(change.age, change.block, existing.age, existing.block) {
                    *existing = change;
                }
            })
            .or_insert(change);
    }

    let mut resolved: Vec<PopulationChange> = winners.into_values().collect();
    resolved.sort_by_key(|change| change.local.index());
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(index: usize, id: u16, age: PopulationAge) -> PopulationChange {
        PopulationChange {
            local: ChunkLocalBlockPos::from_index(index),
            block: Block::from_id(id),
            age,
        }
    }

    #[test]
    fn older_write_wins_in_either_order() {
        let young = change(42, 8, 5);
        let old = change(42, 7, 10);

        let forward = resolve_population_changes([young, old]);
        let backward = resolve_population_changes([old, young]);

        assert_eq!(forward, vec![old]);
        assert_eq!(backward, vec![old]);
    }

    #[test]
    fn equal_ages_keep_the_higher_block_id() {
        let a = change(3, 4, 7);
        let b = change(3, 9, 7);
        assert_eq!(resolve_population_changes([a, b]), vec![b]);
        assert_eq!(resolve_population_changes([b, a]), vec![b]);
    }

    #[test]
    fn distinct_cells_are_all_kept_in_index_order() {
        let resolved =
            resolve_population_changes([change(9, 1, 1), change(2, 1, 1), change(5, 1, 1)]);
        let cells: Vec<usize> = resolved.iter().map(|c| c.local.index()).collect();
        assert_eq!(cells, vec![2, 5, 9]);
    }
}
