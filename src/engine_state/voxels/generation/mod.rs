//! # Generation Module
//!
//! Procedural terrain for the wrapped world.
//!
//! ## Architecture
//!
//! Generation works per column first, then per chunk:
//!
//! 1. **Column parameters**: the heightmap and biome map of a 32×32 column are
//!    sampled once from the height, temperature and humidity channels and kept
//!    in an LRU cache shared by every chunk stacked in that column.
//! 2. **Terrain fill**: a chunk is filled from its column's parameters, see
//!    [`terrain`].
//! 3. **Structures**: trees and cacti are rolled from a chunk-local PRNG and
//!    queued as population changes, see [`structures`].
//!
//! Everything is a pure function of the world seed and the chunk position, so a
//! chunk that is unloaded and generated again comes back identical.
//!
//! ## Seam correction
//!
//! The world wraps on x, and the noise channels do not. Within a band around the
//! x seam, temperature is pulled toward a fixed baseline so the biomes on both
//! sides of the seam agree. The band width is jittered by the biome-edge channel
//! so the correction does not draw a straight line across the world.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::config::WorldConfig;
use crate::error::Result;

use super::chunk::Chunk;
use super::coords::{ChunkPos, ChunkPos2D};
use super::{CHUNK_AREA, CHUNK_SIZE, SEA_LEVEL, WORLD_RADIUS_BLOCK};

use biome::Biome;
use noise_source::NoiseSource;
use structures::StructureRegistry;

pub mod biome;
pub mod chunk_rng;
pub mod noise_source;
pub mod structures;
pub mod terrain;

/// Temperature the seam correction pulls toward.
pub const SEAM_TEMPERATURE_BASELINE: f32 = -0.1;
/// Nominal width in blocks of the seam correction band.
pub const SEAM_BAND_WIDTH: f32 = 256.0;
/// How far the biome-edge channel moves the band edge, in blocks.
pub const SEAM_BAND_JITTER: f32 = 64.0;

/// Heightmap and biome map of one chunk column.
///
/// Both maps are indexed `x + CHUNK_SIZE * z` with column-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnParameters {
    pub heights: Vec<i32>,
    pub biomes: Vec<Biome>,
    pub min_height: i32,
    pub max_height: i32,
}

impl ColumnParameters {
    fn index(x: usize, z: usize) -> usize {
        x + CHUNK_SIZE as usize * z
    }

    /// Surface height at column-local (`x`, `z`).
    pub fn height(&self, x: usize, z: usize) -> i32 {
        self.heights[Self::index(x, z)]
    }

    /// Biome at column-local (`x`, `z`).
    pub fn biome(&self, x: usize, z: usize) -> Biome {
        self.biomes[Self::index(x, z)]
    }
}

/// Blocks between `x` and the nearest side of the x seam.
fn seam_distance(x: i32) -> i32 {
    (x + WORLD_RADIUS_BLOCK).min(WORLD_RADIUS_BLOCK - 1 - x)
}

/// Pulls `temperature` toward the seam baseline near the seam.
///
/// # Arguments
/// * `temperature` - Raw temperature sample
/// * `x` - Block x coordinate of the sample
/// * `edge` - Biome-edge sample in `[-1, 1]`, shifts the band edge
pub fn seam_corrected_temperature(temperature: f32, x: i32, edge: f32) -> f32 {
    let band = SEAM_BAND_WIDTH + edge.clamp(-1.0, 1.0) * SEAM_BAND_JITTER;
    let distance = seam_distance(x) as f32;
    if distance >= band {
        return temperature;
    }
    let t = distance / band;
    let weight = t * t * (3.0 - 2.0 * t);
    SEAM_TEMPERATURE_BASELINE + (temperature - SEAM_TEMPERATURE_BASELINE) * weight
}

/// Seeded noise channels plus the per-column cache.
pub struct WorldGenerator {
    seed: u64,
    height_amplitude: f32,
    height: NoiseSource,
    temperature: NoiseSource,
    humidity: NoiseSource,
    biome_edge: NoiseSource,
    columns: LruCache<ChunkPos2D, Arc<ColumnParameters>>,
}

/// Seed of one noise channel, derived from the world seed.
fn channel_seed(seed: u64, channel: u32) -> u32 {
    ((seed ^ (seed >> 32)) as u32).wrapping_add(channel.wrapping_mul(0x9e37_79b9))
}

impl WorldGenerator {
    /// Decodes every noise channel of `config`.
    ///
    /// # Errors
    /// Returns an error if any channel's graph cannot be decoded.
    pub fn new(config: &WorldConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.column_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(WorldGenerator {
            seed: config.seed,
            height_amplitude: config.height_amplitude,
            height: NoiseSource::new(channel_seed(config.seed, 0), &config.height_noise)?,
            temperature: NoiseSource::new(channel_seed(config.seed, 1), &config.temperature_noise)?,
            humidity: NoiseSource::new(channel_seed(config.seed, 2), &config.humidity_noise)?,
            biome_edge: NoiseSource::new(channel_seed(config.seed, 3), &config.biome_edge_noise)?,
            columns: LruCache::new(capacity),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of columns currently cached.
    pub fn cached_columns(&self) -> usize {
        self.columns.len()
    }

    /// Parameters of `column`, sampled on first use and cached.
    pub fn column(&mut self, column: ChunkPos2D) -> Arc<ColumnParameters> {
        if let Some(parameters) = self.columns.get(&column) {
            return Arc::clone(parameters);
        }
        let parameters = Arc::new(self.sample_column(column));
        self.columns.put(column, Arc::clone(&parameters));
        parameters
    }

    fn sample_column(&self, column: ChunkPos2D) -> ColumnParameters {
        let (origin_x, origin_z) = (column.origin_x(), column.origin_z());
        let size = CHUNK_SIZE as usize;
        let heights_raw = self.height.gen_grid_2d(origin_x, origin_z, size);
        let temperatures = self.temperature.gen_grid_2d(origin_x, origin_z, size);
        let humidities = self.humidity.gen_grid_2d(origin_x, origin_z, size);
        let edges = self.biome_edge.gen_grid_2d(origin_x, origin_z, size);

        let mut heights = Vec::with_capacity(CHUNK_AREA);
        let mut biomes = Vec::with_capacity(CHUNK_AREA);
        for index in 0..CHUNK_AREA {
            let x = origin_x + (index % size) as i32;
            heights.push(SEA_LEVEL + (heights_raw[index] * self.height_amplitude).round() as i32);
            let temperature = seam_corrected_temperature(temperatures[index], x, edges[index]);
            biomes.push(Biome::lookup(temperature, humidities[index]));
        }

        let min_height = heights.iter().copied().min().unwrap_or(SEA_LEVEL);
        let max_height = heights.iter().copied().max().unwrap_or(SEA_LEVEL);
        ColumnParameters {
            heights,
            biomes,
            min_height,
            max_height,
        }
    }

    /// Generates the terrain and structures of the chunk at `position`.
    ///
    /// Structures are queued on the returned chunk as population changes and
    /// recorded in `registry`.
    pub fn generate_chunk(
        &mut self,
        position: ChunkPos,
        registry: &mut StructureRegistry,
    ) -> Chunk {
        let column = self.column(position.column());
        let mut chunk = terrain::fill_terrain(position, &column);
        let placed = structures::place_structures(&mut chunk, &column, self.seed, registry);
        if placed > 0 {
            log::trace!("Placed {} structures in chunk {}", placed, position);
        }
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seam_correction_reaches_the_baseline_at_the_seam() {
        for x in [WORLD_RADIUS_BLOCK - 1, -WORLD_RADIUS_BLOCK] {
            assert_eq!(seam_corrected_temperature(0.9, x, 0.0), SEAM_TEMPERATURE_BASELINE);
        }
        assert_eq!(seam_corrected_temperature(0.9, 0, 0.0), 0.9);
        let halfway = seam_corrected_temperature(0.9, WORLD_RADIUS_BLOCK - 129, 0.0);
        assert!(SEAM_TEMPERATURE_BASELINE < halfway && halfway < 0.9);
    }

    #[test]
    fn columns_are_cached() {
        let mut generator = WorldGenerator::new(&WorldConfig::default()).unwrap();
        let column = ChunkPos2D::new(4, -7);
        let first = generator.column(column);
        let second = generator.column(column);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(generator.cached_columns(), 1);
        assert_eq!(first.heights.len(), CHUNK_AREA);
        assert!(first.min_height <= first.max_height);
    }

    #[test]
    fn cache_evicts_beyond_capacity() {
        let config = WorldConfig {
            column_cache_capacity: 2,
            ..WorldConfig::default()
        };
        let mut generator = WorldGenerator::new(&config).unwrap();
        for x in 0..5 {
            generator.column(ChunkPos2D::new(x, 0));
        }
        assert_eq!(generator.cached_columns(), 2);
    }

    #[test]
    fn evicted_columns_come_back_identical() {
        let config = WorldConfig {
            column_cache_capacity: 1,
            ..WorldConfig::default()
        };
        let mut generator = WorldGenerator::new(&config).unwrap();
        let column = ChunkPos2D::new(-3, 11);
        let first = generator.column(column);
        generator.column(ChunkPos2D::new(0, 0));
        let again = generator.column(column);
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(*first, *again);
    }
}
