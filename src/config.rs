//! # World Configuration
//!
//! Runtime inputs consumed by world generation and the pipeline: the world seed,
//! one encoded noise graph per generation channel, load distances and the per-tick
//! batch sizes that bound how much work a single `World::tick` performs.
//!
//! Configuration is plain JSON. Every field has a default, so a partial file
//! only overrides what it names:
//!
//! ```json
//! { "seed": 1337, "load_distance": 8 }
//! ```
//!
//! Fixed world geometry (chunk size, world radius, world floor, sea level) is not
//! configurable and lives in [`crate::engine_state::voxels`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::WORLD_RADIUS_CHUNK;
use crate::error::{Result, WorldError};

/// A single noise channel: an encoded noise graph plus the frequency at which it
/// is sampled in block space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseChannelConfig {
    /// Encoded graph, see [`crate::engine_state::voxels::generation::noise_source`].
    pub graph: String,
    /// Multiplier applied to block coordinates before sampling.
    pub frequency: f32,
}

impl NoiseChannelConfig {
    pub fn new(graph: &str, frequency: f32) -> Self {
        Self {
            graph: graph.to_string(),
            frequency,
        }
    }
}

/// Complete set of inputs needed to build a [`crate::engine_state::voxels::world::World`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed shared by every noise channel and the per-chunk structure PRNG.
    pub seed: u64,
    /// Terrain height channel. Samples are scaled by `height_amplitude`.
    pub height_noise: NoiseChannelConfig,
    /// Height variation in blocks around sea level.
    pub height_amplitude: f32,
    /// Temperature channel used for biome lookup.
    pub temperature_noise: NoiseChannelConfig,
    /// Humidity channel used for biome lookup.
    pub humidity_noise: NoiseChannelConfig,
    /// Jitter applied to the temperature correction band near the x seam.
    pub biome_edge_noise: NoiseChannelConfig,
    /// Horizontal load radius in chunks around the load center.
    pub load_distance: i32,
    /// Vertical load radius in chunks around the load center.
    pub vertical_load_distance: i32,
    /// Chunks taken from the load queue per tick.
    pub load_batch_size: usize,
    /// Chunks taken from the populate queue per tick.
    pub populate_batch_size: usize,
    /// Chunks taken from the mesh queue per tick.
    pub mesh_batch_size: usize,
    /// Number of columns kept in the generation parameter cache.
    pub column_cache_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            height_noise: NoiseChannelConfig::new("fbm:perlin:octaves=5,persistence=0.5", 0.004),
            height_amplitude: 48.0,
            temperature_noise: NoiseChannelConfig::new("fbm:simplex:octaves=3", 0.0015),
            humidity_noise: NoiseChannelConfig::new("fbm:simplex:octaves=3", 0.002),
            biome_edge_noise: NoiseChannelConfig::new("none:value", 0.02),
            load_distance: 6,
            vertical_load_distance: 3,
            load_batch_size: 48,
            populate_batch_size: 32,
            mesh_batch_size: 16,
            column_cache_capacity: 512,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the values that the pipeline relies on.
    ///
    /// The load area must fit inside the wrapped world, otherwise a chunk would
    /// be in range from both sides of the seam at once.
    pub fn validate(&self) -> Result<()> {
        if self.load_distance < 1 || self.vertical_load_distance < 1 {
            return Err(invalid("load distances must be at least one chunk"));
        }
        if self.load_distance >= WORLD_RADIUS_CHUNK {
            return Err(invalid(&format!(
                "load distance {} must be smaller than the world radius {}",
                self.load_distance, WORLD_RADIUS_CHUNK
            )));
        }
        if self.load_batch_size == 0 || self.populate_batch_size == 0 || self.mesh_batch_size == 0
        {
            return Err(invalid("batch sizes must be non-zero"));
        }
        if self.column_cache_capacity == 0 {
            return Err(invalid("column cache capacity must be non-zero"));
        }
        for channel in [
            &self.height_noise,
            &self.temperature_noise,
            &self.humidity_noise,
            &self.biome_edge_noise,
        ] {
            if !(channel.frequency.is_finite() && channel.frequency > 0.0) {
                return Err(invalid(&format!(
                    "noise frequency for `{}` must be positive",
                    channel.graph
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> WorldError {
    WorldError::InvalidConfig {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "seed": 42, "load_distance": 4 }"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.load_distance, 4);
        assert_eq!(config.mesh_batch_size, WorldConfig::default().mesh_batch_size);
    }

    #[test]
    fn rejects_load_distance_beyond_world_radius() {
        let json = format!(r#"{{ "load_distance": {} }}"#, WORLD_RADIUS_CHUNK);
        assert!(matches!(
            WorldConfig::from_json_str(&json),
            Err(WorldError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            WorldConfig::from_json_str("{ seed: "),
            Err(WorldError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            WorldConfig::from_file("/nonexistent/world.json"),
            Err(WorldError::ConfigRead { .. })
        ));
    }
}
