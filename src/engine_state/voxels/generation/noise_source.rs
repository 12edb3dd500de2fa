//! # Noise Source
//!
//! Seeded 2D noise channels built from a short encoded graph.
//!
//! ## Graph encoding
//!
//! ```text
//! <fractal>:<base>[:key=value,key=value,...]
//! ```
//!
//! - `fractal`: `none`, `fbm`, `billow` or `ridged`
//! - `base`: `perlin`, `simplex`, `value` or `opensimplex`
//! - keys: `octaves`, `lacunarity`, `persistence` (ignored by `none`)
//!
//! `fbm:perlin:octaves=5,persistence=0.5` is five octaves of fractal Brownian
//! motion over Perlin noise.
//!
//! A [`NoiseSource`] is a pure function of its seed, graph and frequency: the
//! same region always produces the same samples, regardless of which other
//! regions were sampled before.

use noise::{
    Billow, Fbm, MultiFractal, NoiseFn, OpenSimplex, Perlin, RidgedMulti, Seedable, Simplex, Value,
};
use phf::phf_map;

use crate::config::NoiseChannelConfig;
use crate::error::{Result, WorldError};

/// The fractal layered over the base noise.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FractalKind {
    None,
    Fbm,
    Billow,
    Ridged,
}

/// The base noise function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseKind {
    Perlin,
    Simplex,
    Value,
    OpenSimplex,
}

static FRACTAL_KINDS: phf::Map<&'static str, FractalKind> = phf_map! {
    "none" => FractalKind::None,
    "fbm" => FractalKind::Fbm,
    "billow" => FractalKind::Billow,
    "ridged" => FractalKind::Ridged,
};

static BASE_KINDS: phf::Map<&'static str, BaseKind> = phf_map! {
    "perlin" => BaseKind::Perlin,
    "simplex" => BaseKind::Simplex,
    "value" => BaseKind::Value,
    "opensimplex" => BaseKind::OpenSimplex,
};

/// A decoded noise graph.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseGraph {
    pub fractal: FractalKind,
    pub base: BaseKind,
    pub octaves: usize,
    pub lacunarity: f64,
    pub persistence: f64,
}

impl NoiseGraph {
    /// Decodes an encoded graph string.
    ///
    /// ```
    /// use toroidal_voxel_world::engine_state::voxels::generation::noise_source::{
    ///     BaseKind, FractalKind, NoiseGraph,
    /// };
    ///
    /// let graph = NoiseGraph::parse("ridged:simplex:octaves=3").unwrap();
    /// assert_eq!(graph.fractal, FractalKind::Ridged);
    /// assert_eq!(graph.base, BaseKind::Simplex);
    /// assert_eq!(graph.octaves, 3);
    /// assert!(NoiseGraph::parse("fbm:worley").is_err());
    /// ```
    pub fn parse(encoded: &str) -> Result<Self> {
        let mut parts = encoded.trim().splitn(3, ':');
        let fractal_name = parts.next().unwrap_or_default();
        let base_name = parts.next().unwrap_or_default();

        let fractal = *FRACTAL_KINDS
            .get(fractal_name)
            .ok_or_else(|| unknown("fractal", fractal_name, encoded))?;
        let base = *BASE_KINDS
            .get(base_name)
            .ok_or_else(|| unknown("base", base_name, encoded))?;

        let mut graph = NoiseGraph {
            fractal,
            base,
            octaves: Fbm::<Perlin>::DEFAULT_OCTAVE_COUNT,
            lacunarity: Fbm::<Perlin>::DEFAULT_LACUNARITY,
            persistence: Fbm::<Perlin>::DEFAULT_PERSISTENCE,
        };

        let parameters = parts.next().unwrap_or_default();
        for parameter in parameters.split(',').filter(|p| !p.trim().is_empty()) {
            let malformed = || WorldError::MalformedNoiseParameter {
                parameter: parameter.to_string(),
                graph: encoded.to_string(),
            };
            let (key, value) = parameter.split_once('=').ok_or_else(malformed)?;
            let value = value.trim();
            match key.trim() {
                "octaves" => {
                    graph.octaves = value
                        .parse::<usize>()
                        .ok()
                        .filter(|octaves| (1..=Fbm::<Perlin>::MAX_OCTAVES).contains(octaves))
                        .ok_or_else(malformed)?
                }
                "lacunarity" => {
                    graph.lacunarity = parse_finite(value).ok_or_else(malformed)?
                }
                "persistence" => {
                    graph.persistence = parse_finite(value).ok_or_else(malformed)?
                }
                _ => return Err(malformed()),
            }
        }
        Ok(graph)
    }

    /// Builds the noise function tree for `seed`.
    fn build(&self, seed: u32) -> Box<dyn NoiseFn<f64, 2> + Send + Sync> {
        match self.base {
            BaseKind::Perlin => self.with_fractal::<Perlin>(seed),
            BaseKind::Simplex => self.with_fractal::<Simplex>(seed),
            BaseKind::Value => self.with_fractal::<Value>(seed),
            BaseKind::OpenSimplex => self.with_fractal::<OpenSimplex>(seed),
        }
    }

    fn with_fractal<T>(&self, seed: u32) -> Box<dyn NoiseFn<f64, 2> + Send + Sync>
    where
        T: Default + Seedable + NoiseFn<f64, 2> + Send + Sync + 'static,
    {
        match self.fractal {
            FractalKind::None => Box::new(T::default().set_seed(seed)),
            FractalKind::Fbm => Box::new(
                Fbm::<T>::new(seed)
                    .set_octaves(self.octaves)
                    .set_lacunarity(self.lacunarity)
                    .set_persistence(self.persistence),
            ),
            FractalKind::Billow => Box::new(
                Billow::<T>::new(seed)
                    .set_octaves(self.octaves)
                    .set_lacunarity(self.lacunarity)
                    .set_persistence(self.persistence),
            ),
            FractalKind::Ridged => Box::new(
                RidgedMulti::<T>::new(seed)
                    .set_octaves(self.octaves)
                    .set_lacunarity(self.lacunarity)
                    .set_persistence(self.persistence),
            ),
        }
    }
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn unknown(component: &'static str, name: &str, graph: &str) -> WorldError {
    WorldError::UnknownNoiseComponent {
        component,
        name: name.to_string(),
        graph: graph.to_string(),
    }
}

/// One seeded noise channel sampled in block space.
pub struct NoiseSource {
    function: Box<dyn NoiseFn<f64, 2> + Send + Sync>,
    frequency: f64,
}

impl NoiseSource {
    /// Builds a channel from its encoded graph.
    ///
    /// # Arguments
    /// * `seed` - Seed of this channel
    /// * `channel` - Encoded graph and sampling frequency
    pub fn new(seed: u32, channel: &NoiseChannelConfig) -> Result<Self> {
        let graph = NoiseGraph::parse(&channel.graph)?;
        log::debug!(
            "Noise channel `{}` seed {} frequency {}",
            channel.graph,
            seed,
            channel.frequency
        );
        Ok(NoiseSource {
            function: graph.build(seed),
            frequency: channel.frequency as f64,
        })
    }

    /// Samples the channel at a single block coordinate.
    pub fn sample(&self, x: i32, z: i32) -> f32 {
        self.function
            .get([x as f64 * self.frequency, z as f64 * self.frequency]) as f32
    }

    /// Samples a `size` by `size` region whose minimum corner is at
    /// (`origin_x`, `origin_z`).
    ///
    /// # Returns
    /// Samples in row-major order, `x` varying fastest: the sample for
    /// (`origin_x + i`, `origin_z + j`) is at index `i + size * j`.
    pub fn gen_grid_2d(&self, origin_x: i32, origin_z: i32, size: usize) -> Vec<f32> {
        let mut samples = Vec::with_capacity(size * size);
        for j in 0..size as i32 {
            for i in 0..size as i32 {
                samples.push(self.sample(origin_x + i, origin_z + j));
            }
        }
        samples
    }
}
