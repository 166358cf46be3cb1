//! Heightmap generation from noise parameters.

use chrono::Utc;
use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::grid::Grid;
use crate::heightmap::{HeightmapData, HeightmapMeta, FORMAT_VERSION};
use crate::noise::NoiseField;

/// Generation algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Single-octave gradient noise.
    Perlin,
    /// Single-octave OpenSimplex noise.
    Simplex,
    /// Multi-octave fractal accumulation (octaves/persistence/lacunarity).
    Fractal,
    /// Cell-distance (Voronoi-like) noise.
    Cellular,
    /// Seeded uniform noise, no spatial coherence.
    Random,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Perlin => "perlin",
            Algorithm::Simplex => "simplex",
            Algorithm::Fractal => "fractal",
            Algorithm::Cellular => "cellular",
            Algorithm::Random => "random",
        }
    }
}

/// Parameters for heightmap generation. Pure input, not retained.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationParams {
    /// World-space width (x axis).
    pub width: f32,
    /// World-space height (z axis).
    pub height: f32,
    /// World units per grid cell.
    pub resolution: f32,
    pub algorithm: Algorithm,
    pub seed: u64,
    pub octaves: u32,
    /// Noise frequency applied to grid coordinates.
    pub frequency: f64,
    /// Scale applied to raw noise before clamping to [-1, 1].
    pub amplitude: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Lower bound of the target height range.
    pub min_height: f32,
    /// Upper bound of the target height range.
    pub max_height: f32,
    /// Number of box-blur smoothing passes applied after generation.
    pub smoothing: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 128.0,
            height: 128.0,
            resolution: 1.0,
            algorithm: Algorithm::Perlin,
            seed: 0,
            octaves: 4,
            frequency: 0.05,
            amplitude: 1.0,
            persistence: 0.5,
            lacunarity: 2.0,
            min_height: 0.0,
            max_height: 10.0,
            smoothing: 0,
        }
    }
}

/// Generate a heightmap from the given parameters.
///
/// The grid has `ceil(height / resolution)` rows by
/// `ceil(width / resolution)` columns. Raw noise values are clamped to
/// [-1, 1] and mapped linearly into `[min_height, max_height]`, then
/// `smoothing` box-blur passes run over the interior cells.
pub fn generate(params: &GenerationParams) -> Result<HeightmapData, TerrainError> {
    let cols = (params.width / params.resolution).ceil();
    let rows = (params.height / params.resolution).ceil();
    if !cols.is_finite() || !rows.is_finite() || cols <= 0.0 || rows <= 0.0 {
        return Err(TerrainError::InvalidDimensions {
            width: params.width,
            height: params.height,
            resolution: params.resolution,
        });
    }
    let cols = cols as usize;
    let rows = rows as usize;

    let field = NoiseField::seeded(params.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    let mut heights = Grid::new_with(cols, rows, 0.0f32);
    for z in 0..rows {
        for x in 0..cols {
            let nx = x as f64 * params.frequency;
            let nz = z as f64 * params.frequency;

            let raw = match params.algorithm {
                Algorithm::Perlin => field.perlin(nx, nz) * params.amplitude,
                Algorithm::Simplex => field.simplex(nx, nz) * params.amplitude,
                Algorithm::Fractal => {
                    field.fbm(nx, nz, params.octaves, params.persistence, params.lacunarity)
                        * params.amplitude
                }
                // cellular is [0, 1); recenter before amplitude scaling
                Algorithm::Cellular => (field.cellular(nx, nz) * 2.0 - 1.0) * params.amplitude,
                Algorithm::Random => rng.gen_range(-1.0..1.0),
            }
            .clamp(-1.0, 1.0) as f32;

            let t = (raw + 1.0) * 0.5;
            heights.set(x, z, params.min_height + t * (params.max_height - params.min_height));
        }
    }

    if params.smoothing > 0 {
        heights = smooth(&heights, params.smoothing);
    }

    if heights.is_empty() {
        return Err(TerrainError::EmptyResult);
    }

    Ok(HeightmapData::new(
        params.width,
        params.height,
        params.resolution,
        heights,
        HeightmapMeta {
            name: params.algorithm.name().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            version: FORMAT_VERSION,
        },
    ))
}

/// Run `passes` iterations of a 4-neighbor box blur over interior cells.
///
/// Border cells are left untouched each pass; every pass reads the previous
/// pass's grid, so a cell becomes the mean of its N/S/E/W neighbors as they
/// were before the pass started.
fn smooth(grid: &Grid<f32>, passes: u32) -> Grid<f32> {
    let cols = grid.cols();
    let rows = grid.rows();
    let mut current = grid.clone();

    if cols < 3 || rows < 3 {
        return current;
    }

    for _ in 0..passes {
        let mut next = current.clone();
        for z in 1..rows - 1 {
            for x in 1..cols - 1 {
                let mean = (*current.get(x - 1, z)
                    + *current.get(x + 1, z)
                    + *current.get(x, z - 1)
                    + *current.get(x, z + 1))
                    / 4.0;
                next.set(x, z, mean);
            }
        }
        current = next;
    }

    current
}
