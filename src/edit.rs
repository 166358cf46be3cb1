//! Localized brush edits over a heightmap.
//!
//! Each edit is applied with value semantics: the source map is never
//! mutated, a transformed copy is returned with its bounds re-established.

use std::str::FromStr;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::heightmap::HeightmapData;

/// Brush operation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    /// Add `intensity * falloff` to each cell.
    Raise,
    /// Subtract `intensity * falloff` from each cell.
    Lower,
    /// Blend each cell toward the mean of its 4 neighbors.
    Smooth,
    /// Blend each cell toward the target height `intensity`.
    Flatten,
    /// Add a random perturbation scaled by `intensity * falloff`.
    Noise,
}

impl FromStr for BrushKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(BrushKind::Raise),
            "lower" => Ok(BrushKind::Lower),
            "smooth" => Ok(BrushKind::Smooth),
            "flatten" => Ok(BrushKind::Flatten),
            "noise" => Ok(BrushKind::Noise),
            other => Err(format!("unknown brush kind '{other}'")),
        }
    }
}

/// Falloff kernel mapping normalized distance to an intensity multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Falloff {
    Linear,
    Exponential,
    Gaussian,
}

impl Falloff {
    /// Multiplier for a normalized distance `d` in [0, 1].
    pub fn factor(self, d: f32) -> f32 {
        match self {
            Falloff::Linear => 1.0 - d,
            Falloff::Exponential => (-3.0 * d).exp(),
            Falloff::Gaussian => (-4.0 * d * d).exp(),
        }
    }
}

impl FromStr for Falloff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Falloff::Linear),
            "exponential" => Ok(Falloff::Exponential),
            "gaussian" => Ok(Falloff::Gaussian),
            other => Err(format!("unknown falloff '{other}'")),
        }
    }
}

/// One brush application. Pure input, not retained.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditOperation {
    pub kind: BrushKind,
    /// World-space brush center, x axis.
    pub x: f32,
    /// World-space brush center, z axis.
    pub z: f32,
    /// World-space brush radius.
    pub radius: f32,
    pub intensity: f32,
    pub falloff: Falloff,
}

/// Apply one edit, returning the transformed copy of `source`.
///
/// The brush center and radius convert into grid space (radius rounds up to
/// whole cells); cells inside the bounding square but outside the circular
/// radius are skipped, as are cells that fall off the grid. Bounds are
/// exact on return.
pub fn apply(source: &HeightmapData, op: &EditOperation) -> HeightmapData {
    let mut out = source.clone();
    if source.is_empty() {
        return out;
    }

    let center_x = (op.x / source.resolution).round() as i64;
    let center_z = (op.z / source.resolution).round() as i64;
    let grid_radius = (op.radius / source.resolution).ceil().max(0.0) as i64;

    let cols = source.cols() as i64;
    let rows = source.rows() as i64;
    let mut rng = rand::thread_rng();

    for dz in -grid_radius..=grid_radius {
        for dx in -grid_radius..=grid_radius {
            let x = center_x + dx;
            let z = center_z + dz;
            if x < 0 || z < 0 || x >= cols || z >= rows {
                continue;
            }

            let dist = ((dx * dx + dz * dz) as f32).sqrt();
            if dist > grid_radius as f32 {
                continue;
            }
            let d = if grid_radius > 0 {
                dist / grid_radius as f32
            } else {
                0.0
            };
            let factor = op.falloff.factor(d);

            let (x, z) = (x as usize, z as usize);
            let h = source.get(x, z);
            let edited = match op.kind {
                BrushKind::Raise => h + op.intensity * factor,
                BrushKind::Lower => h - op.intensity * factor,
                BrushKind::Smooth => match neighbor_mean(source, x, z) {
                    Some(mean) => h + (mean - h) * (factor * op.intensity),
                    // outer border has no full neighborhood; leave as-is
                    None => h,
                },
                BrushKind::Flatten => h + (op.intensity - h) * factor,
                BrushKind::Noise => {
                    h + rng.gen_range(-1.0f32..1.0) * op.intensity * factor
                }
            };
            out.set(x, z, edited);
        }
    }

    out.recompute_bounds();
    out
}

/// Mean of the 4 cardinal neighbors, reading the unedited source grid.
/// `None` on the outer border.
fn neighbor_mean(map: &HeightmapData, x: usize, z: usize) -> Option<f32> {
    if x == 0 || z == 0 || x + 1 >= map.cols() || z + 1 >= map.rows() {
        return None;
    }
    Some(
        (map.get(x - 1, z) + map.get(x + 1, z) + map.get(x, z - 1) + map.get(x, z + 1)) / 4.0,
    )
}
