//! Rectangular sub-grid extraction for transmission and streaming.

use serde::{Deserialize, Serialize};

use crate::heightmap::HeightmapData;

/// A rectangular slice of a heightmap grid, re-indexed from zero.
///
/// Produced on demand; a chunk whose requested window falls entirely
/// outside the grid has `width == 0 && height == 0` and no heights.
/// Callers must check for that sentinel rather than expect an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub cx: i32,
    pub cz: i32,
    /// Actual columns in this chunk; may be smaller than the requested
    /// chunk size at the map edge.
    pub width: usize,
    /// Actual rows in this chunk.
    pub height: usize,
    /// Row-major heights, `height` rows of `width` values.
    pub heights: Vec<f32>,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.heights[z * self.width + x]
    }
}

/// Extract the chunk at `(cx, cz)` with the given size in grid cells.
///
/// The start cell is `floor(chunk_coord * chunk_size / resolution)` clamped
/// to the grid origin; the end is the start plus the chunk size, clamped to
/// the grid extent. Requests beyond the far edge produce the zero-size
/// sentinel chunk, never an error.
pub fn extract(map: &HeightmapData, cx: i32, cz: i32, chunk_size: usize) -> Chunk {
    let start_x = ((cx as f32 * chunk_size as f32) / map.resolution).floor() as i64;
    let start_z = ((cz as f32 * chunk_size as f32) / map.resolution).floor() as i64;
    let start_x = start_x.max(0) as usize;
    let start_z = start_z.max(0) as usize;

    if start_x >= map.cols() || start_z >= map.rows() {
        return Chunk {
            cx,
            cz,
            width: 0,
            height: 0,
            heights: Vec::new(),
        };
    }

    let end_x = (start_x + chunk_size).min(map.cols());
    let end_z = (start_z + chunk_size).min(map.rows());
    let width = end_x - start_x;
    let height = end_z - start_z;

    let mut heights = Vec::with_capacity(width * height);
    for z in start_z..end_z {
        for x in start_x..end_x {
            heights.push(map.get(x, z));
        }
    }

    Chunk {
        cx,
        cz,
        width,
        height,
        heights,
    }
}
