use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Current structured-format version, stamped into metadata on generation.
pub const FORMAT_VERSION: u32 = 1;

/// Generation provenance. Informational only; nothing downstream keys off it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightmapMeta {
    /// Human-readable origin, usually the generation algorithm name.
    pub name: String,
    /// UTC timestamp of generation (RFC 3339).
    pub generated_at: String,
    /// Structured-format version the map was created with.
    pub version: u32,
}

/// A rectangular terrain heightmap.
///
/// World-space extents are `width` x `height`; the sample grid has
/// `ceil(height / resolution)` rows by `ceil(width / resolution)` columns,
/// each cell covering `resolution` world units. `min_height`/`max_height`
/// are the exact bounds of the stored samples; generation and every edit
/// re-establish them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightmapData {
    pub width: f32,
    pub height: f32,
    pub resolution: f32,
    pub min_height: f32,
    pub max_height: f32,
    heights: Grid<f32>,
    pub metadata: HeightmapMeta,
}

impl HeightmapData {
    pub fn new(
        width: f32,
        height: f32,
        resolution: f32,
        heights: Grid<f32>,
        metadata: HeightmapMeta,
    ) -> Self {
        let mut map = Self {
            width,
            height,
            resolution,
            min_height: 0.0,
            max_height: 0.0,
            heights,
            metadata,
        };
        map.recompute_bounds();
        map
    }

    /// Grid columns (x axis).
    pub fn cols(&self) -> usize {
        self.heights.cols()
    }

    /// Grid rows (z axis).
    pub fn rows(&self) -> usize {
        self.heights.rows()
    }

    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn get(&self, x: usize, z: usize) -> f32 {
        *self.heights.get(x, z)
    }

    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        self.heights.set(x, z, value);
    }

    pub fn grid(&self) -> &Grid<f32> {
        &self.heights
    }

    pub fn in_bounds(&self, x: usize, z: usize) -> bool {
        self.heights.in_bounds(x, z)
    }

    /// Convert world coordinates into the containing grid cell.
    ///
    /// Applies the same `/ resolution` scaling the sampler uses, so cell
    /// and world addressing cannot drift apart. `None` outside the grid.
    pub fn world_to_cell(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let gx = (x / self.resolution).floor();
        let gz = (z / self.resolution).floor();
        if gx < 0.0 || gz < 0.0 || gx >= self.cols() as f32 || gz >= self.rows() as f32 {
            return None;
        }
        Some((gx as usize, gz as usize))
    }

    /// Rescan the grid and set `min_height`/`max_height` to the true bounds.
    /// An empty grid collapses both to zero.
    pub fn recompute_bounds(&mut self) {
        if self.heights.is_empty() {
            self.min_height = 0.0;
            self.max_height = 0.0;
            return;
        }
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for (_, _, &h) in self.heights.iter() {
            if h < min {
                min = h;
            }
            if h > max {
                max = h;
            }
        }
        self.min_height = min;
        self.max_height = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(cols: usize, rows: usize, level: f32) -> HeightmapData {
        HeightmapData::new(
            cols as f32,
            rows as f32,
            1.0,
            Grid::new_with(cols, rows, level),
            HeightmapMeta {
                name: "test".to_string(),
                generated_at: String::new(),
                version: FORMAT_VERSION,
            },
        )
    }

    #[test]
    fn bounds_track_extremes() {
        let mut map = flat_map(4, 4, 2.0);
        assert_eq!(map.min_height, 2.0);
        assert_eq!(map.max_height, 2.0);

        map.set(1, 2, -5.0);
        map.set(3, 0, 9.0);
        map.recompute_bounds();
        assert_eq!(map.min_height, -5.0);
        assert_eq!(map.max_height, 9.0);
    }

    #[test]
    fn world_to_cell_scales_by_resolution() {
        let mut map = flat_map(10, 10, 0.0);
        map.resolution = 2.0;
        assert_eq!(map.world_to_cell(0.0, 0.0), Some((0, 0)));
        assert_eq!(map.world_to_cell(5.0, 3.9), Some((2, 1)));
        assert_eq!(map.world_to_cell(-0.1, 0.0), None);
        assert_eq!(map.world_to_cell(20.0, 0.0), None);
    }
}
