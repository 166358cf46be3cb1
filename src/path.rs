//! Slope-constrained pathfinding over the heightmap grid.
//!
//! A* over grid cells with 8-way expansion. An edge between two cells is
//! traversable only when its slope angle stays under the configured
//! maximum; steep terrain is impassable, not merely expensive.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::heightmap::HeightmapData;

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct PathOptions {
    /// Maximum traversable slope angle in radians.
    pub max_slope: f32,
    /// Optional cap on node expansions; `None` searches exhaustively.
    pub max_expansions: Option<usize>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            max_slope: std::f32::consts::FRAC_PI_4,
            max_expansions: None,
        }
    }
}

/// Node for the A* priority queue.
#[derive(Clone, Copy)]
struct PathNode {
    x: usize,
    z: usize,
    f: f32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other.f.partial_cmp(&self.f).unwrap_or(Ordering::Equal)
    }
}

fn euclidean(a: (usize, usize), b: (usize, usize)) -> f32 {
    let dx = a.0 as f32 - b.0 as f32;
    let dz = a.1 as f32 - b.1 as f32;
    (dx * dx + dz * dz).sqrt()
}

/// Find a path between two grid cells, start and goal inclusive.
///
/// Waypoints are `(col, row)` cells. Returns `None` when either endpoint is
/// off the grid, the goal is unreachable under the slope constraint, or the
/// expansion cap trips first.
pub fn find_path(
    map: &HeightmapData,
    start: (usize, usize),
    goal: (usize, usize),
    options: &PathOptions,
) -> Option<Vec<(usize, usize)>> {
    if !map.in_bounds(start.0, start.1) || !map.in_bounds(goal.0, goal.1) {
        return None;
    }

    let cols = map.cols();
    let rows = map.rows();

    let mut g_score: HashMap<(usize, usize), f32> = HashMap::new();
    let mut came_from: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    let mut closed: HashSet<(usize, usize)> = HashSet::new();
    let mut open = BinaryHeap::new();

    g_score.insert(start, 0.0);
    open.push(PathNode {
        x: start.0,
        z: start.1,
        f: euclidean(start, goal),
    });

    let mut expansions = 0usize;

    while let Some(PathNode { x, z, .. }) = open.pop() {
        let current = (x, z);
        if current == goal {
            return Some(reconstruct(&came_from, current));
        }
        // Stale heap entries for already-settled cells
        if !closed.insert(current) {
            continue;
        }

        expansions += 1;
        if let Some(cap) = options.max_expansions {
            if expansions > cap {
                return None;
            }
        }

        let current_g = g_score[&current];
        let current_h = map.get(x, z);

        for (dx, dz) in [
            (-1i64, 0i64),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ] {
            let nx = x as i64 + dx;
            let nz = z as i64 + dz;
            if nx < 0 || nz < 0 || nx >= cols as i64 || nz >= rows as i64 {
                continue;
            }
            let neighbor = (nx as usize, nz as usize);
            if closed.contains(&neighbor) {
                continue;
            }

            let step = euclidean(current, neighbor);
            // Slope gate: rise over world-space run between cell centers
            let rise = (map.get(neighbor.0, neighbor.1) - current_h).abs();
            let run = step * map.resolution;
            if rise.atan2(run) > options.max_slope {
                continue;
            }

            let tentative = current_g + step;
            let known = g_score.get(&neighbor).copied().unwrap_or(f32::INFINITY);
            if tentative < known {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, current);
                open.push(PathNode {
                    x: neighbor.0,
                    z: neighbor.1,
                    f: tentative + euclidean(neighbor, goal),
                });
            }
        }
    }

    None
}

/// Find a path between two world-space points.
///
/// Endpoints convert to grid cells with the same `resolution` scaling the
/// sampler uses; waypoints come back as grid cells.
pub fn find_path_world(
    map: &HeightmapData,
    start: (f32, f32),
    goal: (f32, f32),
    options: &PathOptions,
) -> Option<Vec<(usize, usize)>> {
    let start = map.world_to_cell(start.0, start.1)?;
    let goal = map.world_to_cell(goal.0, goal.1)?;
    find_path(map, start, goal, options)
}

fn reconstruct(
    came_from: &HashMap<(usize, usize), (usize, usize)>,
    mut current: (usize, usize),
) -> Vec<(usize, usize)> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::heightmap::{HeightmapMeta, FORMAT_VERSION};

    fn map_from_grid(grid: Grid<f32>) -> HeightmapData {
        let (w, h) = (grid.cols() as f32, grid.rows() as f32);
        HeightmapData::new(
            w,
            h,
            1.0,
            grid,
            HeightmapMeta {
                name: "path-test".to_string(),
                generated_at: String::new(),
                version: FORMAT_VERSION,
            },
        )
    }

    fn flat_map(cols: usize, rows: usize) -> HeightmapData {
        map_from_grid(Grid::new_with(cols, rows, 1.0f32))
    }

    #[test]
    fn flat_map_path_is_connected_and_inclusive() {
        let map = flat_map(16, 16);
        let path = find_path(&map, (2, 3), (12, 9), &PathOptions::default()).unwrap();

        assert_eq!(*path.first().unwrap(), (2, 3));
        assert_eq!(*path.last().unwrap(), (12, 9));
        for pair in path.windows(2) {
            let dx = (pair[0].0 as i64 - pair[1].0 as i64).abs();
            let dz = (pair[0].1 as i64 - pair[1].1 as i64).abs();
            assert!(dx.max(dz) == 1, "non-adjacent waypoints {pair:?}");
        }
    }

    #[test]
    fn start_equals_goal() {
        let map = flat_map(8, 8);
        let path = find_path(&map, (4, 4), (4, 4), &PathOptions::default()).unwrap();
        assert_eq!(path, vec![(4, 4)]);
    }

    #[test]
    fn steep_ring_blocks_the_goal() {
        // wall of height 100 around the goal at (8, 8)
        let mut grid = Grid::new_with(16, 16, 0.0f32);
        for z in 6..=10 {
            for x in 6..=10 {
                let on_ring = x == 6 || x == 10 || z == 6 || z == 10;
                if on_ring {
                    grid.set(x, z, 100.0);
                }
            }
        }
        let map = map_from_grid(grid);
        assert!(find_path(&map, (0, 0), (8, 8), &PathOptions::default()).is_none());
    }

    #[test]
    fn gentle_terrain_is_traversable() {
        // slope of 0.5 per cell, well under the 45 degree default
        let mut grid = Grid::new_with(12, 12, 0.0f32);
        for z in 0..12 {
            for x in 0..12 {
                grid.set(x, z, x as f32 * 0.5);
            }
        }
        let map = map_from_grid(grid);
        assert!(find_path(&map, (0, 0), (11, 11), &PathOptions::default()).is_some());
    }

    #[test]
    fn path_detours_around_a_wall() {
        // vertical wall with a gap at the top row
        let mut grid = Grid::new_with(12, 12, 0.0f32);
        for z in 1..12 {
            grid.set(6, z, 100.0);
        }
        let map = map_from_grid(grid);
        let path = find_path(&map, (2, 6), (10, 6), &PathOptions::default()).unwrap();
        assert!(path.iter().any(|&(_, z)| z == 0), "path should use the gap");
        assert!(path.iter().all(|&(x, z)| !(x == 6 && z >= 1)));
    }

    #[test]
    fn out_of_bounds_endpoints_give_no_path() {
        let map = flat_map(8, 8);
        assert!(find_path(&map, (0, 0), (8, 0), &PathOptions::default()).is_none());
        assert!(find_path(&map, (20, 20), (0, 0), &PathOptions::default()).is_none());
    }

    #[test]
    fn expansion_cap_aborts_search() {
        let map = flat_map(32, 32);
        let options = PathOptions {
            max_expansions: Some(3),
            ..PathOptions::default()
        };
        assert!(find_path(&map, (0, 0), (31, 31), &options).is_none());
    }

    #[test]
    fn world_entry_point_scales_by_resolution() {
        let mut map = flat_map(16, 16);
        map.resolution = 2.0;
        let path = find_path_world(&map, (1.0, 1.0), (21.0, 9.0), &PathOptions::default()).unwrap();
        assert_eq!(*path.first().unwrap(), (0, 0));
        assert_eq!(*path.last().unwrap(), (10, 4));
    }

    #[test]
    fn resolution_relaxes_the_slope_gate() {
        // one-cell step of height 1.5: steeper than 45 degrees at
        // resolution 1, gentle at resolution 4
        let mut grid = Grid::new_with(4, 1, 0.0f32);
        grid.set(2, 0, 1.5);
        grid.set(3, 0, 1.5);

        let steep = map_from_grid(grid.clone());
        assert!(find_path(&steep, (0, 0), (3, 0), &PathOptions::default()).is_none());

        let mut gentle = map_from_grid(grid);
        gentle.resolution = 4.0;
        assert!(find_path(&gentle, (0, 0), (3, 0), &PathOptions::default()).is_some());
    }
}
