//! Point queries at arbitrary world coordinates.
//!
//! Both queries sit on per-frame/per-vertex hot paths, so they never return
//! errors: invalid maps and out-of-range coordinates degrade to safe
//! defaults with a diagnostic log.

use log::{trace, warn};

use crate::heightmap::HeightmapData;

/// Interpolated height at world coordinates `(x, z)`.
///
/// Coordinates are scaled into grid space by `resolution` and bilinearly
/// interpolated over the four surrounding cells, clamping the far neighbors
/// at the grid edge. Any coordinate outside `[0, width) x [0, height)`
/// returns `0.0`; callers that stream queries are expected to rely on that
/// default rather than pre-validate.
pub fn height_at(map: &HeightmapData, x: f32, z: f32) -> f32 {
    if map.is_empty() {
        warn!("height_at on empty heightmap, returning 0");
        return 0.0;
    }

    let gx = x / map.resolution;
    let gz = z / map.resolution;
    let x0 = gx.floor();
    let z0 = gz.floor();

    if x0 < 0.0 || z0 < 0.0 || x0 >= map.cols() as f32 || z0 >= map.rows() as f32 {
        trace!("height_at({x}, {z}) out of range, returning 0");
        return 0.0;
    }

    let x0 = x0 as usize;
    let z0 = z0 as usize;
    let x1 = (x0 + 1).min(map.cols() - 1);
    let z1 = (z0 + 1).min(map.rows() - 1);
    let fx = gx - x0 as f32;
    let fz = gz - z0 as f32;

    let h00 = map.get(x0, z0);
    let h10 = map.get(x1, z0);
    let h01 = map.get(x0, z1);
    let h11 = map.get(x1, z1);

    let near = h00 + (h10 - h00) * fx;
    let far = h01 + (h11 - h01) * fx;
    near + (far - near) * fz
}

/// Surface normal at world coordinates `(x, z)`.
///
/// Central differences over four `height_at` samples offset by half a cell
/// along each axis. Degrades to the up vector on an empty heightmap.
pub fn normal_at(map: &HeightmapData, x: f32, z: f32) -> [f32; 3] {
    if map.is_empty() {
        warn!("normal_at on empty heightmap, returning up vector");
        return [0.0, 1.0, 0.0];
    }

    let step = map.resolution * 0.5;
    let h_left = height_at(map, x - step, z);
    let h_right = height_at(map, x + step, z);
    let h_near = height_at(map, x, z - step);
    let h_far = height_at(map, x, z + step);

    let d_dx = (h_right - h_left) / map.resolution;
    let d_dz = (h_far - h_near) / map.resolution;

    let len = (d_dx * d_dx + 1.0 + d_dz * d_dz).sqrt();
    [-d_dx / len, 1.0 / len, -d_dz / len]
}
