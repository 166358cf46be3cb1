use serde::{Deserialize, Serialize};

/// A 2D grid stored as a flat row-major buffer.
///
/// Indexed as `(x, z)` where `x` is the column and `z` is the row, so the
/// element at `(x, z)` lives at `z * cols + x`. Edges do not wrap; callers
/// that need neighbor access clamp or skip at the borders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    cols: usize,
    rows: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new_with(cols: usize, rows: usize, value: T) -> Self {
        Self {
            cols,
            rows,
            data: vec![value; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn in_bounds(&self, x: usize, z: usize) -> bool {
        x < self.cols && z < self.rows
    }

    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(self.in_bounds(x, z), "grid access out of bounds");
        z * self.cols + x
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    /// Bounds-checked access; `None` outside the grid.
    pub fn try_get(&self, x: usize, z: usize) -> Option<&T> {
        if self.in_bounds(x, z) {
            Some(&self.data[z * self.cols + x])
        } else {
            None
        }
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.cols;
            let z = idx / self.cols;
            (x, z, val)
        })
    }

    /// Raw row-major view of the cell data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Rebuild a grid from a row-major buffer.
    ///
    /// Returns `None` when the buffer length does not match `cols * rows`.
    pub fn from_vec(cols: usize, rows: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != cols * rows {
            return None;
        }
        Some(Self { cols, rows, data })
    }

    /// True when the stored buffer matches the declared dimensions.
    /// Deserialized grids are validated with this before use.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.cols * self.rows
    }
}
