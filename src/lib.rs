//! Procedural terrain heightmap engine.
//!
//! Generates elevation grids from noise parameters, applies localized brush
//! edits, answers interpolated height/normal queries, slices chunks for
//! transmission, serializes to three interchange formats, and finds
//! slope-constrained paths across the grid.

pub mod chunk;
pub mod edit;
pub mod error;
pub mod generator;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod path;
pub mod sample;
pub mod serialize;

pub use chunk::{extract, Chunk};
pub use edit::{apply, BrushKind, EditOperation, Falloff};
pub use error::TerrainError;
pub use generator::{generate, Algorithm, GenerationParams};
pub use heightmap::{HeightmapData, HeightmapMeta};
pub use path::{find_path, find_path_world, PathOptions};
pub use sample::{height_at, normal_at};
pub use serialize::{export, import, Format, RawImportParams};
