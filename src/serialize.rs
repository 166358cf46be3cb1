//! Heightmap interchange formats.
//!
//! Three formats with different fidelity guarantees:
//! - `json`: lossless structured export of the whole heightmap, exact
//!   round-trip.
//! - `raw`: headerless little-endian f32 buffer in row-major order; the
//!   importer must supply width/height/resolution and bounds are recomputed
//!   from the decoded values.
//! - `png`: 8-bit grayscale-with-alpha raster normalized to the map's own
//!   height range. Export only; import always fails.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use clap::ValueEnum;
use image::{ImageBuffer, LumaA};

use crate::error::TerrainError;
use crate::grid::Grid;
use crate::heightmap::{HeightmapData, HeightmapMeta, FORMAT_VERSION};

/// Serialization format selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Raw,
    Png,
}

impl FromStr for Format {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "raw" => Ok(Format::Raw),
            "png" => Ok(Format::Png),
            other => Err(TerrainError::UnknownFormat(other.to_string())),
        }
    }
}

/// Grid geometry the raw format cannot carry itself.
#[derive(Clone, Copy, Debug)]
pub struct RawImportParams {
    pub width: f32,
    pub height: f32,
    pub resolution: f32,
}

/// Serialize a heightmap into the given format.
pub fn export(map: &HeightmapData, format: Format) -> Result<Vec<u8>, TerrainError> {
    match format {
        Format::Json => Ok(serde_json::to_vec_pretty(map)?),
        Format::Raw => {
            let mut buf = Vec::with_capacity(map.cell_count() * 4);
            for &h in map.grid().as_slice() {
                buf.extend_from_slice(&h.to_le_bytes());
            }
            Ok(buf)
        }
        Format::Png => {
            let range = map.max_height - map.min_height;
            let img: ImageBuffer<LumaA<u8>, Vec<u8>> =
                ImageBuffer::from_fn(map.cols() as u32, map.rows() as u32, |x, z| {
                    let h = map.get(x as usize, z as usize);
                    let gray = if range > f32::EPSILON {
                        ((h - map.min_height) / range * 255.0) as u8
                    } else {
                        0
                    };
                    LumaA([gray, 255])
                });
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
            Ok(buf)
        }
    }
}

/// Deserialize a heightmap from the given format.
///
/// `raw_params` is required for `Format::Raw` and ignored otherwise.
/// PNG import is permanently unsupported.
pub fn import(
    bytes: &[u8],
    format: Format,
    raw_params: Option<RawImportParams>,
) -> Result<HeightmapData, TerrainError> {
    match format {
        Format::Json => {
            let map: HeightmapData = serde_json::from_slice(bytes)?;
            if !map.grid().is_consistent() {
                return Err(TerrainError::SizeMismatch {
                    expected: map.cols() * map.rows(),
                    actual: map.grid().len(),
                });
            }
            Ok(map)
        }
        Format::Raw => {
            let params = raw_params.ok_or(TerrainError::MissingRawParams)?;
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

            let expected = cols * rows * 4;
            if bytes.len() != expected {
                return Err(TerrainError::SizeMismatch {
                    expected,
                    actual: bytes.len(),
                });
            }

            let heights: Vec<f32> = bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            let grid = Grid::from_vec(cols, rows, heights).ok_or(TerrainError::EmptyResult)?;

            // HeightmapData::new rescans bounds; the raw format carries none.
            Ok(HeightmapData::new(
                params.width,
                params.height,
                params.resolution,
                grid,
                HeightmapMeta {
                    name: "raw-import".to_string(),
                    generated_at: Utc::now().to_rfc3339(),
                    version: FORMAT_VERSION,
                },
            ))
        }
        Format::Png => Err(TerrainError::UnsupportedImport("png")),
    }
}

/// Export straight to a file.
pub fn export_to_file<P: AsRef<Path>>(
    map: &HeightmapData,
    format: Format,
    path: P,
) -> Result<(), TerrainError> {
    let bytes = export(map, format)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Import straight from a file.
pub fn import_from_file<P: AsRef<Path>>(
    path: P,
    format: Format,
    raw_params: Option<RawImportParams>,
) -> Result<HeightmapData, TerrainError> {
    let bytes = fs::read(path)?;
    import(&bytes, format, raw_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate, Algorithm, GenerationParams};

    fn test_map() -> HeightmapData {
        generate(&GenerationParams {
            width: 12.0,
            height: 9.0,
            algorithm: Algorithm::Fractal,
            seed: 404,
            min_height: -2.0,
            max_height: 6.0,
            ..GenerationParams::default()
        })
        .unwrap()
    }

    #[test]
    fn json_round_trips_exactly() {
        let map = test_map();
        let bytes = export(&map, Format::Json).unwrap();
        let restored = import(&bytes, Format::Json, None).unwrap();
        assert_eq!(map, restored);
    }

    #[test]
    fn raw_round_trips_heights_and_recomputes_bounds() {
        let map = test_map();
        let bytes = export(&map, Format::Raw).unwrap();
        assert_eq!(bytes.len(), map.cell_count() * 4);

        let restored = import(
            &bytes,
            Format::Raw,
            Some(RawImportParams {
                width: map.width,
                height: map.height,
                resolution: map.resolution,
            }),
        )
        .unwrap();

        assert_eq!(restored.cols(), map.cols());
        assert_eq!(restored.rows(), map.rows());
        for z in 0..map.rows() {
            for x in 0..map.cols() {
                assert!((restored.get(x, z) - map.get(x, z)).abs() < 1e-7);
            }
        }
        // bounds are recomputed, not carried, and must still be exact
        assert_eq!(restored.min_height, map.min_height);
        assert_eq!(restored.max_height, map.max_height);
        // provenance is not carried by the raw format
        assert_eq!(restored.metadata.name, "raw-import");
    }

    #[test]
    fn raw_import_requires_params() {
        let map = test_map();
        let bytes = export(&map, Format::Raw).unwrap();
        assert!(matches!(
            import(&bytes, Format::Raw, None),
            Err(TerrainError::MissingRawParams)
        ));
    }

    #[test]
    fn raw_import_rejects_wrong_length() {
        let map = test_map();
        let mut bytes = export(&map, Format::Raw).unwrap();
        bytes.truncate(bytes.len() - 4);
        let result = import(
            &bytes,
            Format::Raw,
            Some(RawImportParams {
                width: map.width,
                height: map.height,
                resolution: map.resolution,
            }),
        );
        assert!(matches!(result, Err(TerrainError::SizeMismatch { .. })));
    }

    #[test]
    fn png_export_produces_a_png() {
        let map = test_map();
        let bytes = export(&map, Format::Png).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn png_export_handles_flat_maps() {
        let map = generate(&GenerationParams {
            width: 4.0,
            height: 4.0,
            algorithm: Algorithm::Random,
            seed: 0,
            min_height: 2.0,
            max_height: 2.0,
            ..GenerationParams::default()
        })
        .unwrap();
        assert!(export(&map, Format::Png).is_ok());
    }

    #[test]
    fn png_import_always_fails() {
        let map = test_map();
        let bytes = export(&map, Format::Png).unwrap();
        assert!(matches!(
            import(&bytes, Format::Png, None),
            Err(TerrainError::UnsupportedImport("png"))
        ));
    }

    #[test]
    fn edited_map_survives_json_round_trip() {
        use crate::edit::{apply, BrushKind, EditOperation, Falloff};

        let map = generate(&GenerationParams {
            width: 10.0,
            height: 10.0,
            algorithm: Algorithm::Random,
            seed: 9,
            min_height: 0.0,
            max_height: 1.0,
            ..GenerationParams::default()
        })
        .unwrap();
        for (_, _, &h) in map.grid().iter() {
            assert!((0.0..=1.0).contains(&h));
        }

        let edited = apply(
            &map,
            &EditOperation {
                kind: BrushKind::Raise,
                x: 5.0,
                z: 5.0,
                radius: 3.0,
                intensity: 2.0,
                falloff: Falloff::Linear,
            },
        );
        // center cell rises by at most the full intensity
        assert!(edited.get(5, 5) - map.get(5, 5) <= 2.0 + 1e-6);
        // cells beyond the brush radius are untouched
        assert_eq!(edited.get(0, 0), map.get(0, 0));
        assert_eq!(edited.get(9, 9), map.get(9, 9));

        let bytes = export(&edited, Format::Json).unwrap();
        let restored = import(&bytes, Format::Json, None).unwrap();
        assert_eq!(edited, restored);
    }

    #[test]
    fn unknown_format_name_is_an_error() {
        assert!(matches!(
            "exr".parse::<Format>(),
            Err(TerrainError::UnknownFormat(_))
        ));
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
    }
}
