use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;

use terrain_engine::chunk;
use terrain_engine::edit::{self, BrushKind, EditOperation, Falloff};
use terrain_engine::generator::{self, Algorithm, GenerationParams};
use terrain_engine::heightmap::HeightmapData;
use terrain_engine::path::{self, PathOptions};
use terrain_engine::serialize::{self, Format};

#[derive(Parser, Debug)]
#[command(name = "terrain_tool")]
#[command(about = "Generate, edit, and export procedural terrain heightmaps")]
struct Args {
    /// World-space terrain width
    #[arg(short = 'W', long, default_value = "128")]
    width: f32,

    /// World-space terrain height
    #[arg(short = 'H', long, default_value = "128")]
    height: f32,

    /// World units per grid cell
    #[arg(short, long, default_value = "1.0")]
    resolution: f32,

    /// Generation algorithm
    #[arg(short, long, value_enum, default_value = "perlin")]
    algorithm: Algorithm,

    /// Random seed (uses process entropy if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of noise octaves (fractal algorithm)
    #[arg(long, default_value = "4")]
    octaves: u32,

    /// Noise frequency
    #[arg(long, default_value = "0.05")]
    frequency: f64,

    /// Noise amplitude
    #[arg(long, default_value = "1.0")]
    amplitude: f64,

    /// Amplitude decay per octave
    #[arg(long, default_value = "0.5")]
    persistence: f64,

    /// Frequency multiplier per octave
    #[arg(long, default_value = "2.0")]
    lacunarity: f64,

    /// Lower bound of the target height range
    #[arg(long, default_value = "0.0")]
    min_height: f32,

    /// Upper bound of the target height range
    #[arg(long, default_value = "10.0")]
    max_height: f32,

    /// Number of smoothing passes
    #[arg(long, default_value = "0")]
    smoothing: u32,

    /// Load a JSON heightmap instead of generating one
    #[arg(long)]
    import_json: Option<PathBuf>,

    /// Brush edit as KIND:X,Z,RADIUS,INTENSITY,FALLOFF (repeatable, applied in order)
    #[arg(long = "edit")]
    edits: Vec<String>,

    /// Export the final heightmap as structured JSON
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Export the final heightmap as a raw float32 buffer
    #[arg(long)]
    export_raw: Option<PathBuf>,

    /// Export the final heightmap as a grayscale PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Path query between world-space points, as X0,Z0,X1,Z1
    #[arg(long)]
    path: Option<String>,

    /// Maximum traversable slope in degrees for path queries
    #[arg(long, default_value = "45.0")]
    max_slope_deg: f32,

    /// Extract and summarize one chunk, as CX,CZ
    #[arg(long)]
    chunk: Option<String>,

    /// Chunk size in grid cells
    #[arg(long, default_value = "16")]
    chunk_size: usize,
}

fn main() {
    let args = Args::parse();

    let map = match load_or_generate(&args) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    println!(
        "Heightmap '{}': {} x {} cells ({} x {} world units, resolution {})",
        map.metadata.name,
        map.cols(),
        map.rows(),
        map.width,
        map.height,
        map.resolution
    );

    let map = match apply_edits(map, &args.edits) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    println!(
        "Height range: [{:.3}, {:.3}]",
        map.min_height, map.max_height
    );

    if let Some(spec) = &args.chunk {
        match parse_pair(spec) {
            Ok((cx, cz)) => {
                let chunk = chunk::extract(&map, cx as i32, cz as i32, args.chunk_size);
                if chunk.is_empty() {
                    println!("Chunk ({cx}, {cz}): out of bounds");
                } else {
                    println!(
                        "Chunk ({cx}, {cz}): {} x {} cells",
                        chunk.width, chunk.height
                    );
                }
            }
            Err(e) => {
                eprintln!("error: bad --chunk spec: {e}");
                exit(1);
            }
        }
    }

    if let Some(spec) = &args.path {
        match parse_quad(spec) {
            Ok((x0, z0, x1, z1)) => {
                let options = PathOptions {
                    max_slope: args.max_slope_deg.to_radians(),
                    ..PathOptions::default()
                };
                match path::find_path_world(&map, (x0, z0), (x1, z1), &options) {
                    Some(waypoints) => {
                        println!("Path found: {} waypoints", waypoints.len());
                        for (x, z) in &waypoints {
                            println!("  ({x}, {z})");
                        }
                    }
                    None => println!("No path under {} degrees", args.max_slope_deg),
                }
            }
            Err(e) => {
                eprintln!("error: bad --path spec: {e}");
                exit(1);
            }
        }
    }

    let exports = [
        (&args.export_json, Format::Json),
        (&args.export_raw, Format::Raw),
        (&args.export_png, Format::Png),
    ];
    for (target, format) in exports {
        if let Some(path) = target {
            if let Err(e) = serialize::export_to_file(&map, format, path) {
                eprintln!("error: export to {} failed: {e}", path.display());
                exit(1);
            }
            println!("Exported {}", path.display());
        }
    }
}

fn load_or_generate(args: &Args) -> Result<HeightmapData, terrain_engine::TerrainError> {
    if let Some(path) = &args.import_json {
        return serialize::import_from_file(path, Format::Json, None);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating with seed {seed}");

    generator::generate(&GenerationParams {
        width: args.width,
        height: args.height,
        resolution: args.resolution,
        algorithm: args.algorithm,
        seed,
        octaves: args.octaves,
        frequency: args.frequency,
        amplitude: args.amplitude,
        persistence: args.persistence,
        lacunarity: args.lacunarity,
        min_height: args.min_height,
        max_height: args.max_height,
        smoothing: args.smoothing,
    })
}

fn apply_edits(mut map: HeightmapData, specs: &[String]) -> Result<HeightmapData, String> {
    for spec in specs {
        let op = parse_edit(spec)?;
        map = edit::apply(&map, &op);
    }
    Ok(map)
}

/// Parse KIND:X,Z,RADIUS,INTENSITY,FALLOFF, e.g. `raise:10,10,3,2,linear`.
fn parse_edit(spec: &str) -> Result<EditOperation, String> {
    let (kind, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("missing ':' in edit spec '{spec}'"))?;
    let kind = BrushKind::from_str(kind)?;

    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() != 5 {
        return Err(format!(
            "expected X,Z,RADIUS,INTENSITY,FALLOFF in edit spec '{spec}'"
        ));
    }

    let number = |field: &str| -> Result<f32, String> {
        field
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("bad number '{field}' in edit spec '{spec}'"))
    };

    Ok(EditOperation {
        kind,
        x: number(fields[0])?,
        z: number(fields[1])?,
        radius: number(fields[2])?,
        intensity: number(fields[3])?,
        falloff: Falloff::from_str(fields[4].trim())?,
    })
}

fn parse_pair(spec: &str) -> Result<(i64, i64), String> {
    let fields: Vec<&str> = spec.split(',').collect();
    if fields.len() != 2 {
        return Err(format!("expected CX,CZ, got '{spec}'"));
    }
    let a = fields[0].trim().parse().map_err(|_| format!("bad number in '{spec}'"))?;
    let b = fields[1].trim().parse().map_err(|_| format!("bad number in '{spec}'"))?;
    Ok((a, b))
}

fn parse_quad(spec: &str) -> Result<(f32, f32, f32, f32), String> {
    let fields: Vec<&str> = spec.split(',').collect();
    if fields.len() != 4 {
        return Err(format!("expected X0,Z0,X1,Z1, got '{spec}'"));
    }
    let mut values = [0.0f32; 4];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field
            .trim()
            .parse()
            .map_err(|_| format!("bad number '{field}' in '{spec}'"))?;
    }
    Ok((values[0], values[1], values[2], values[3]))
}
