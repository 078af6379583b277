use std::path::PathBuf;

use clap::Parser;
use voxler_geom::Offset;

/// Builds voxel worlds from scene files against an in-memory CAD host.
///
/// Scenes are applied in order; each one after the first is reconciled
/// against the world the previous ones produced.
#[derive(Parser, Debug)]
#[command(name = "voxler", version, about)]
pub struct Args {
    /// Scene file(s) (TOML) to apply, in order
    #[arg(short, long = "scene", required = true, num_args = 1..)]
    pub scenes: Vec<PathBuf>,

    /// Appearance library (TOML); defaults to the stock library
    #[arg(long)]
    pub appearances: Option<PathBuf>,

    /// Name of the component the voxel bodies live in
    #[arg(long, default_value = "voxel world")]
    pub component: String,

    /// Rescale the world to this grid size after all scenes
    #[arg(long)]
    pub grid_size: Option<f64>,

    /// Move the world to this offset (x,y,z in grid units) after all scenes
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    pub offset: Option<Offset>,

    /// Simulate pressing "cancel" after this many voxels of each batch
    #[arg(long)]
    pub cancel_after: Option<usize>,

    /// Print the final world as a scene file
    #[arg(long)]
    pub dump: bool,
}

fn parse_offset(s: &str) -> Result<Offset, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got {s:?}"));
    };
    let num = |v: &str| v.parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Offset::new(num(*x)?, num(*y)?, num(*z)?))
}
