use serde::{Deserialize, Serialize};
use voxler_geom::{Offset, Placement};

/// Construction parameters of a world, as found under `[world]` in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub progress: ProgressSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            offset: Offset::default(),
            progress: ProgressSettings::default(),
        }
    }
}

impl WorldConfig {
    pub fn placement(&self) -> Placement {
        Placement::new(self.grid_size, self.offset)
    }
}

fn default_grid_size() -> f64 {
    1.0
}

/// When and how batch updates report progress.
///
/// A dialog is only shown when at least `threshold` voxels need work; small
/// updates apply silently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSettings {
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            title: default_title(),
            message: default_message(),
        }
    }
}

fn default_threshold() -> usize {
    25
}
fn default_title() -> String {
    "Updating voxel world".to_string()
}
fn default_message() -> String {
    // %v / %m are expanded by the host dialog to the current and maximum value.
    "Processed %v of %m voxels".to_string()
}
