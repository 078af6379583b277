use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use voxler_geom::GridCoord;
use voxler_voxel::{VoxelSpec, WorldDef};
use voxler_world::{VoxelWorld, WorldConfig};

/// Scene file: world settings plus the voxels to place.
///
/// ```toml
/// [world]
/// grid_size = 1.0
/// offset = [0, 0, 0]
///
/// [[voxels]]
/// at = [0, 0, 0]
/// shape = "sphere"
/// color = [255, 0, 0, 255]
///
/// [[fills]]
/// from = [0, 0, 0]
/// to = [3, 0, 3]
/// appearance = "Oak"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<SceneFill>,
    #[serde(default)]
    pub voxels: Vec<SceneVoxel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneVoxel {
    pub at: GridCoord,
    #[serde(flatten)]
    pub spec: VoxelSpec,
}

/// Inclusive box of identical voxels.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneFill {
    pub from: GridCoord,
    pub to: GridCoord,
    #[serde(flatten)]
    pub spec: VoxelSpec,
}

impl SceneFill {
    fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let (x0, x1) = (self.from.x.min(self.to.x), self.from.x.max(self.to.x));
        let (y0, y1) = (self.from.y.min(self.to.y), self.from.y.max(self.to.y));
        let (z0, z1) = (self.from.z.min(self.to.z), self.from.z.max(self.to.z));
        (x0..=x1).flat_map(move |x| {
            (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| GridCoord::new(x, y, z)))
        })
    }
}

impl SceneFile {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Fills first, then single voxels; later entries win on shared coordinates.
    pub fn world_def(&self) -> WorldDef {
        let mut def = WorldDef::new();
        for fill in &self.fills {
            for coord in fill.coords() {
                def.insert(coord, fill.spec.clone());
            }
        }
        for v in &self.voxels {
            if def.insert(v.at, v.spec.clone()).is_some() {
                log::debug!(target: "scene", "voxel at {} overrides an earlier entry", v.at);
            }
        }
        def
    }

    /// Scene reproducing the world's current state.
    pub fn from_world(world: &VoxelWorld) -> Self {
        Self {
            world: WorldConfig {
                grid_size: world.grid_size(),
                offset: world.offset(),
                progress: world.progress_settings().clone(),
            },
            fills: Vec::new(),
            voxels: world
                .get_current_world_def()
                .into_iter()
                .map(|(at, spec)| SceneVoxel { at, spec })
                .collect(),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(toml::to_string(self)?)
    }
}
