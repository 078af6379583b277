use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxler_geom::GridCoord;
use voxler_host::Rgba;

use crate::error::VoxelError;

pub const DEFAULT_APPEARANCE: &str = "Steel - Satin";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Cube,
    Sphere,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Cube, Shape::Sphere];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Sphere => "sphere",
        }
    }

    /// Display name given to a body when none is set.
    pub fn default_name(self) -> &'static str {
        match self {
            Shape::Cube => "Cube",
            Shape::Sphere => "Sphere",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(Shape::Cube),
            "sphere" => Ok(Shape::Sphere),
            other => Err(VoxelError::InvalidShape(other.to_string())),
        }
    }
}

/// Placement-independent description of one voxel.
///
/// Defaults: cube, no tint, `"Steel - Satin"`, and the shape's label as name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVoxelSpec")]
pub struct VoxelSpec {
    pub shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    pub appearance: String,
    pub name: String,
}

impl VoxelSpec {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            color: None,
            appearance: DEFAULT_APPEARANCE.to_string(),
            name: shape.default_name().to_string(),
        }
    }

    pub fn cube() -> Self {
        Self::new(Shape::Cube)
    }

    pub fn sphere() -> Self {
        Self::new(Shape::Sphere)
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.appearance = appearance.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds a spec from an untyped shape token, as received from scripts or files.
    pub fn parse(
        shape: &str,
        color: Option<Rgba>,
        appearance: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, VoxelError> {
        let shape = shape.parse::<Shape>()?;
        Ok(Self {
            shape,
            color,
            appearance: appearance.unwrap_or(DEFAULT_APPEARANCE).to_string(),
            name: name.unwrap_or(shape.default_name()).to_string(),
        })
    }
}

impl Default for VoxelSpec {
    fn default() -> Self {
        Self::cube()
    }
}

#[derive(Deserialize)]
struct RawVoxelSpec {
    #[serde(default = "default_shape")]
    shape: String,
    #[serde(default)]
    color: Option<Rgba>,
    #[serde(default)]
    appearance: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn default_shape() -> String {
    Shape::Cube.as_str().to_string()
}

impl TryFrom<RawVoxelSpec> for VoxelSpec {
    type Error = VoxelError;

    fn try_from(raw: RawVoxelSpec) -> Result<Self, Self::Error> {
        VoxelSpec::parse(
            &raw.shape,
            raw.color,
            raw.appearance.as_deref(),
            raw.name.as_deref(),
        )
    }
}

/// Desired or observed world: grid coordinate to voxel spec. Iteration is in
/// coordinate order, which is also the order batch updates process entries.
pub type WorldDef = BTreeMap<GridCoord, VoxelSpec>;
