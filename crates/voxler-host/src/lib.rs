//! Collaborator interfaces to the CAD host: solid kernel, appearance registry, progress UI.
#![forbid(unsafe_code)]

pub mod memory;

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxler_geom::Vec3;

pub use memory::{AppearanceLibrary, HostOp, MemoryHost, ScriptedProgress};

/// Component (occurrence) that owns the bodies of one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(pub u32);

/// Opaque handle of one solid body in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Handle of an appearance, either a library entry or a document copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AppearanceId(pub u32);

/// RGBA tint; `o` is opacity. Serialized as `[r, g, b, o]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub o: u8,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, o: u8) -> Self {
        Self { r, g, b, o }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.o]
    }
}

/// Editing mode of the active design. Direct solids need `Direct`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignMode {
    Direct,
    Parametric,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} no longer exists in the document")]
    StaleBody(BodyId),

    #[error("unknown appearance {0:?}")]
    UnknownAppearance(AppearanceId),

    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    #[error("kernel error: {0}")]
    Kernel(String),
}

/// Solid construction and body bookkeeping.
pub trait GeometryKernel {
    fn design_mode(&self) -> DesignMode;

    /// Axis-aligned box with edge `side` centered at `center`.
    fn create_cube(
        &mut self,
        component: ComponentId,
        center: Vec3,
        side: f64,
    ) -> Result<BodyId, HostError>;

    fn create_sphere(
        &mut self,
        component: ComponentId,
        center: Vec3,
        diameter: f64,
    ) -> Result<BodyId, HostError>;

    fn set_body_name(&mut self, body: BodyId, name: &str) -> Result<(), HostError>;

    fn set_body_appearance(
        &mut self,
        body: BodyId,
        appearance: AppearanceId,
    ) -> Result<(), HostError>;

    /// False once the body was removed from the document, by us or by the user.
    fn body_exists(&self, body: BodyId) -> bool;

    fn delete_body(&mut self, body: BodyId) -> Result<(), HostError>;
}

/// Appearance library (read-only) plus the document's own appearance list.
pub trait AppearanceRegistry {
    /// Base appearance from the host's appearance library.
    fn library_appearance(&self, name: &str) -> Option<AppearanceId>;

    /// Appearance already present in the document under exactly `name`.
    fn find_by_name(&self, name: &str) -> Option<AppearanceId>;

    /// Copies `base` into the document under `new_name`.
    fn copy_appearance(
        &mut self,
        base: AppearanceId,
        new_name: &str,
    ) -> Result<AppearanceId, HostError>;

    fn set_appearance_color(
        &mut self,
        appearance: AppearanceId,
        color: Rgba,
    ) -> Result<(), HostError>;

    fn appearance_name(&self, appearance: AppearanceId) -> Option<&str>;
}

/// Everything a world needs from the host apart from progress UI.
pub trait Host: GeometryKernel + AppearanceRegistry {}

impl<T: GeometryKernel + AppearanceRegistry> Host for T {}

/// Modal progress dialog. Polling `was_cancelled` yields to the host event loop.
pub trait ProgressReporter {
    fn show(&mut self, title: &str, message: &str, min: usize, max: usize);
    fn set_progress(&mut self, value: usize);
    fn was_cancelled(&mut self) -> bool;
    fn hide(&mut self);
}
