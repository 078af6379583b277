//! Voxel entities: one placed solid (cube or sphere) with a tinted appearance.
#![forbid(unsafe_code)]

pub mod appearance;
pub mod error;
pub mod spec;
pub mod voxel;

pub use appearance::{resolve_appearance, tinted_appearance_name};
pub use error::{DeleteFailed, VoxelError};
pub use spec::{DEFAULT_APPEARANCE, Shape, VoxelSpec, WorldDef};
pub use voxel::Voxel;

// Re-exports so world callers need only this crate for the common types.
pub use voxler_geom::{GridCoord, Offset, Placement, Vec3};
pub use voxler_host::Rgba;
