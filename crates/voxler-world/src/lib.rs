//! Sparse voxel world synced to declarative world definitions.
#![forbid(unsafe_code)]

mod config;
mod error;
mod world;

pub use config::{ProgressSettings, WorldConfig};
pub use error::WorldError;
pub use world::{VoxelChange, VoxelWorld, WorldStats};
