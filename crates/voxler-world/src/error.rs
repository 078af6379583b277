use thiserror::Error;
use voxler_voxel::VoxelError;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("grid size must be a positive finite number, got {0}")]
    InvalidGridSize(f64),

    #[error(transparent)]
    Voxel(#[from] VoxelError),
}
