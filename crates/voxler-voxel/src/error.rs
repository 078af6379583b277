use thiserror::Error;
use voxler_host::{BodyId, HostError};

#[derive(Debug, Error)]
pub enum VoxelError {
    #[error("invalid voxel shape {0:?}, expected \"cube\" or \"sphere\"")]
    InvalidShape(String),

    #[error("direct voxels cannot be created while the design is in parametric mode")]
    ParametricDesign,

    #[error("appearance {0:?} not found in the appearance library")]
    UnknownAppearance(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Body could not be released, usually because it was already removed from
/// the document. Callers log it and carry on.
#[derive(Debug, Error)]
#[error("failed to delete {body}: {source}")]
pub struct DeleteFailed {
    pub body: BodyId,
    pub source: HostError,
}
