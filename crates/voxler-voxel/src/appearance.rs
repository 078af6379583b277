//! Appearance lookup and color-tinted variants.
//!
//! A tinted variant is a document copy of a library appearance whose color
//! property is overwritten. Variants are named after the base appearance and
//! the tint, so every voxel with the same `(appearance, color)` pair shares
//! one document appearance.

use voxler_host::{AppearanceId, AppearanceRegistry, Rgba};

use crate::error::VoxelError;

const CUSTOM_COLOR_SUFFIX: &str = "__custom_";

/// `"{appearance}__custom_r{r}g{g}b{b}o{o}"`
pub fn tinted_appearance_name(appearance: &str, color: Rgba) -> String {
    let Rgba { r, g, b, o } = color;
    format!("{appearance}{CUSTOM_COLOR_SUFFIX}r{r}g{g}b{b}o{o}")
}

/// Resolves the appearance to put on a body: the library appearance itself
/// when `color` is `None`, otherwise its tinted document variant, created on
/// first use.
pub fn resolve_appearance<R: AppearanceRegistry + ?Sized>(
    registry: &mut R,
    appearance: &str,
    color: Option<Rgba>,
) -> Result<AppearanceId, VoxelError> {
    let base = registry
        .library_appearance(appearance)
        .ok_or_else(|| VoxelError::UnknownAppearance(appearance.to_string()))?;

    let Some(color) = color else {
        return Ok(base);
    };

    let tinted_name = tinted_appearance_name(appearance, color);
    if let Some(existing) = registry.find_by_name(&tinted_name) {
        return Ok(existing);
    }

    let tinted = registry.copy_appearance(base, &tinted_name)?;
    registry.set_appearance_color(tinted, color)?;
    log::debug!(target: "voxel", "created appearance {tinted_name:?}");
    Ok(tinted)
}
