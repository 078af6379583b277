use hashbrown::HashMap;
use voxler_geom::{GridCoord, Offset, Placement, Vec3};
use voxler_host::{ComponentId, DesignMode, GeometryKernel, Host, HostError, ProgressReporter};
use voxler_voxel::{Shape, Voxel, VoxelError, VoxelSpec, WorldDef};

use crate::config::{ProgressSettings, WorldConfig};
use crate::error::WorldError;

/// What `add_voxel` did at one coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoxelChange {
    Created,
    /// Shape differed: old body deleted, new one created.
    Recreated,
    /// Same shape, some of appearance/color/name changed in place.
    Updated,
    Unchanged,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub voxels: usize,
    pub cubes: usize,
    pub spheres: usize,
}

#[derive(Default, Debug)]
struct UpdateTally {
    deleted: usize,
    created: usize,
    recreated: usize,
    updated: usize,
    unchanged: usize,
}

impl UpdateTally {
    fn record(&mut self, change: VoxelChange) {
        match change {
            VoxelChange::Created => self.created += 1,
            VoxelChange::Recreated => self.recreated += 1,
            VoxelChange::Updated => self.updated += 1,
            VoxelChange::Unchanged => self.unchanged += 1,
        }
    }
}

/// Sparse grid of voxels living in one host component.
///
/// Every voxel shares the same size (`grid_size`) and the placement
/// `center = (coord + offset) * grid_size`. At most one voxel exists per
/// coordinate and every stored voxel holds a live body. The map is never
/// handed out mutably; callers read through `get_voxel` and friends and
/// change the world through `add_voxel`, `delete_voxel`, `clear` and `update`.
pub struct VoxelWorld {
    component: ComponentId,
    placement: Placement,
    progress: ProgressSettings,
    voxels: HashMap<GridCoord, Voxel>,
}

impl VoxelWorld {
    pub fn new(component: ComponentId, config: WorldConfig) -> Result<Self, WorldError> {
        if !Placement::is_valid_grid_size(config.grid_size) {
            return Err(WorldError::InvalidGridSize(config.grid_size));
        }
        Ok(Self {
            component,
            placement: config.placement(),
            progress: config.progress,
            voxels: HashMap::new(),
        })
    }

    /// Places `spec` at `coord`: creates the voxel when absent, restyles it
    /// in place when the shape matches, and deletes then recreates it when
    /// the shape differs. A voxel whose body was removed from the document
    /// behind the world's back is rebuilt from `spec`.
    pub fn add_voxel<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        coord: GridCoord,
        spec: &VoxelSpec,
    ) -> Result<VoxelChange, WorldError> {
        let lost = self
            .voxels
            .get(&coord)
            .is_some_and(|voxel| !host.body_exists(voxel.body()));
        if lost {
            self.forget_lost(coord);
        }

        let replace = match self.voxels.get_mut(&coord) {
            Some(voxel) if voxel.shape() == spec.shape => match voxel.restyle(host, spec) {
                Ok(changed) => {
                    return Ok(if changed {
                        VoxelChange::Updated
                    } else {
                        VoxelChange::Unchanged
                    });
                }
                Err(VoxelError::Host(HostError::StaleBody(_))) => {
                    self.forget_lost(coord);
                    true
                }
                Err(e) => return Err(e.into()),
            },
            Some(_) => true,
            None => lost,
        };

        // Fail before deleting anything when the replacement cannot be built.
        check_creatable(host, spec)?;
        if replace {
            self.delete_voxel(host, coord);
        }

        let voxel = Voxel::create(
            host,
            self.component,
            self.placement.real_center(coord),
            self.placement.side_length(),
            spec,
        )?;
        self.voxels.insert(coord, voxel);
        Ok(if replace {
            VoxelChange::Recreated
        } else {
            VoxelChange::Created
        })
    }

    /// Removes the voxel at `coord`. Returns true when a voxel was present and
    /// its body was released cleanly. A body that is already gone from the
    /// document is logged and the entry dropped anyway.
    pub fn delete_voxel<K: GeometryKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        coord: GridCoord,
    ) -> bool {
        let Some(voxel) = self.voxels.remove(&coord) else {
            return false;
        };
        match voxel.delete(kernel) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(target: "world", "voxel at {coord}: {e}");
                false
            }
        }
    }

    /// Drops the entry at `coord` without touching the host; its body is gone.
    fn forget_lost(&mut self, coord: GridCoord) {
        if let Some(voxel) = self.voxels.remove(&coord) {
            log::warn!(
                target: "world",
                "voxel at {coord}: {} is gone from the document, rebuilding",
                voxel.body()
            );
        }
    }

    /// Deletes every voxel. Returns how many entries were removed.
    pub fn clear<K: GeometryKernel + ?Sized>(&mut self, kernel: &mut K) -> usize {
        let coords: Vec<GridCoord> = self.voxels.keys().copied().collect();
        for coord in &coords {
            self.delete_voxel(kernel, *coord);
        }
        coords.len()
    }

    /// Number of coordinates in `desired` that would need any host work:
    /// absent here, or differing in shape, appearance, color or name.
    pub fn number_of_changes(&self, desired: &WorldDef) -> usize {
        desired
            .iter()
            .filter(|(coord, spec)| match self.voxels.get(*coord) {
                Some(voxel) => voxel.differs_from(spec),
                None => true,
            })
            .count()
    }

    /// Reconciles the world with `desired`.
    ///
    /// Voxels missing from `desired` are deleted first, unconditionally.
    /// Every entry of `desired` is then passed to `add_voxel` in coordinate
    /// order. With a reporter and at least `progress.threshold` pending
    /// changes, a progress dialog spans the whole batch and is polled for
    /// cancellation before each coordinate.
    ///
    /// Returns `Ok(false)` when cancelled; the world then matches `desired`
    /// only for the coordinates processed so far.
    pub fn update<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        desired: &WorldDef,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<bool, WorldError> {
        let mut tally = UpdateTally::default();

        let stale: Vec<GridCoord> = self
            .voxels
            .keys()
            .filter(|coord| !desired.contains_key(*coord))
            .copied()
            .collect();
        for coord in stale {
            self.delete_voxel(host, coord);
            tally.deleted += 1;
        }

        let pending = self.number_of_changes(desired);
        let reporter = progress.filter(|_| pending >= self.progress.threshold);

        let completed = match reporter {
            None => {
                for (coord, spec) in desired {
                    tally.record(self.add_voxel(host, *coord, spec)?);
                }
                true
            }
            Some(reporter) => self.apply_with_progress(host, desired, reporter, &mut tally)?,
        };

        log::info!(
            target: "world",
            "update {}: {} deleted, {} created, {} recreated, {} updated, {} unchanged ({} voxels)",
            if completed { "done" } else { "cancelled" },
            tally.deleted,
            tally.created,
            tally.recreated,
            tally.updated,
            tally.unchanged,
            self.voxels.len()
        );
        Ok(completed)
    }

    fn apply_with_progress<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        desired: &WorldDef,
        reporter: &mut dyn ProgressReporter,
        tally: &mut UpdateTally,
    ) -> Result<bool, WorldError> {
        reporter.show(
            &self.progress.title,
            &self.progress.message,
            0,
            desired.len(),
        );
        for (i, (coord, spec)) in desired.iter().enumerate() {
            if reporter.was_cancelled() {
                log::debug!(target: "world", "cancelled after {i} of {}", desired.len());
                reporter.hide();
                return Ok(false);
            }
            match self.add_voxel(host, *coord, spec) {
                Ok(change) => tally.record(change),
                Err(e) => {
                    reporter.hide();
                    return Err(e);
                }
            }
            reporter.set_progress(i + 1);
        }
        reporter.hide();
        Ok(true)
    }

    /// Changes the voxel size. Every voxel is destroyed and recreated at the
    /// new scale; the world definition is preserved. Same size is a no-op.
    pub fn set_grid_size<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        grid_size: f64,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<bool, WorldError> {
        if !Placement::is_valid_grid_size(grid_size) {
            return Err(WorldError::InvalidGridSize(grid_size));
        }
        if grid_size == self.placement.grid_size {
            return Ok(true);
        }
        let placement = Placement::new(grid_size, self.placement.offset);
        self.rebuild(host, placement, progress)
    }

    /// Moves the whole world by a new offset. Rebuilds like `set_grid_size`.
    pub fn set_offset<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        offset: Offset,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<bool, WorldError> {
        if offset == self.placement.offset {
            return Ok(true);
        }
        let placement = Placement::new(self.placement.grid_size, offset);
        self.rebuild(host, placement, progress)
    }

    fn rebuild<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        placement: Placement,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<bool, WorldError> {
        let snapshot = self.get_current_world_def();
        log::info!(
            target: "world",
            "rebuilding {} voxels: grid {} -> {}, offset {} -> {}",
            snapshot.len(),
            self.placement.grid_size,
            placement.grid_size,
            self.placement.offset,
            placement.offset
        );
        self.clear(host);
        self.placement = placement;
        self.update(host, &snapshot, progress)
    }

    pub fn set_progress_settings(&mut self, settings: ProgressSettings) {
        self.progress = settings;
    }

    // Read-only views. The map itself never leaves the world.

    pub fn get_voxel(&self, coord: GridCoord) -> Option<&Voxel> {
        self.voxels.get(&coord)
    }

    /// All voxels, in coordinate order.
    pub fn get_all_voxels(&self) -> Vec<&Voxel> {
        self.get_coordinates()
            .into_iter()
            .filter_map(|coord| self.voxels.get(&coord))
            .collect()
    }

    /// Occupied coordinates, sorted.
    pub fn get_coordinates(&self) -> Vec<GridCoord> {
        let mut coords: Vec<GridCoord> = self.voxels.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Current state as a world definition; `update` accepts it unchanged.
    pub fn get_current_world_def(&self) -> WorldDef {
        self.voxels
            .iter()
            .map(|(coord, voxel)| (*coord, voxel.spec()))
            .collect()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.voxels.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn stats(&self) -> WorldStats {
        let spheres = self
            .voxels
            .values()
            .filter(|v| v.shape() == Shape::Sphere)
            .count();
        WorldStats {
            voxels: self.voxels.len(),
            cubes: self.voxels.len() - spheres,
            spheres,
        }
    }

    #[inline]
    pub fn real_center(&self, coord: GridCoord) -> Vec3 {
        self.placement.real_center(coord)
    }

    #[inline]
    pub fn grid_size(&self) -> f64 {
        self.placement.grid_size
    }

    #[inline]
    pub fn offset(&self) -> Offset {
        self.placement.offset
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[inline]
    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn progress_settings(&self) -> &ProgressSettings {
        &self.progress
    }
}

/// Preconditions of `Voxel::create` that can be checked without touching the host.
fn check_creatable<H: Host + ?Sized>(host: &H, spec: &VoxelSpec) -> Result<(), VoxelError> {
    if host.design_mode() == DesignMode::Parametric {
        return Err(VoxelError::ParametricDesign);
    }
    if host.library_appearance(&spec.appearance).is_none() {
        return Err(VoxelError::UnknownAppearance(spec.appearance.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxler_host::MemoryHost;

    fn world(host: &mut MemoryHost) -> VoxelWorld {
        let comp = host.add_component("world");
        VoxelWorld::new(comp, WorldConfig::default()).unwrap()
    }

    #[test]
    fn rejects_bad_grid_size() {
        let mut host = MemoryHost::with_stock_library();
        let comp = host.add_component("world");
        let cfg = WorldConfig {
            grid_size: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            VoxelWorld::new(comp, cfg),
            Err(WorldError::InvalidGridSize(_))
        ));
    }

    #[test]
    fn add_voxel_reports_change_kind() {
        let mut host = MemoryHost::with_stock_library();
        let mut w = world(&mut host);
        let c = GridCoord::new(0, 0, 0);
        let cube = VoxelSpec::cube();
        assert_eq!(w.add_voxel(&mut host, c, &cube).unwrap(), VoxelChange::Created);
        assert_eq!(w.add_voxel(&mut host, c, &cube).unwrap(), VoxelChange::Unchanged);
        let named = cube.clone().with_name("x");
        assert_eq!(w.add_voxel(&mut host, c, &named).unwrap(), VoxelChange::Updated);
        let sphere = VoxelSpec::sphere();
        assert_eq!(w.add_voxel(&mut host, c, &sphere).unwrap(), VoxelChange::Recreated);
        assert_eq!(w.stats(), WorldStats { voxels: 1, cubes: 0, spheres: 1 });
    }

    #[test]
    fn shape_change_in_parametric_mode_keeps_old_voxel() {
        let mut host = MemoryHost::with_stock_library();
        let mut w = world(&mut host);
        let c = GridCoord::new(1, 2, 3);
        w.add_voxel(&mut host, c, &VoxelSpec::cube()).unwrap();
        host.set_design_mode(DesignMode::Parametric);
        let err = w.add_voxel(&mut host, c, &VoxelSpec::sphere()).unwrap_err();
        assert!(matches!(err, WorldError::Voxel(VoxelError::ParametricDesign)));
        assert_eq!(w.get_voxel(c).map(Voxel::shape), Some(Shape::Cube));
        assert_eq!(host.deletions(), 0);
    }

    #[test]
    fn delete_voxel_on_absent_coord_is_false() {
        let mut host = MemoryHost::with_stock_library();
        let mut w = world(&mut host);
        assert!(!w.delete_voxel(&mut host, GridCoord::new(9, 9, 9)));
        assert!(host.journal().is_empty());
    }

    #[test]
    fn number_of_changes_counts_name_only_differences() {
        let mut host = MemoryHost::with_stock_library();
        let mut w = world(&mut host);
        let a = GridCoord::new(0, 0, 0);
        let b = GridCoord::new(0, 0, 1);
        w.add_voxel(&mut host, a, &VoxelSpec::cube()).unwrap();
        w.add_voxel(&mut host, b, &VoxelSpec::cube()).unwrap();
        let mut desired = WorldDef::new();
        desired.insert(a, VoxelSpec::cube());
        desired.insert(b, VoxelSpec::cube().with_name("renamed"));
        desired.insert(GridCoord::new(5, 0, 0), VoxelSpec::sphere());
        assert_eq!(w.number_of_changes(&desired), 2);
    }
}
