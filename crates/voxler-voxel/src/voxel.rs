use voxler_geom::Vec3;
use voxler_host::{BodyId, ComponentId, DesignMode, GeometryKernel, Host, HostError, Rgba};

use crate::appearance::resolve_appearance;
use crate::error::{DeleteFailed, VoxelError};
use crate::spec::{Shape, VoxelSpec};

/// One placed solid. Owns exactly one body in the host document.
///
/// Shape, center, side length and component are fixed at creation; moving or
/// resizing a voxel means deleting it and creating a new one. `delete`
/// consumes the voxel so a released body can never be touched again.
#[derive(Debug)]
pub struct Voxel {
    component: ComponentId,
    shape: Shape,
    center: Vec3,
    side_length: f64,
    body: BodyId,
    color: Option<Rgba>,
    appearance: String,
    name: String,
}

/// Shape-specific body factory. The sphere's diameter is the side length.
fn build_body<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    component: ComponentId,
    shape: Shape,
    center: Vec3,
    side_length: f64,
) -> Result<BodyId, HostError> {
    match shape {
        Shape::Cube => kernel.create_cube(component, center, side_length),
        Shape::Sphere => kernel.create_sphere(component, center, side_length),
    }
}

impl Voxel {
    pub fn create<H: Host + ?Sized>(
        host: &mut H,
        component: ComponentId,
        center: Vec3,
        side_length: f64,
        spec: &VoxelSpec,
    ) -> Result<Self, VoxelError> {
        if host.design_mode() == DesignMode::Parametric {
            return Err(VoxelError::ParametricDesign);
        }

        let body = build_body(&mut *host, component, spec.shape, center, side_length)?;
        let voxel = Voxel {
            component,
            shape: spec.shape,
            center,
            side_length,
            body,
            color: spec.color,
            appearance: spec.appearance.clone(),
            name: spec.name.clone(),
        };

        let styled = voxel
            .apply_appearance(host, &voxel.appearance, voxel.color)
            .and_then(|()| {
                host.set_body_name(body, &voxel.name)
                    .map_err(VoxelError::from)
            });
        if let Err(e) = styled {
            // Do not leave an unstyled body behind in the document.
            if let Err(cleanup) = host.delete_body(body) {
                log::warn!(target: "voxel", "could not remove half-built {body}: {cleanup}");
            }
            return Err(e);
        }

        log::debug!(
            target: "voxel",
            "created {} {} at ({:.3}, {:.3}, {:.3}) size {}",
            voxel.shape,
            body,
            center.x,
            center.y,
            center.z,
            side_length
        );
        Ok(voxel)
    }

    fn apply_appearance<H: Host + ?Sized>(
        &self,
        host: &mut H,
        appearance: &str,
        color: Option<Rgba>,
    ) -> Result<(), VoxelError> {
        let id = resolve_appearance(host, appearance, color)?;
        host.set_body_appearance(self.body, id)?;
        Ok(())
    }

    /// Retints the body. Returns whether the host was touched.
    pub fn set_color<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        color: Option<Rgba>,
    ) -> Result<bool, VoxelError> {
        if self.color == color {
            return Ok(false);
        }
        self.apply_appearance(host, &self.appearance, color)?;
        self.color = color;
        Ok(true)
    }

    pub fn set_appearance<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        appearance: &str,
    ) -> Result<bool, VoxelError> {
        if self.appearance == appearance {
            return Ok(false);
        }
        self.apply_appearance(host, appearance, self.color)?;
        self.appearance = appearance.to_string();
        Ok(true)
    }

    pub fn set_name<K: GeometryKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        name: &str,
    ) -> Result<bool, VoxelError> {
        if self.name == name {
            return Ok(false);
        }
        kernel.set_body_name(self.body, name)?;
        self.name = name.to_string();
        Ok(true)
    }

    /// Applies the mutable fields of `spec` (appearance, color, name), each
    /// only when it differs. The shape is ignored; callers rebuild on shape
    /// changes. Returns whether anything changed.
    pub fn restyle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        spec: &VoxelSpec,
    ) -> Result<bool, VoxelError> {
        let mut changed = false;
        match (self.appearance != spec.appearance, self.color != spec.color) {
            (false, false) => {}
            (true, false) => changed |= self.set_appearance(host, &spec.appearance)?,
            (false, true) => changed |= self.set_color(host, spec.color)?,
            (true, true) => {
                // Resolve once so no intermediate tinted variant is created.
                self.apply_appearance(host, &spec.appearance, spec.color)?;
                self.appearance = spec.appearance.clone();
                self.color = spec.color;
                changed = true;
            }
        }
        changed |= self.set_name(host, &spec.name)?;
        Ok(changed)
    }

    /// Releases the body.
    pub fn delete<K: GeometryKernel + ?Sized>(self, kernel: &mut K) -> Result<(), DeleteFailed> {
        match kernel.delete_body(self.body) {
            Ok(()) => {
                log::debug!(target: "voxel", "deleted {} {}", self.shape, self.body);
                Ok(())
            }
            Err(source) => Err(DeleteFailed {
                body: self.body,
                source,
            }),
        }
    }

    /// Snapshot of the placement-independent description.
    pub fn spec(&self) -> VoxelSpec {
        VoxelSpec {
            shape: self.shape,
            color: self.color,
            appearance: self.appearance.clone(),
            name: self.name.clone(),
        }
    }

    /// True when applying `spec` would touch the host.
    pub fn differs_from(&self, spec: &VoxelSpec) -> bool {
        self.shape != spec.shape
            || self.appearance != spec.appearance
            || self.color != spec.color
            || self.name != spec.name
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    #[inline]
    pub fn component(&self) -> ComponentId {
        self.component
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    #[inline]
    pub fn appearance(&self) -> &str {
        &self.appearance
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
