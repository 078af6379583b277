use hashbrown::HashMap;
use voxler_geom::Vec3;

use super::library::AppearanceLibrary;
use crate::{
    AppearanceId, AppearanceRegistry, BodyId, ComponentId, DesignMode, GeometryKernel, HostError,
    Rgba,
};

/// One mutating call that reached the host, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum HostOp {
    CreateCube {
        body: BodyId,
        center: Vec3,
        side: f64,
    },
    CreateSphere {
        body: BodyId,
        center: Vec3,
        diameter: f64,
    },
    RenameBody {
        body: BodyId,
        name: String,
    },
    SetBodyAppearance {
        body: BodyId,
        appearance: AppearanceId,
    },
    DeleteBody {
        body: BodyId,
    },
    CopyAppearance {
        base: AppearanceId,
        copy: AppearanceId,
        name: String,
    },
    SetAppearanceColor {
        appearance: AppearanceId,
        color: Rgba,
    },
}

impl HostOp {
    /// Body creations and deletions, the expensive kernel calls.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            HostOp::CreateCube { .. } | HostOp::CreateSphere { .. } | HostOp::DeleteBody { .. }
        )
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, HostOp::CreateCube { .. } | HostOp::CreateSphere { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyShape {
    Box { side: f64 },
    Sphere { diameter: f64 },
}

#[derive(Clone, Debug)]
pub struct MemoryBody {
    pub component: ComponentId,
    pub center: Vec3,
    pub shape: BodyShape,
    pub name: String,
    pub appearance: Option<AppearanceId>,
}

#[derive(Clone, Debug)]
struct DocAppearance {
    name: String,
    color: Rgba,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct MemoryHostStats {
    pub components: usize,
    pub bodies: usize,
    pub document_appearances: usize,
    pub journal_entries: usize,
}

/// In-process host: keeps bodies and appearances in maps and journals every
/// mutating call. Library appearances take ids `0..library.len()`, document
/// copies are numbered after them.
pub struct MemoryHost {
    mode: DesignMode,
    library: AppearanceLibrary,
    components: Vec<String>,
    bodies: HashMap<BodyId, MemoryBody>,
    doc_appearances: Vec<DocAppearance>,
    doc_by_name: HashMap<String, AppearanceId>,
    journal: Vec<HostOp>,
    next_body: u64,
}

impl MemoryHost {
    pub fn new(library: AppearanceLibrary) -> Self {
        Self {
            mode: DesignMode::Direct,
            library,
            components: Vec::new(),
            bodies: HashMap::new(),
            doc_appearances: Vec::new(),
            doc_by_name: HashMap::new(),
            journal: Vec::new(),
            next_body: 1,
        }
    }

    pub fn with_stock_library() -> Self {
        Self::new(AppearanceLibrary::stock())
    }

    pub fn set_design_mode(&mut self, mode: DesignMode) {
        self.mode = mode;
    }

    pub fn add_component(&mut self, name: &str) -> ComponentId {
        self.components.push(name.to_string());
        ComponentId(self.components.len() as u32 - 1)
    }

    pub fn component_name(&self, component: ComponentId) -> Option<&str> {
        self.components.get(component.0 as usize).map(String::as_str)
    }

    pub fn body(&self, body: BodyId) -> Option<&MemoryBody> {
        self.bodies.get(&body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Removes a body behind the world's back, as a user deleting it in the browser would.
    pub fn invalidate_body(&mut self, body: BodyId) -> bool {
        self.bodies.remove(&body).is_some()
    }

    pub fn appearance_color(&self, appearance: AppearanceId) -> Option<Rgba> {
        let idx = appearance.0 as usize;
        match idx.checked_sub(self.library.len()) {
            None => self.library.get(appearance.0).map(|a| a.color),
            Some(doc) => self.doc_appearances.get(doc).map(|a| a.color),
        }
    }

    pub fn document_appearance_count(&self) -> usize {
        self.doc_appearances.len()
    }

    pub fn journal(&self) -> &[HostOp] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.journal)
    }

    pub fn geometry_ops(&self) -> usize {
        self.journal.iter().filter(|op| op.is_geometry()).count()
    }

    pub fn creations(&self) -> usize {
        self.journal.iter().filter(|op| op.is_creation()).count()
    }

    pub fn deletions(&self) -> usize {
        self.journal
            .iter()
            .filter(|op| matches!(op, HostOp::DeleteBody { .. }))
            .count()
    }

    pub fn stats(&self) -> MemoryHostStats {
        MemoryHostStats {
            components: self.components.len(),
            bodies: self.bodies.len(),
            document_appearances: self.doc_appearances.len(),
            journal_entries: self.journal.len(),
        }
    }

    fn record(&mut self, op: HostOp) {
        log::trace!(target: "host", "{op:?}");
        self.journal.push(op);
    }

    fn check_component(&self, component: ComponentId) -> Result<(), HostError> {
        if (component.0 as usize) < self.components.len() {
            Ok(())
        } else {
            Err(HostError::UnknownComponent(component))
        }
    }

    fn add_body(&mut self, component: ComponentId, center: Vec3, shape: BodyShape) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(
            id,
            MemoryBody {
                component,
                center,
                shape,
                name: String::from("Body"),
                appearance: None,
            },
        );
        id
    }

    fn doc_appearance_mut(&mut self, appearance: AppearanceId) -> Option<&mut DocAppearance> {
        let doc = (appearance.0 as usize).checked_sub(self.library.len())?;
        self.doc_appearances.get_mut(doc)
    }

    fn appearance_exists(&self, appearance: AppearanceId) -> bool {
        (appearance.0 as usize) < self.library.len() + self.doc_appearances.len()
    }
}

impl GeometryKernel for MemoryHost {
    fn design_mode(&self) -> DesignMode {
        self.mode
    }

    fn create_cube(
        &mut self,
        component: ComponentId,
        center: Vec3,
        side: f64,
    ) -> Result<BodyId, HostError> {
        self.check_component(component)?;
        if !(side.is_finite() && side > 0.0) {
            return Err(HostError::Kernel(format!("invalid box size {side}")));
        }
        let body = self.add_body(component, center, BodyShape::Box { side });
        self.record(HostOp::CreateCube { body, center, side });
        Ok(body)
    }

    fn create_sphere(
        &mut self,
        component: ComponentId,
        center: Vec3,
        diameter: f64,
    ) -> Result<BodyId, HostError> {
        self.check_component(component)?;
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(HostError::Kernel(format!("invalid sphere diameter {diameter}")));
        }
        let body = self.add_body(component, center, BodyShape::Sphere { diameter });
        self.record(HostOp::CreateSphere {
            body,
            center,
            diameter,
        });
        Ok(body)
    }

    fn set_body_name(&mut self, body: BodyId, name: &str) -> Result<(), HostError> {
        let b = self.bodies.get_mut(&body).ok_or(HostError::StaleBody(body))?;
        b.name = name.to_string();
        self.record(HostOp::RenameBody {
            body,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_body_appearance(
        &mut self,
        body: BodyId,
        appearance: AppearanceId,
    ) -> Result<(), HostError> {
        if !self.appearance_exists(appearance) {
            return Err(HostError::UnknownAppearance(appearance));
        }
        let b = self.bodies.get_mut(&body).ok_or(HostError::StaleBody(body))?;
        b.appearance = Some(appearance);
        self.record(HostOp::SetBodyAppearance { body, appearance });
        Ok(())
    }

    fn body_exists(&self, body: BodyId) -> bool {
        self.bodies.contains_key(&body)
    }

    fn delete_body(&mut self, body: BodyId) -> Result<(), HostError> {
        self.bodies.remove(&body).ok_or(HostError::StaleBody(body))?;
        self.record(HostOp::DeleteBody { body });
        Ok(())
    }
}

impl AppearanceRegistry for MemoryHost {
    fn library_appearance(&self, name: &str) -> Option<AppearanceId> {
        self.library.get_id(name).map(AppearanceId)
    }

    fn find_by_name(&self, name: &str) -> Option<AppearanceId> {
        self.doc_by_name.get(name).copied()
    }

    fn copy_appearance(
        &mut self,
        base: AppearanceId,
        new_name: &str,
    ) -> Result<AppearanceId, HostError> {
        let color = self
            .appearance_color(base)
            .ok_or(HostError::UnknownAppearance(base))?;
        if self.doc_by_name.contains_key(new_name) {
            return Err(HostError::Kernel(format!(
                "appearance {new_name:?} already exists in the document"
            )));
        }
        let copy = AppearanceId((self.library.len() + self.doc_appearances.len()) as u32);
        self.doc_appearances.push(DocAppearance {
            name: new_name.to_string(),
            color,
        });
        self.doc_by_name.insert(new_name.to_string(), copy);
        self.record(HostOp::CopyAppearance {
            base,
            copy,
            name: new_name.to_string(),
        });
        Ok(copy)
    }

    fn set_appearance_color(
        &mut self,
        appearance: AppearanceId,
        color: Rgba,
    ) -> Result<(), HostError> {
        // Library entries are read-only; only document copies can be tinted.
        let doc = self
            .doc_appearance_mut(appearance)
            .ok_or(HostError::UnknownAppearance(appearance))?;
        doc.color = color;
        self.record(HostOp::SetAppearanceColor { appearance, color });
        Ok(())
    }

    fn appearance_name(&self, appearance: AppearanceId) -> Option<&str> {
        let idx = appearance.0 as usize;
        match idx.checked_sub(self.library.len()) {
            None => self.library.get(appearance.0).map(|a| a.key.as_str()),
            Some(doc) => self.doc_appearances.get(doc).map(|a| a.name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_require_known_component() {
        let mut host = MemoryHost::with_stock_library();
        let err = host
            .create_cube(ComponentId(3), Vec3::ZERO, 1.0)
            .unwrap_err();
        assert!(matches!(err, HostError::UnknownComponent(ComponentId(3))));
        let comp = host.add_component("world");
        assert_eq!(host.component_name(comp), Some("world"));
        let body = host.create_sphere(comp, Vec3::new(1.0, 2.0, 3.0), 2.0).unwrap();
        let b = host.body(body).unwrap();
        assert_eq!(b.shape, BodyShape::Sphere { diameter: 2.0 });
        assert_eq!(b.center, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn deleting_invalidated_body_reports_stale() {
        let mut host = MemoryHost::with_stock_library();
        let comp = host.add_component("world");
        let body = host.create_cube(comp, Vec3::ZERO, 1.0).unwrap();
        assert!(host.body_exists(body));
        assert!(host.invalidate_body(body));
        assert!(!host.body_exists(body));
        let err = host.delete_body(body).unwrap_err();
        assert!(matches!(err, HostError::StaleBody(b) if b == body));
        assert_eq!(host.deletions(), 0);
    }

    #[test]
    fn copies_are_document_appearances() {
        let mut host = MemoryHost::with_stock_library();
        let oak = host.library_appearance("Oak").unwrap();
        assert!(host.find_by_name("Oak").is_none());
        let red = host.copy_appearance(oak, "Oak__red").unwrap();
        host.set_appearance_color(red, Rgba::opaque(255, 0, 0)).unwrap();
        assert_eq!(host.find_by_name("Oak__red"), Some(red));
        assert_eq!(host.appearance_name(red), Some("Oak__red"));
        assert_eq!(host.appearance_color(red), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(host.appearance_color(oak), Some(Rgba::opaque(170, 125, 70)));
        assert!(host.copy_appearance(oak, "Oak__red").is_err());
        assert!(host.set_appearance_color(oak, Rgba::default()).is_err());
        assert_eq!(host.stats().document_appearances, 1);
    }

    #[test]
    fn journal_counts_geometry_ops() {
        let mut host = MemoryHost::with_stock_library();
        let comp = host.add_component("world");
        let a = host.create_cube(comp, Vec3::ZERO, 1.0).unwrap();
        host.set_body_name(a, "a").unwrap();
        host.delete_body(a).unwrap();
        assert_eq!(host.geometry_ops(), 2);
        assert_eq!(host.creations(), 1);
        assert_eq!(host.deletions(), 1);
        assert_eq!(host.take_journal().len(), 3);
        assert!(host.journal().is_empty());
    }
}
