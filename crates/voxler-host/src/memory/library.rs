use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Rgba;

#[derive(Clone, Debug)]
pub struct LibraryAppearance {
    pub key: String,
    pub color: Rgba,
    pub category: Option<String>,
}

/// Read-only appearance library, the in-memory stand-in for the host's
/// bundled appearance catalog. Index in `appearances` is the appearance id.
#[derive(Default, Clone, Debug)]
pub struct AppearanceLibrary {
    pub appearances: Vec<LibraryAppearance>,
    pub by_key: HashMap<String, u32>,
}

impl AppearanceLibrary {
    pub fn new() -> Self {
        Self {
            appearances: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// A handful of stock appearances found in every host installation.
    pub fn stock() -> Self {
        let mut lib = Self::new();
        for (key, color, category) in [
            ("Steel - Satin", Rgba::opaque(190, 190, 190), "Metal"),
            ("Aluminum - Anodized Glossy (Blue)", Rgba::opaque(40, 80, 200), "Metal"),
            ("Oak", Rgba::opaque(170, 125, 70), "Wood"),
            ("Paint - Enamel Glossy (Red)", Rgba::opaque(200, 20, 20), "Paint"),
            ("Plastic - Matte (White)", Rgba::opaque(240, 240, 240), "Plastic"),
        ] {
            lib.insert(key, color, Some(category.to_string()));
        }
        lib
    }

    pub fn get_id(&self, key: &str) -> Option<u32> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: u32) -> Option<&LibraryAppearance> {
        self.appearances.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.appearances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appearances.is_empty()
    }

    fn insert(&mut self, key: &str, color: Rgba, category: Option<String>) -> u32 {
        if let Some(id) = self.get_id(key) {
            return id;
        }
        let id = self.appearances.len() as u32;
        self.by_key.insert(key.to_string(), id);
        self.appearances.push(LibraryAppearance {
            key: key.to_string(),
            color,
            category,
        });
        id
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AppearancesConfig = toml::from_str(toml_str)?;
        let mut lib = AppearanceLibrary::new();
        let mut entries: Vec<(String, AppearanceEntry)> = cfg.appearances.into_iter().collect();
        // Ids must not depend on map iteration order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let (color, category) = match entry {
                AppearanceEntry::Color(c) => (c, None),
                AppearanceEntry::Detail { color, category } => (color, category),
            };
            lib.insert(&key, color, category);
        }
        Ok(lib)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// File format

#[derive(Deserialize)]
pub struct AppearancesConfig {
    pub appearances: HashMap<String, AppearanceEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum AppearanceEntry {
    // Simple: "Oak" = [170, 125, 70, 255]
    Color(Rgba),
    // Detailed: "Oak" = { color = [170, 125, 70, 255], category = "Wood" }
    Detail {
        color: Rgba,
        category: Option<String>,
    },
}
