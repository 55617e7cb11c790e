//! Wavefront MTL material libraries.
//!
//! A library maps material names to their ambient, diffuse and specular
//! components plus a specular exponent. Parsing lives in [`parser`].

pub mod parser;

pub use parser::{parse_mtl, parse_mtl_str};

use std::collections::BTreeMap;

use glam::Vec4;
use serde::Serialize;

/// One lighting component: an RGBA colour and an optional texture map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialComponent {
    pub color: Vec4,
    /// Texture file name exactly as written after the `map_K*` keyword.
    pub texture: Option<String>,
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            texture: None,
        }
    }
}

/// A named material from an MTL document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub ambient: MaterialComponent,
    pub diffuse: MaterialComponent,
    pub specular: MaterialComponent,
    /// `Ns`.
    pub specular_exponent: f32,
    /// `d`, or `1 - Tr`. 1 is fully opaque.
    pub dissolve: f32,
    /// `illum` lighting model.
    pub illumination: Option<u32>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: MaterialComponent::default(),
            diffuse: MaterialComponent::default(),
            specular: MaterialComponent::default(),
            specular_exponent: 0.0,
            dissolve: 1.0,
            illumination: None,
        }
    }

    /// Texture file names referenced by any component.
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        [&self.ambient, &self.diffuse, &self.specular]
            .into_iter()
            .filter_map(|component| component.texture.as_deref())
    }
}

/// Material name to material. Later definitions of a name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaterialLibrary {
    materials: BTreeMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material, replacing any with the same name.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// Merge another library into this one. `other` wins on duplicate names.
    pub fn merge(&mut self, other: MaterialLibrary) {
        self.materials.extend(other.materials);
    }
}

impl FromIterator<Material> for MaterialLibrary {
    fn from_iter<I: IntoIterator<Item = Material>>(iter: I) -> Self {
        let mut library = Self::new();
        for material in iter {
            library.insert(material);
        }
        library
    }
}
