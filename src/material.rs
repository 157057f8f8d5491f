use indexmap::IndexMap;
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::UnknownMaterialError;

/// A named record of scalar material properties.
///
/// The core only requires the `name` field, which appears in block
/// diagnostics; property keys and meanings belong to the property subsystem
/// that populates the record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Material {
    name: String,
    properties: IndexMap<String, f64>,
}

impl Material {
    /// Creates a material with the given name and no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Adds a scalar property, returning the updated material.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: f64) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Returns the material's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the named property, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).copied()
    }
}

/// Resolves material names to [`Material`] records.
///
/// Implemented by whatever owns the property data; the core only performs the
/// one lookup at block construction.
pub trait MaterialLibrary {
    /// Returns the material registered under `name`, if any.
    fn get(&self, name: &str) -> Option<&Material>;

    /// Resolves `name`, reporting an unknown name as an error.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownMaterialError`] if no material is registered under
    /// `name`.
    fn resolve(&self, name: &str) -> Result<&Material, UnknownMaterialError> {
        self.get(name)
            .ok_or_else(|| UnknownMaterialError(name.to_string()))
    }
}

/// An in-memory [`MaterialLibrary`] keyed by material name.
#[derive(Debug, Clone, Default)]
pub struct MaterialSet {
    materials: IndexMap<String, Material>,
}

impl MaterialSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material, returning the updated set.
    ///
    /// A material with the same name replaces the previous entry.
    #[must_use]
    pub fn with(mut self, material: Material) -> Self {
        self.insert(material);
        self
    }

    /// Registers a material under its own name.
    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.name().to_string(), material);
    }
}

impl MaterialLibrary for MaterialSet {
    fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_material() {
        let materials = MaterialSet::new().with(
            Material::new("water")
                .with_property("rho", 997.047)
                .with_property("cp", 4184.0),
        );

        let water = materials.resolve("water").unwrap();
        assert_eq!(water.name(), "water");
        assert_eq!(water.property("rho"), Some(997.047));
        assert_eq!(water.property("k"), None);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let materials = MaterialSet::new();

        assert_eq!(
            materials.resolve("unobtainium"),
            Err(UnknownMaterialError("unobtainium".to_string()))
        );
    }
}
