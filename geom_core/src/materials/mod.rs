//! # Materials
//!
//! A [`Material`] is a named substance with a fixed density, used to derive
//! a shape's mass from its volume. Materials are immutable once built: the
//! fields are private and no setters exist.
//!
//! Shapes hold materials through `Rc<Material>`, so one material can be
//! attached to any number of shapes.
//!
//! ## Example
//!
//! ```rust
//! use geom_core::materials::Material;
//!
//! let steel = Material::steel();
//! assert_eq!(steel.name(), "Steel");
//! assert_eq!(steel.density(), 7850.0);
//!
//! let lead = Material::new("Lead", 11340.0).unwrap();
//! assert_eq!(lead.to_string(), "Lead (density: 11340 kg/m³)");
//! ```

pub mod catalog;

pub use catalog::{builtin, find_builtin};

use serde::{Deserialize, Serialize};

use crate::errors::{GeomError, GeomResult};

/// Density of structural steel (kg/m³)
pub const STEEL_DENSITY: f64 = 7850.0;
/// Density of aluminum (kg/m³)
pub const ALUMINUM_DENSITY: f64 = 2700.0;
/// Density of copper (kg/m³)
pub const COPPER_DENSITY: f64 = 8960.0;

/// Named material with a density in kg/m³.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Steel", "density": 7850.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialFields")]
pub struct Material {
    name: String,
    density: f64,
}

/// Unchecked wire form; deserialization goes through [`Material::new`].
#[derive(Deserialize)]
struct MaterialFields {
    name: String,
    density: f64,
}

impl TryFrom<MaterialFields> for Material {
    type Error = GeomError;

    fn try_from(fields: MaterialFields) -> GeomResult<Self> {
        Material::new(fields.name, fields.density)
    }
}

impl Material {
    /// Create a material.
    ///
    /// Fails with [`GeomError::InvalidInput`] if the density is not a
    /// positive finite number.
    pub fn new(name: impl Into<String>, density: f64) -> GeomResult<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(GeomError::invalid_input(
                "density",
                density.to_string(),
                "Density must be a positive finite number",
            ));
        }
        Ok(Material {
            name: name.into(),
            density,
        })
    }

    /// Structural steel, 7850 kg/m³
    pub fn steel() -> Self {
        Material {
            name: "Steel".to_string(),
            density: STEEL_DENSITY,
        }
    }

    /// Aluminum, 2700 kg/m³
    pub fn aluminum() -> Self {
        Material {
            name: "Aluminum".to_string(),
            density: ALUMINUM_DENSITY,
        }
    }

    /// Copper, 8960 kg/m³
    pub fn copper() -> Self {
        Material {
            name: "Copper".to_string(),
            density: COPPER_DENSITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Density in kg/m³
    pub fn density(&self) -> f64 {
        self.density
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (density: {} kg/m³)", self.name, self.density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_properties() {
        let steel = Material::steel();
        assert_eq!(steel.name(), "Steel");
        assert_eq!(steel.density(), 7850.0);

        let aluminum = Material::aluminum();
        assert_eq!(aluminum.name(), "Aluminum");
        assert_eq!(aluminum.density(), 2700.0);

        let copper = Material::copper();
        assert_eq!(copper.name(), "Copper");
        assert_eq!(copper.density(), 8960.0);
    }

    #[test]
    fn test_display_contains_name_and_density() {
        let text = Material::steel().to_string();
        assert!(text.contains("Steel"));
        assert!(text.contains("7850"));
    }

    #[test]
    fn test_debug_contains_name_and_density() {
        let text = format!("{:?}", Material::aluminum());
        assert!(text.contains("Aluminum"));
        assert!(text.contains("2700"));
    }

    #[test]
    fn test_rejects_non_positive_density() {
        assert!(Material::new("Vacuum", 0.0).is_err());
        assert!(Material::new("Antimatter", -5.0).is_err());
        assert!(Material::new("Broken", f64::NAN).is_err());
        assert!(Material::new("Infinite", f64::INFINITY).is_err());
    }

    #[test]
    fn test_custom_material() {
        let lead = Material::new("Lead", 11340.0).unwrap();
        assert_eq!(lead.name(), "Lead");
        assert_eq!(lead.density(), 11340.0);
    }

    #[test]
    fn test_material_serialization() {
        let json = serde_json::to_string(&Material::copper()).unwrap();
        assert_eq!(json, r#"{"name":"Copper","density":8960.0}"#);
        let parsed: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Material::copper());
    }

    #[test]
    fn test_deserialize_validates_density() {
        let err = serde_json::from_str::<Material>(r#"{"name":"Void","density":-1.0}"#).unwrap_err();
        assert!(err.to_string().contains("Density must be a positive finite number"));
        assert!(serde_json::from_str::<Material>(r#"{"name":"Void","density":0.0}"#).is_err());
    }
}
