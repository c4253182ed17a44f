//! # Sphere
//!
//! - Volume: `(4/3)·π·r³`
//! - Surface area: `4·π·r²`

use std::f64::consts::PI;
use std::rc::Rc;

use crate::errors::{GeomError, GeomResult};
use crate::materials::Material;

use super::{describe, validate_dimension, Shape, ShapeBase, ShapeKind, ShapeParameters};

#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f64,
    base: ShapeBase,
}

impl Sphere {
    pub fn new(radius: f64) -> GeomResult<Self> {
        Ok(Sphere {
            radius: validate_dimension("radius", radius)?,
            base: ShapeBase::default(),
        })
    }

    /// Attach a material (builder style)
    pub fn with_material(mut self, material: impl Into<Rc<Material>>) -> Self {
        self.set_material(material.into());
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// New sphere with the radius multiplied by `factor`.
    ///
    /// The material (if any) is shared with the original. The factor must be
    /// finite, and the resulting radius must be positive.
    pub fn scaled(&self, factor: f64) -> GeomResult<Sphere> {
        if !factor.is_finite() {
            return Err(GeomError::invalid_input(
                "factor",
                factor.to_string(),
                "Scale factor must be a finite number",
            ));
        }
        let radius = validate_dimension("radius", self.radius * factor)?;
        Ok(Sphere {
            radius,
            base: ShapeBase::new(self.material().cloned()),
        })
    }
}

impl Shape for Sphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn compute_volume(&self) -> f64 {
        (4.0 / 3.0) * PI * self.radius.powi(3)
    }

    fn compute_surface_area(&self) -> f64 {
        4.0 * PI * self.radius.powi(2)
    }

    fn parameters(&self) -> ShapeParameters {
        ShapeParameters::from([("radius".to_string(), self.radius)])
    }
}

impl PartialEq for Sphere {
    fn eq(&self, other: &Self) -> bool {
        self.radius == other.radius
    }
}

impl std::fmt::Display for Sphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        describe(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_creation() {
        assert_eq!(Sphere::new(3.5).unwrap().radius(), 3.5);
    }

    #[test]
    fn test_volume_and_surface_area() {
        let s = Sphere::new(3.0).unwrap();
        assert!((s.volume() - (4.0 / 3.0) * PI * 27.0).abs() < 1e-10);
        assert!((s.surface_area() - 4.0 * PI * 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_large_radius() {
        let s = Sphere::new(1000.0).unwrap();
        assert_relative_eq!(s.volume(), (4.0 / 3.0) * PI * 1e9, epsilon = 1e-5);
    }

    #[test]
    fn test_surface_area_is_cached() {
        let s = Sphere::new(5.0).unwrap();
        let first = s.surface_area();
        assert!(s.is_surface_area_cached());
        assert!(!s.is_volume_cached());
        assert_eq!(s.surface_area().to_bits(), first.to_bits());
    }

    #[test]
    fn test_mass_with_copper() {
        let s = Sphere::new(1.0).unwrap().with_material(Material::copper());
        assert!((s.mass().unwrap() - (4.0 / 3.0) * PI * 8960.0).abs() < 1e-10);
    }

    #[test]
    fn test_mass_without_material() {
        let err = Sphere::new(1.0).unwrap().mass().unwrap_err();
        assert_eq!(err, GeomError::material_not_set("Sphere"));
    }

    #[test]
    fn test_scaled_keeps_material() {
        let copper = Rc::new(Material::copper());
        let s = Sphere::new(2.0).unwrap().with_material(Rc::clone(&copper));
        let bigger = s.scaled(1.5).unwrap();
        assert_eq!(bigger.radius(), 3.0);
        assert!(Rc::ptr_eq(bigger.material().unwrap(), &copper));
        assert_eq!(s.radius(), 2.0);
    }

    #[test]
    fn test_scaled_rejects_bad_factor() {
        let s = Sphere::new(2.0).unwrap();
        assert!(s.scaled(f64::NAN).is_err());
        assert!(s.scaled(f64::INFINITY).is_err());
        assert!(s.scaled(0.0).is_err());
        assert!(s.scaled(-1.0).is_err());
    }

    #[test]
    fn test_summary() {
        let summary = Sphere::new(2.5).unwrap().with_material(Material::copper()).summary();
        assert_eq!(summary.shape_type, ShapeKind::Sphere);
        assert_eq!(summary.material.as_deref(), Some("Copper"));
        assert!(summary.volume > 0.0);
        assert!(summary.surface_area > 0.0);
        assert!(summary.mass.unwrap() > 0.0);
    }

    #[test]
    fn test_equality() {
        assert_eq!(Sphere::new(4.0).unwrap(), Sphere::new(4.0).unwrap());
        assert_ne!(Sphere::new(4.0).unwrap(), Sphere::new(2.0).unwrap());
    }
}
