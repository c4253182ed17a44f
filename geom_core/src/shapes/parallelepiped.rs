//! # Parallelepiped
//!
//! Rectangular box defined by length, width and height.
//!
//! - Volume: `l·w·h`
//! - Surface area: `2(lw + lh + wh)`

use std::ops::Add;
use std::rc::Rc;

use crate::errors::GeomResult;
use crate::materials::Material;

use super::{describe, validate_dimension, Shape, ShapeBase, ShapeKind, ShapeParameters};

/// Rectangular box.
#[derive(Debug, Clone)]
pub struct Parallelepiped {
    length: f64,
    width: f64,
    height: f64,
    base: ShapeBase,
}

impl Parallelepiped {
    /// Create a box with no material attached.
    ///
    /// All three dimensions must be positive and finite.
    pub fn new(length: f64, width: f64, height: f64) -> GeomResult<Self> {
        Ok(Parallelepiped {
            length: validate_dimension("length", length)?,
            width: validate_dimension("width", width)?,
            height: validate_dimension("height", height)?,
            base: ShapeBase::default(),
        })
    }

    /// Attach a material (builder style)
    pub fn with_material(mut self, material: impl Into<Rc<Material>>) -> Self {
        self.set_material(material.into());
        self
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sum of this box's volume and `other`'s.
    pub fn combined_volume(&self, other: &Parallelepiped) -> f64 {
        self.volume() + other.volume()
    }
}

impl Shape for Parallelepiped {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Parallelepiped
    }

    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn compute_volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    fn compute_surface_area(&self) -> f64 {
        2.0 * (self.length * self.width + self.length * self.height + self.width * self.height)
    }

    fn parameters(&self) -> ShapeParameters {
        ShapeParameters::from([
            ("length".to_string(), self.length),
            ("width".to_string(), self.width),
            ("height".to_string(), self.height),
        ])
    }
}

/// Boxes are equal when all three dimensions match exactly.
impl PartialEq for Parallelepiped {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.width == other.width && self.height == other.height
    }
}

/// `&a + &b` sums the two volumes.
impl Add<&Parallelepiped> for &Parallelepiped {
    type Output = f64;

    fn add(self, other: &Parallelepiped) -> f64 {
        self.combined_volume(other)
    }
}

impl std::fmt::Display for Parallelepiped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        describe(self, f)
    }
}
