//! # Regular Tetrahedron
//!
//! Four equilateral faces sharing a single edge length.
//!
//! - Volume: `a³·√2 / 12`
//! - Surface area: `√3·a²`

use std::cmp::Ordering;
use std::rc::Rc;

use crate::errors::GeomResult;
use crate::materials::Material;

use super::{describe, validate_dimension, Shape, ShapeBase, ShapeKind, ShapeParameters};

/// Regular tetrahedron.
#[derive(Debug, Clone)]
pub struct Tetrahedron {
    edge: f64,
    base: ShapeBase,
}

impl Tetrahedron {
    pub fn new(edge: f64) -> GeomResult<Self> {
        Ok(Tetrahedron {
            edge: validate_dimension("edge", edge)?,
            base: ShapeBase::default(),
        })
    }

    /// Attach a material (builder style)
    pub fn with_material(mut self, material: impl Into<Rc<Material>>) -> Self {
        self.set_material(material.into());
        self
    }

    pub fn edge(&self) -> f64 {
        self.edge
    }

    /// Volume ordering, decided on the edge.
    ///
    /// Volume is strictly increasing in the edge, and the edge stays finite
    /// where the computed volume overflows to infinity.
    pub fn compare_volume(&self, other: &Tetrahedron) -> Ordering {
        self.edge.total_cmp(&other.edge)
    }
}

impl Shape for Tetrahedron {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Tetrahedron
    }

    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn compute_volume(&self) -> f64 {
        self.edge.powi(3) * std::f64::consts::SQRT_2 / 12.0
    }

    fn compute_surface_area(&self) -> f64 {
        3f64.sqrt() * self.edge.powi(2)
    }

    fn parameters(&self) -> ShapeParameters {
        ShapeParameters::from([("edge".to_string(), self.edge)])
    }
}

impl PartialEq for Tetrahedron {
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge
    }
}

/// Tetrahedra order by volume.
impl PartialOrd for Tetrahedron {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_volume(other))
    }
}

impl std::fmt::Display for Tetrahedron {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        describe(self, f)
    }
}
