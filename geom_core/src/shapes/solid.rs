//! # Solid
//!
//! Closed enum over the shape variants, for callers that only learn the
//! variant at runtime (the CLI, stored records). Variant-specific operations
//! return [`GeomError::TypeMismatch`] when an operand has the wrong variant.
//!
//! ```rust
//! use geom_core::shapes::{Parallelepiped, Solid, Sphere};
//!
//! let a = Solid::from(Parallelepiped::new(1.0, 2.0, 3.0).unwrap());
//! let b = Solid::from(Sphere::new(1.0).unwrap());
//!
//! assert_ne!(a, b);
//! assert!(a.combined_volume(&b).is_err());
//! ```

use std::cmp::Ordering;

use crate::errors::{GeomError, GeomResult};

use super::{Parallelepiped, Shape, ShapeBase, ShapeKind, ShapeParameters, Sphere, Tetrahedron};

/// Any supported shape.
///
/// Equality compares variants first, so two different variants are never
/// equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    Parallelepiped(Parallelepiped),
    Tetrahedron(Tetrahedron),
    Sphere(Sphere),
}

impl Solid {
    fn inner(&self) -> &dyn Shape {
        match self {
            Solid::Parallelepiped(p) => p,
            Solid::Tetrahedron(t) => t,
            Solid::Sphere(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Shape {
        match self {
            Solid::Parallelepiped(p) => p,
            Solid::Tetrahedron(t) => t,
            Solid::Sphere(s) => s,
        }
    }

    /// Sum of two boxes' volumes. Both operands must be parallelepipeds.
    pub fn combined_volume(&self, other: &Solid) -> GeomResult<f64> {
        match (self, other) {
            (Solid::Parallelepiped(a), Solid::Parallelepiped(b)) => Ok(a.combined_volume(b)),
            (Solid::Parallelepiped(_), _) => Err(mismatch("combined_volume", ShapeKind::Parallelepiped, other)),
            _ => Err(mismatch("combined_volume", ShapeKind::Parallelepiped, self)),
        }
    }

    /// Volume ordering between two tetrahedra.
    pub fn compare_volume(&self, other: &Solid) -> GeomResult<Ordering> {
        match (self, other) {
            (Solid::Tetrahedron(a), Solid::Tetrahedron(b)) => Ok(a.compare_volume(b)),
            (Solid::Tetrahedron(_), _) => Err(mismatch("compare_volume", ShapeKind::Tetrahedron, other)),
            _ => Err(mismatch("compare_volume", ShapeKind::Tetrahedron, self)),
        }
    }

    /// Scaled copy of a sphere. Other variants do not support scaling.
    pub fn scaled(&self, factor: f64) -> GeomResult<Solid> {
        match self {
            Solid::Sphere(s) => Ok(Solid::Sphere(s.scaled(factor)?)),
            _ => Err(mismatch("scaled", ShapeKind::Sphere, self)),
        }
    }
}

fn mismatch(operation: &str, expected: ShapeKind, found: &Solid) -> GeomError {
    GeomError::type_mismatch(operation, expected.label(), found.kind().label())
}

impl Shape for Solid {
    fn kind(&self) -> ShapeKind {
        self.inner().kind()
    }

    fn base(&self) -> &ShapeBase {
        self.inner().base()
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        self.inner_mut().base_mut()
    }

    fn compute_volume(&self) -> f64 {
        self.inner().compute_volume()
    }

    fn compute_surface_area(&self) -> f64 {
        self.inner().compute_surface_area()
    }

    fn parameters(&self) -> ShapeParameters {
        self.inner().parameters()
    }
}

impl From<Parallelepiped> for Solid {
    fn from(shape: Parallelepiped) -> Self {
        Solid::Parallelepiped(shape)
    }
}

impl From<Tetrahedron> for Solid {
    fn from(shape: Tetrahedron) -> Self {
        Solid::Tetrahedron(shape)
    }
}

impl From<Sphere> for Solid {
    fn from(shape: Sphere) -> Self {
        Solid::Sphere(shape)
    }
}

impl std::fmt::Display for Solid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solid::Parallelepiped(p) => std::fmt::Display::fmt(p, f),
            Solid::Tetrahedron(t) => std::fmt::Display::fmt(t, f),
            Solid::Sphere(s) => std::fmt::Display::fmt(s, f),
        }
    }
}
