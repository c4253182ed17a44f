//! # 3D Shapes
//!
//! Every shape implements the [`Shape`] trait. Implementors supply the two
//! closed-form formulas (`compute_volume`, `compute_surface_area`) and the
//! trait provides cached `volume`/`surface_area`, `mass` and `summary` on top.
//!
//! ## Available Shapes
//!
//! - [`Parallelepiped`] - rectangular box (length × width × height)
//! - [`Tetrahedron`] - regular tetrahedron (single edge length)
//! - [`Sphere`] - sphere (radius)
//!
//! [`Solid`] wraps all three in a closed enum for code that only knows the
//! variant at runtime.
//!
//! ## Caching
//!
//! Volume and surface area are computed on first read and stored in a
//! single-threaded `OnceCell`. Dimensions are immutable, so the cached value
//! never goes stale. Mass is not cached because the material can change.
//!
//! ## Example
//!
//! ```rust
//! use geom_core::materials::Material;
//! use geom_core::shapes::{Parallelepiped, Shape};
//!
//! let block = Parallelepiped::new(2.0, 3.0, 4.0)
//!     .unwrap()
//!     .with_material(Material::steel());
//!
//! assert_eq!(block.volume(), 24.0);
//! assert_eq!(block.surface_area(), 52.0);
//! assert_eq!(block.mass().unwrap(), 24.0 * 7850.0);
//!
//! let summary = block.summary();
//! assert_eq!(summary.material.as_deref(), Some("Steel"));
//! ```

pub mod parallelepiped;
pub mod solid;
pub mod sphere;
pub mod tetrahedron;

pub use parallelepiped::Parallelepiped;
pub use solid::Solid;
pub use sphere::Sphere;
pub use tetrahedron::Tetrahedron;

use std::collections::BTreeMap;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::errors::{GeomError, GeomResult};
use crate::materials::Material;

/// Decimal places kept by [`Shape::summary`]
pub const SUMMARY_DECIMALS: i32 = 4;

/// Defining dimensions of a shape, keyed by name (e.g. `"radius"`).
pub type ShapeParameters = BTreeMap<String, f64>;

/// Shape variant label.
///
/// Serializes as the bare variant name, which is also the label stored in
/// the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Parallelepiped,
    Tetrahedron,
    Sphere,
}

impl ShapeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Parallelepiped => "Parallelepiped",
            ShapeKind::Tetrahedron => "Tetrahedron",
            ShapeKind::Sphere => "Sphere",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// State shared by every shape: the attached material and the lazy caches.
#[derive(Debug, Clone, Default)]
pub struct ShapeBase {
    material: Option<Rc<Material>>,
    volume: OnceCell<f64>,
    surface_area: OnceCell<f64>,
}

impl ShapeBase {
    pub fn new(material: Option<Rc<Material>>) -> Self {
        ShapeBase {
            material,
            volume: OnceCell::new(),
            surface_area: OnceCell::new(),
        }
    }
}

/// Flat, serializable view of a shape's derived values.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "Parallelepiped",
///   "volume": 24.0,
///   "surface_area": 52.0,
///   "mass": 188400.0,
///   "material": "Steel"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSummary {
    #[serde(rename = "type")]
    pub shape_type: ShapeKind,
    pub volume: f64,
    pub surface_area: f64,
    /// `None` when no material is attached
    pub mass: Option<f64>,
    /// Material name, `None` when no material is attached
    pub material: Option<String>,
}

/// Common capability of all 3D shapes.
pub trait Shape {
    fn kind(&self) -> ShapeKind;

    fn base(&self) -> &ShapeBase;

    fn base_mut(&mut self) -> &mut ShapeBase;

    /// Closed-form volume from the defining dimensions (m³)
    fn compute_volume(&self) -> f64;

    /// Closed-form surface area from the defining dimensions (m²)
    fn compute_surface_area(&self) -> f64;

    /// Defining dimensions, as persisted by the record store
    fn parameters(&self) -> ShapeParameters;

    /// Volume, computed on first call and cached afterwards.
    fn volume(&self) -> f64 {
        *self.base().volume.get_or_init(|| {
            let volume = self.compute_volume();
            tracing::debug!(shape = self.kind().label(), volume, "volume computed");
            volume
        })
    }

    /// Surface area, computed on first call and cached afterwards.
    fn surface_area(&self) -> f64 {
        *self.base().surface_area.get_or_init(|| {
            let surface_area = self.compute_surface_area();
            tracing::debug!(shape = self.kind().label(), surface_area, "surface area computed");
            surface_area
        })
    }

    fn is_volume_cached(&self) -> bool {
        self.base().volume.get().is_some()
    }

    fn is_surface_area_cached(&self) -> bool {
        self.base().surface_area.get().is_some()
    }

    fn material(&self) -> Option<&Rc<Material>> {
        self.base().material.as_ref()
    }

    fn set_material(&mut self, material: Rc<Material>) {
        self.base_mut().material = Some(material);
    }

    /// Mass in kg: volume × density.
    ///
    /// Fails with [`GeomError::MaterialNotSet`] when no material is attached.
    fn mass(&self) -> GeomResult<f64> {
        let material = self
            .material()
            .ok_or_else(|| GeomError::material_not_set(self.kind().label()))?;
        Ok(self.volume() * material.density())
    }

    /// Rounded snapshot of the derived values.
    fn summary(&self) -> ShapeSummary {
        ShapeSummary {
            shape_type: self.kind(),
            volume: round_to(self.volume(), SUMMARY_DECIMALS),
            surface_area: round_to(self.surface_area(), SUMMARY_DECIMALS),
            mass: self
                .material()
                .map(|m| round_to(self.volume() * m.density(), SUMMARY_DECIMALS)),
            material: self.material().map(|m| m.name().to_string()),
        }
    }
}

/// Round `value` to `decimals` decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Reject non-positive or non-finite dimensions.
pub(crate) fn validate_dimension(field: &str, value: f64) -> GeomResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeomError::invalid_input(
            field,
            value.to_string(),
            "Dimension must be a positive finite number",
        ));
    }
    Ok(value)
}

/// Shared `Display` body: `Name(volume=.., surface_area=..)`.
pub(crate) fn describe(shape: &dyn Shape, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
        f,
        "{}(volume={:.2}, surface_area={:.2})",
        shape.kind().label(),
        shape.volume(),
        shape.surface_area()
    )
}
