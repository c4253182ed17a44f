//! # geom_core - 3D Shape Calculation Engine
//!
//! `geom_core` computes volume, surface area and mass for rectangular
//! boxes, regular tetrahedra and spheres. It keeps a local log of saved
//! calculations and includes a few standalone arithmetic routines.
//!
//! ## Design Philosophy
//!
//! - **Closed-form**: every derived value is a direct formula, cached on first read
//! - **JSON-First**: summaries, records and errors implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use geom_core::materials::Material;
//! use geom_core::shapes::{Shape, Tetrahedron};
//!
//! let tetra = Tetrahedron::new(2.0).unwrap().with_material(Material::aluminum());
//! let json = serde_json::to_string_pretty(&tetra.summary()).unwrap();
//! assert!(json.contains("\"type\": \"Tetrahedron\""));
//! ```
//!
//! ## Modules
//!
//! - [`shapes`] - Shape trait, the three variants and the `Solid` enum
//! - [`materials`] - Material value type and built-in catalog
//! - [`records`] - Record store with atomic saves and locking
//! - [`arithmetic`] - Fast power, fast square, Newton nth root
//! - [`config`] - Runtime settings
//! - [`errors`] - Structured error types

pub mod arithmetic;
pub mod config;
pub mod errors;
pub mod materials;
pub mod records;
pub mod shapes;

// Re-export commonly used types at crate root for convenience
pub use config::Settings;
pub use errors::{GeomError, GeomResult};
pub use materials::Material;
pub use records::{CalculationRecord, RecordStore, StoreStatistics};
pub use shapes::{Parallelepiped, Shape, ShapeKind, ShapeSummary, Solid, Sphere, Tetrahedron};
