//! # Record Store
//!
//! Persistent log of past shape calculations plus a reference table of named
//! materials.
//!
//! ## Structure
//!
//! ```text
//! StoreDocument (JSON file)
//! ├── version: schema version
//! ├── calculations: Vec<CalculationRecord>  (append-only, auto-increment id)
//! └── materials: Vec<MaterialRow>           (unique name, seeded with built-ins)
//! ```
//!
//! Every operation locks the store, loads the document, applies one change
//! and writes it back atomically (temp file + rename). See [`store`] for the
//! operations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use geom_core::materials::Material;
//! use geom_core::records::RecordStore;
//! use geom_core::shapes::Sphere;
//!
//! let store = RecordStore::open("geometry_calculations.json")?;
//! let ball = Sphere::new(0.5)?.with_material(Material::copper());
//! store.save_shape(&ball)?;
//!
//! for record in store.list_all()? {
//!     println!("{} {} kg", record.shape_type, record.mass);
//! }
//! # Ok::<(), geom_core::errors::GeomError>(())
//! ```

mod lock;
pub mod store;

pub use store::RecordStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// Current schema version of the store document
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One stored calculation. Immutable once written.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "shape_type": "Parallelepiped",
///   "volume": 24.0,
///   "surface_area": 52.0,
///   "mass": 188400.0,
///   "material": "Steel",
///   "parameters": "{\"height\":4.0,\"length\":2.0,\"width\":3.0}",
///   "created_at": "2026-10-19T08:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: u64,
    pub shape_type: String,
    pub volume: f64,
    pub surface_area: f64,
    pub mass: f64,
    pub material: String,
    /// Input dimensions serialized as JSON text
    pub parameters: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the materials reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub id: u64,
    pub name: String,
    /// kg/m³
    pub density: f64,
}

/// Aggregate counts over the calculations log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_calculations: usize,
    /// Distinct shape-type labels
    pub unique_shapes: usize,
    /// Distinct material names
    pub unique_materials: usize,
    /// Most recent `created_at`, `None` when the log is empty
    pub last_calculation: Option<DateTime<Utc>>,
}

/// On-disk layout of the store.
///
/// Missing tables deserialize as empty so an older or hand-written file is
/// completed on initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    pub version: String,
    #[serde(default = "first_id")]
    pub next_calculation_id: u64,
    #[serde(default = "first_id")]
    pub next_material_id: u64,
    #[serde(default)]
    pub calculations: Vec<CalculationRecord>,
    #[serde(default)]
    pub materials: Vec<MaterialRow>,
}

fn first_id() -> u64 {
    1
}

impl StoreDocument {
    pub fn new() -> Self {
        StoreDocument {
            version: SCHEMA_VERSION.to_string(),
            next_calculation_id: first_id(),
            next_material_id: first_id(),
            calculations: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Insert a material unless one with the same name exists.
    ///
    /// Returns `true` if a row was added.
    pub fn insert_material_or_ignore(&mut self, name: &str, density: f64) -> bool {
        if self.has_material(name) {
            return false;
        }
        let id = self.allocate_material_id();
        self.materials.push(MaterialRow {
            id,
            name: name.to_string(),
            density,
        });
        true
    }

    pub fn has_material(&self, name: &str) -> bool {
        self.materials.iter().any(|m| m.name == name)
    }

    pub fn allocate_calculation_id(&mut self) -> u64 {
        // Never hand out an id already present, even if the counter was lost
        let floor = self.calculations.iter().map(|c| c.id + 1).max().unwrap_or(1);
        let id = self.next_calculation_id.max(floor);
        self.next_calculation_id = id + 1;
        id
    }

    fn allocate_material_id(&mut self) -> u64 {
        let floor = self.materials.iter().map(|m| m.id + 1).max().unwrap_or(1);
        let id = self.next_material_id.max(floor);
        self.next_material_id = id + 1;
        id
    }
}
