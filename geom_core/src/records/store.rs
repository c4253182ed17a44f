//! Record store operations.
//!
//! ## Write path
//!
//! 1. Acquire the store lock (fs2 lock on `<file>.lock`)
//! 2. Load the document (or start a fresh one)
//! 3. Apply a single change
//! 4. Write to `<file>.tmp`, fsync, rename over the store file
//!
//! Readers skip the lock: the rename is atomic, so a reader always sees a
//! complete document.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::Settings;
use crate::errors::{GeomError, GeomResult};
use crate::materials;
use crate::shapes::{Shape, ShapeParameters, ShapeSummary};

use super::lock::{sidecar_path, StoreLock};
use super::{CalculationRecord, MaterialRow, StoreDocument, StoreStatistics, SCHEMA_VERSION};

/// Handle to a record store file.
///
/// The handle holds no open file; each operation opens, works and closes.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    user_id: String,
}

impl RecordStore {
    /// Open (and initialize) the store at `path`, locking as the default user.
    pub fn open(path: impl Into<PathBuf>) -> GeomResult<Self> {
        Self::open_as(path, Settings::default().user_id)
    }

    /// Open (and initialize) the store at `path`, locking as `user_id`.
    pub fn open_as(path: impl Into<PathBuf>, user_id: impl Into<String>) -> GeomResult<Self> {
        let store = RecordStore {
            path: path.into(),
            user_id: user_id.into(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open the store named by `settings`.
    pub fn from_settings(settings: &Settings) -> GeomResult<Self> {
        Self::open_as(settings.store_path.clone(), settings.user_id.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure both tables exist and the built-in materials are seeded.
    ///
    /// Idempotent: existing rows are never touched and duplicate material
    /// names are ignored. A store that already has every built-in is only
    /// read, never locked or rewritten.
    pub fn initialize(&self) -> GeomResult<()> {
        if self.path.exists() {
            let doc = self.load()?;
            if materials::builtin().iter().all(|m| doc.has_material(m.name())) {
                tracing::debug!(path = %self.path.display(), "record store already initialized");
                return Ok(());
            }
        }

        self.modify(|doc| {
            let mut seeded = 0;
            for material in materials::builtin() {
                if doc.insert_material_or_ignore(material.name(), material.density()) {
                    seeded += 1;
                }
            }
            tracing::info!(
                path = %self.path.display(),
                seeded,
                calculations = doc.calculations.len(),
                "record store initialized"
            );
            Ok(())
        })
    }

    /// Append one calculation.
    ///
    /// `mass` and `material` are required; a summary of a shape without a
    /// material fails with [`GeomError::MissingField`] and nothing is written.
    pub fn save(&self, summary: &ShapeSummary, parameters: &ShapeParameters) -> GeomResult<CalculationRecord> {
        let mass = summary.mass.ok_or_else(|| GeomError::missing_field("mass"))?;
        let material = summary
            .material
            .clone()
            .ok_or_else(|| GeomError::missing_field("material"))?;
        let parameters = serde_json::to_string(parameters).map_err(GeomError::serialization)?;

        self.modify(|doc| {
            let record = CalculationRecord {
                id: doc.allocate_calculation_id(),
                shape_type: summary.shape_type.label().to_string(),
                volume: summary.volume,
                surface_area: summary.surface_area,
                mass,
                material,
                parameters,
                created_at: Utc::now(),
            };
            doc.calculations.push(record.clone());
            tracing::info!(id = record.id, shape = %record.shape_type, "calculation saved");
            Ok(record)
        })
    }

    /// Save `shape.summary()` together with its parameters.
    pub fn save_shape(&self, shape: &dyn Shape) -> GeomResult<CalculationRecord> {
        self.save(&shape.summary(), &shape.parameters())
    }

    /// All calculations, newest first (ties broken by descending id).
    pub fn list_all(&self) -> GeomResult<Vec<CalculationRecord>> {
        let mut calculations = self.load()?.calculations;
        calculations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(calculations)
    }

    pub fn statistics(&self) -> GeomResult<StoreStatistics> {
        let doc = self.load()?;
        let shapes: HashSet<&str> = doc.calculations.iter().map(|c| c.shape_type.as_str()).collect();
        let materials: HashSet<&str> = doc.calculations.iter().map(|c| c.material.as_str()).collect();

        Ok(StoreStatistics {
            total_calculations: doc.calculations.len(),
            unique_shapes: shapes.len(),
            unique_materials: materials.len(),
            last_calculation: doc.calculations.iter().map(|c| c.created_at).max(),
        })
    }

    /// Rows of the materials reference table, in id order.
    pub fn materials(&self) -> GeomResult<Vec<MaterialRow>> {
        let mut rows = self.load()?.materials;
        rows.sort_by_key(|m| m.id);
        Ok(rows)
    }

    /// Look up a reference material by exact name.
    pub fn find_material(&self, name: &str) -> GeomResult<MaterialRow> {
        self.load()?
            .materials
            .into_iter()
            .find(|m| m.name == name)
            .ok_or_else(|| GeomError::material_not_found(name))
    }

    /// Lock, load, apply `change`, write back. Nothing is written if `change` fails.
    fn modify<T>(&self, change: impl FnOnce(&mut StoreDocument) -> GeomResult<T>) -> GeomResult<T> {
        let lock = StoreLock::acquire(&self.path, self.user_id.clone())?;
        tracing::trace!(pid = lock.holder().pid, "record store locked");
        let mut doc = if self.path.exists() {
            self.load()?
        } else {
            tracing::debug!(path = %self.path.display(), "creating new record store");
            StoreDocument::new()
        };
        let result = change(&mut doc)?;
        self.write(&doc)?;
        Ok(result)
    }

    fn load(&self) -> GeomResult<StoreDocument> {
        let shown = self.path.display();
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| GeomError::file_error("read", shown.to_string(), e.to_string()))?;
        let doc: StoreDocument = serde_json::from_str(&contents)
            .map_err(|e| GeomError::serialization(format!("Invalid JSON in {shown}: {e}")))?;

        check_schema(&doc.version)?;
        tracing::debug!(
            path = %shown,
            calculations = doc.calculations.len(),
            materials = doc.materials.len(),
            "record store loaded"
        );
        Ok(doc)
    }

    /// Replace the store file via `<file>.tmp` so readers never see a partial document.
    fn write(&self, doc: &StoreDocument) -> GeomResult<()> {
        let json = serde_json::to_vec_pretty(doc).map_err(GeomError::serialization)?;
        let tmp_path = sidecar_path(&self.path, "tmp");
        let fail = |action: &str, e: std::io::Error| {
            let _ = fs::remove_file(&tmp_path);
            GeomError::file_error(action, self.path.display().to_string(), e.to_string())
        };

        let mut tmp_file = File::create(&tmp_path).map_err(|e| fail("create temp file", e))?;
        tmp_file.write_all(&json).map_err(|e| fail("write temp file", e))?;
        tmp_file.sync_all().map_err(|e| fail("sync temp file", e))?;
        drop(tmp_file);
        fs::rename(&tmp_path, &self.path).map_err(|e| fail("replace", e))
    }
}

/// Accept documents whose `major.minor` schema is not newer than ours.
///
/// Patch versions never change the layout; a newer minor may add fields
/// this build would drop on rewrite.
fn check_schema(file_version: &str) -> GeomResult<()> {
    fn major_minor(version: &str) -> Option<(u32, u32)> {
        let mut parts = version.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().unwrap_or("0").parse().ok()?;
        Some((major, minor))
    }

    let supported = major_minor(SCHEMA_VERSION);
    match (major_minor(file_version), supported) {
        (Some((major, minor)), Some((our_major, our_minor))) if major == our_major && minor <= our_minor => Ok(()),
        _ => Err(GeomError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Material;
    use crate::shapes::{Parallelepiped, Sphere, Tetrahedron};
    use tempfile::{tempdir, TempDir};

    fn temp_store() -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let store = RecordStore::open_as(dir.path().join("geometry.json"), "tester").unwrap();
        (dir, store)
    }

    #[test]
    fn test_initialize_seeds_materials() {
        let (_dir, store) = temp_store();
        let names: Vec<_> = store.materials().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Steel", "Aluminum", "Copper"]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let reopened = RecordStore::open_as(store.path(), "tester").unwrap();
        assert_eq!(reopened.materials().unwrap().len(), 3);
        assert!(reopened.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_list_returns_record_first() {
        let (_dir, store) = temp_store();
        store
            .save_shape(&Sphere::new(1.0).unwrap().with_material(Material::copper()))
            .unwrap();

        let block = Parallelepiped::new(2.0, 3.0, 4.0).unwrap().with_material(Material::steel());
        let saved = store.save_shape(&block).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], saved);
        assert_eq!(all[0].shape_type, "Parallelepiped");
        assert_eq!(all[0].volume, 24.0);
        assert_eq!(all[0].surface_area, 52.0);
        assert_eq!(all[0].mass, 188_400.0);
        assert_eq!(all[0].material, "Steel");
        assert_eq!(all[0].parameters, r#"{"height":4.0,"length":2.0,"width":3.0}"#);
        assert_eq!(all[1].shape_type, "Sphere");
    }

    #[test]
    fn test_ids_increase() {
        let (_dir, store) = temp_store();
        let shape = Tetrahedron::new(1.0).unwrap().with_material(Material::aluminum());
        let first = store.save_shape(&shape).unwrap();
        let second = store.save_shape(&shape).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_save_without_material_fails() {
        let (_dir, store) = temp_store();
        let err = store.save_shape(&Sphere::new(1.0).unwrap()).unwrap_err();
        assert_eq!(err, GeomError::missing_field("mass"));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_statistics() {
        let (_dir, store) = temp_store();
        let empty = store.statistics().unwrap();
        assert_eq!(empty.total_calculations, 0);
        assert_eq!(empty.unique_shapes, 0);
        assert_eq!(empty.last_calculation, None);

        store
            .save_shape(&Sphere::new(1.0).unwrap().with_material(Material::copper()))
            .unwrap();
        store
            .save_shape(&Sphere::new(2.0).unwrap().with_material(Material::steel()))
            .unwrap();
        let last = store
            .save_shape(&Tetrahedron::new(1.0).unwrap().with_material(Material::steel()))
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_calculations, 3);
        assert_eq!(stats.unique_shapes, 2);
        assert_eq!(stats.unique_materials, 2);
        assert_eq!(stats.last_calculation, Some(last.created_at));
    }

    #[test]
    fn test_find_material() {
        let (_dir, store) = temp_store();
        let row = store.find_material("Aluminum").unwrap();
        assert_eq!(row.density, 2700.0);
        assert!(store.find_material("Gold").is_err());
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let (_dir, store) = temp_store();
        assert!(store.path().exists());
        assert!(!sidecar_path(store.path(), "tmp").exists());
        assert_eq!(fs::read_to_string(sidecar_path(store.path(), "lock")).unwrap(), "");
    }

    #[test]
    fn test_dead_holder_note_does_not_block_store() {
        let (_dir, store) = temp_store();
        let note = format!(
            r#"{{ "user_id": "crashed", "pid": 4000000, "locked_at": "{}" }}"#,
            Utc::now().to_rfc3339()
        );
        fs::write(sidecar_path(store.path(), "lock"), note).unwrap();

        let reopened = RecordStore::open_as(store.path(), "tester").unwrap();
        let record = reopened
            .save_shape(&Sphere::new(1.0).unwrap().with_material(Material::steel()))
            .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(reopened.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_locked_store_reports_holder() {
        let (_dir, store) = temp_store();
        let _held = StoreLock::acquire(store.path(), "alice").unwrap();

        let err = store
            .save_shape(&Sphere::new(1.0).unwrap().with_material(Material::steel()))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, GeomError::FileLocked { ref locked_by, .. } if locked_by.starts_with("alice")));
    }

    #[test]
    fn test_reopen_does_not_rewrite_initialized_store() {
        let (_dir, store) = temp_store();
        let compact = serde_json::to_string(&store.load().unwrap()).unwrap();
        fs::write(store.path(), &compact).unwrap();
        fs::remove_file(sidecar_path(store.path(), "lock")).unwrap();

        let reopened = RecordStore::open_as(store.path(), "tester").unwrap();
        assert_eq!(reopened.materials().unwrap().len(), 3);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), compact);
        assert!(!sidecar_path(store.path(), "lock").exists());
    }

    #[test]
    fn test_rejects_newer_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{ "version": "0.9.0" }"#).unwrap();

        let err = RecordStore::open_as(&path, "tester").unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_completes_partial_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "version": "0.1.0" }"#).unwrap();

        let store = RecordStore::open_as(&path, "tester").unwrap();
        assert_eq!(store.materials().unwrap().len(), 3);
    }

    #[test]
    fn test_schema_check() {
        assert!(check_schema(SCHEMA_VERSION).is_ok());
        assert!(check_schema("0.1.5").is_ok());
        assert!(check_schema("0.0.9").is_ok());
        assert!(check_schema("1.0.0").is_err());
        assert!(check_schema("0.2.0").is_err());
        assert!(check_schema("garbage").is_err());
    }

    #[test]
    fn test_list_on_missing_file_fails() {
        let (_dir, store) = temp_store();
        fs::remove_file(store.path()).unwrap();
        let err = store.list_all().unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
