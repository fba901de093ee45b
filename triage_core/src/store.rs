//! Durable capacity store with file locking.
//!
//! The whole registry (hospital pools plus reservations) lives in one JSON
//! document, rewritten atomically (temp file + rename) on every mutation.
//! Mutations run inside `transact`, which holds an exclusive advisory lock
//! on a sidecar lock file for the entire read-modify-write. That lock is the
//! serializable critical section that keeps concurrent bookings from losing
//! updates; plain reads take no lock because the atomic rename means a
//! reader never observes a torn file.

use crate::{Error, ResourcePool, Reservation, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The persisted registry document
///
/// Pools are keyed by name in a BTreeMap so candidate listings come back in
/// a stable order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BedRegistry {
    pub pools: BTreeMap<String, ResourcePool>,
    pub reservations: Vec<Reservation>,
}

impl BedRegistry {
    /// Find a reservation's position by id
    pub fn reservation_index(&self, id: uuid::Uuid) -> Option<usize> {
        self.reservations.iter().position(|r| r.id == id)
    }
}

/// Handle to the on-disk registry
pub struct CapacityStore {
    state_path: PathBuf,
    lock_path: PathBuf,
}

impl CapacityStore {
    /// Open (or create) the store under a data directory
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            state_path: data_dir.join("registry.json"),
            lock_path: data_dir.join("registry.lock"),
        })
    }

    /// Insert the seed pools if the registry has none
    ///
    /// Idempotent; returns whether seeding happened. Existing pools and
    /// reservations are never touched.
    pub fn seed_if_empty(&self, seeds: &[crate::PoolSeed]) -> Result<bool> {
        self.transact(|registry| {
            if !registry.pools.is_empty() {
                return Ok(false);
            }
            for seed in seeds {
                registry.pools.insert(
                    seed.name.to_string(),
                    ResourcePool {
                        name: seed.name.to_string(),
                        condition: seed.condition,
                        available_beds: seed.beds,
                        initial_beds: seed.beds,
                    },
                );
            }
            tracing::info!(pools = seeds.len(), "Seeded hospital registry");
            Ok(true)
        })
    }

    /// Read a snapshot of the registry without locking
    ///
    /// The snapshot may be stale by the time a booking is attempted; the
    /// booking path re-checks under the lock.
    pub fn read(&self) -> Result<BedRegistry> {
        self.load_registry()
    }

    /// Run a closure against the registry inside the exclusive lock
    ///
    /// Loads the current registry, applies `f`, and atomically persists the
    /// result. If `f` returns an error nothing is written. The lock covers
    /// the whole sequence, so concurrent transactions serialize.
    pub fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BedRegistry) -> Result<T>,
    {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)?;
        lock_file.lock_exclusive()?;

        let result = (|| {
            let mut registry = self.load_registry()?;
            let value = f(&mut registry)?;
            self.persist(&registry)?;
            Ok(value)
        })();

        lock_file.unlock()?;
        result
    }

    fn load_registry(&self) -> Result<BedRegistry> {
        if !self.state_path.exists() {
            tracing::debug!("No registry file found, starting empty");
            return Ok(BedRegistry::default());
        }

        let mut contents = String::new();
        let file = File::open(&self.state_path)?;
        let mut reader = std::io::BufReader::new(file);
        reader.read_to_string(&mut contents)?;

        // A corrupt capacity file is a hard error: silently defaulting
        // would re-advertise beds that outstanding reservations hold.
        let registry = serde_json::from_str::<BedRegistry>(&contents).map_err(|e| {
            Error::Store(format!(
                "registry file {:?} is not valid JSON: {}",
                self.state_path, e
            ))
        })?;

        tracing::debug!(
            pools = registry.pools.len(),
            reservations = registry.reservations.len(),
            "Loaded registry"
        );
        Ok(registry)
    }

    /// Atomically replace the registry file
    fn persist(&self, registry: &BedRegistry) -> Result<()> {
        let parent = self.state_path.parent().ok_or_else(|| {
            Error::Store(format!(
                "registry path {:?} has no parent directory",
                self.state_path
            ))
        })?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(registry)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.state_path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Persisted registry to {:?}", self.state_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_directory;

    #[test]
    fn test_seed_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();

        let seeded = store.seed_if_empty(&default_directory(5)).unwrap();
        assert!(seeded);

        let registry = store.read().unwrap();
        assert_eq!(registry.pools.len(), 10);
        assert!(registry.reservations.is_empty());
        assert_eq!(registry.pools["Hospital A"].available_beds, 5);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();

        assert!(store.seed_if_empty(&default_directory(5)).unwrap());

        // Drain a bed, then re-seed; the drained count must survive
        store
            .transact(|registry| {
                registry.pools.get_mut("Hospital A").unwrap().available_beds = 4;
                Ok(())
            })
            .unwrap();

        assert!(!store.seed_if_empty(&default_directory(5)).unwrap());
        let registry = store.read().unwrap();
        assert_eq!(registry.pools["Hospital A"].available_beds, 4);
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();

        let registry = store.read().unwrap();
        assert!(registry.pools.is_empty());
    }

    #[test]
    fn test_corrupt_registry_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();

        std::fs::write(temp_dir.path().join("registry.json"), "{ invalid json }").unwrap();

        let result = store.read();
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_failed_transaction_persists_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();
        store.seed_if_empty(&default_directory(5)).unwrap();

        let result: Result<()> = store.transact(|registry| {
            registry.pools.get_mut("Hospital A").unwrap().available_beds = 0;
            Err(Error::Store("forced failure".into()))
        });
        assert!(result.is_err());

        let registry = store.read().unwrap();
        assert_eq!(registry.pools["Hospital A"].available_beds, 5);
    }

    #[test]
    fn test_persist_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = CapacityStore::open(temp_dir.path()).unwrap();
        store.seed_if_empty(&default_directory(5)).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .filter(|n| n != "registry.json" && n != "registry.lock")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only registry files, found extras: {:?}",
            extras
        );
    }
}
