//! File-backed storage for the brew and drink collections.
//!
//! The persistent substrate is a data directory with one named slot per
//! collection, each holding the serialized form of that collection's full
//! contents. Every mutation is a read-modify-write of the whole file; the
//! data set is small and write frequency is human-paced.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Substrate slots, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Brews,
    Drinks,
}

impl Slot {
    /// Returns the filename for this slot.
    pub fn filename(&self) -> &'static str {
        match self {
            Slot::Brews => "brews.json",
            Slot::Drinks => "drinks.json",
        }
    }
}

/// The data directory holding one file per slot.
///
/// An absent file means an empty collection, not an error.
#[derive(Debug, Clone)]
pub struct StoreDir {
    data_dir: PathBuf,
}

impl StoreDir {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a slot.
    pub fn path(&self, slot: Slot) -> PathBuf {
        self.data_dir.join(slot.filename())
    }

    pub fn exists(&self, slot: Slot) -> bool {
        self.path(slot).exists()
    }

    /// Reads the serialized contents of a slot.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn read(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        let path = self.path(slot);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    /// Writes the serialized contents of a slot, creating the data
    /// directory if needed.
    pub fn write(&self, slot: Slot, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.path(slot);
        fs::write(&path, contents).map_err(|e| StoreError::Io(path, e))?;
        Ok(())
    }
}

/// A record that can live in a [`RecordStore`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Substrate slot this record type persists to.
    const SLOT: Slot;

    /// Partial-update type; `apply` merges it over the record, leaving
    /// the id untouched.
    type Patch;

    fn id(&self) -> i64;

    fn apply(&mut self, patch: &Self::Patch);
}

/// CRUD over one collection.
///
/// Reads degrade: a missing, unreadable or corrupt file yields an empty
/// collection with a logged diagnostic. The store is a cache of user
/// input, not a system of record, so losing a corrupt file to the next
/// write is acceptable.
pub struct RecordStore<T> {
    dir: StoreDir,
    _record: PhantomData<T>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(dir: StoreDir) -> Self {
        Self {
            dir,
            _record: PhantomData,
        }
    }

    /// Returns all records in stored (insertion) order.
    pub fn list(&self) -> Vec<T> {
        let path = self.dir.path(T::SLOT);
        match self.dir.read(T::SLOT) {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        "Discarding unparsable collection {}: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Appends a record. The caller supplies the id; the store does not
    /// generate identity.
    pub fn create(&self, record: &T) -> Result<(), StoreError> {
        let mut records = self.list();
        records.push(record.clone());
        self.persist(&records)
    }

    /// Merges `patch` over the record with matching id.
    ///
    /// Returns `Ok(false)` without touching the substrate when no record
    /// matches; updating a since-deleted record is not an error.
    pub fn update(&self, id: i64, patch: &T::Patch) -> Result<bool, StoreError> {
        let mut records = self.list();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.apply(patch);
                self.persist(&records)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the record with matching id, if present.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut records = self.list();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records)?;
        Ok(true)
    }

    /// Fully overwrites the collection. Used only by the import gate.
    pub fn replace_all(&self, records: &[T]) -> Result<(), StoreError> {
        self.persist(records)
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        let contents = serde_json::to_string(records)
            .map_err(|e| StoreError::Serialize(self.dir.path(T::SLOT), e))?;
        self.dir.write(T::SLOT, &contents)
    }
}

/// Errors writing to the persistent substrate.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a collection file.
    Io(PathBuf, io::Error),
    /// Error serializing a collection for persistence.
    Serialize(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            StoreError::Serialize(path, e) => {
                write!(f, "Failed to serialize collection for {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Serialize(_, e) => Some(e),
        }
    }
}
