//! JSON file store for one whole record collection.
//!
//! # Responsibility
//! - Create the backing file with an empty collection on first open.
//! - Deserialize/serialize the full collection on every read/write.
//!
//! # Invariants
//! - `read_all` and `write_all` never touch a subset of the collection.
//! - Written files are pretty-printed with stable field order.
//!
//! # See also
//! - `crate::repo::pet_repo` for the read-modify-write span.

use super::{StoreError, StoreResult};
use log::{debug, error, info};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const EMPTY_COLLECTION: &[u8] = b"[]";

static PATH_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Whole-collection store backed by a single JSON file.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _record: PhantomData<fn() -> T>,
}

/// Exclusive access to a store's file within this process.
///
/// Dropping the guard releases the file for other handles.
pub struct StoreGuard<'store> {
    _guard: MutexGuard<'store, ()>,
}

impl<T> std::fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Opens the store at `path`, creating it with an empty collection when
    /// the file does not exist yet.
    ///
    /// # Side effects
    /// - May create the backing file. Parent directories are not created.
    /// - Emits `store_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref();
        info!("event=store_open module=store status=start");

        match create_if_missing(path).and_then(|created| {
            let canonical =
                fs::canonicalize(path).map_err(|err| StoreError::io(path, err))?;
            Ok((created, canonical))
        }) {
            Ok((created, canonical)) => {
                info!(
                    "event=store_open module=store status=ok created={} duration_ms={}",
                    created,
                    started_at.elapsed().as_millis()
                );
                let lock = lock_for_path(&canonical);
                Ok(Self {
                    path: canonical,
                    lock,
                    _record: PhantomData,
                })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the canonical path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquires the process-wide lock for this store's file.
    ///
    /// Hold the guard across a read-modify-write span so concurrent callers
    /// cannot interleave between the read and the write.
    pub fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            _guard: self.lock.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Loads the complete collection.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file cannot be read.
    /// - `StoreError::Serde` when the contents are not a valid collection.
    pub fn read_all(&self) -> StoreResult<Vec<T>> {
        let started_at = Instant::now();
        let result = fs::read(&self.path)
            .map_err(|err| StoreError::io(&self.path, err))
            .and_then(|bytes| {
                serde_json::from_slice::<Vec<T>>(&bytes)
                    .map_err(|err| StoreError::serde(&self.path, err))
            });

        match result {
            Ok(records) => {
                debug!(
                    "event=store_read module=store status=ok records={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=store_read module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces the file contents with the given collection.
    ///
    /// A failed write is not retried and may leave the file truncated.
    pub fn write_all(&self, records: &[T]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = serde_json::to_vec_pretty(records)
            .map_err(|err| StoreError::serde(&self.path, err))
            .and_then(|bytes| {
                fs::write(&self.path, bytes).map_err(|err| StoreError::io(&self.path, err))
            });

        match result {
            Ok(()) => {
                debug!(
                    "event=store_write module=store status=ok records={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_write module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn create_if_missing(path: &Path) -> StoreResult<bool> {
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(StoreError::io(path, err)),
    };

    file.write_all(EMPTY_COLLECTION)
        .and_then(|()| file.sync_all())
        .map_err(|err| StoreError::io(path, err))?;
    Ok(true)
}

// Entries whose only owner is the registry belong to dropped stores.
fn lock_for_path(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = PATH_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    locks
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}
