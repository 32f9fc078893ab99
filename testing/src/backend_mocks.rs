//! In-memory backends for store tests
//!
//! - [`InMemoryBackend`]: `HashMap`-backed storage that counts writes
//! - [`FailingBackend`]: the same storage with switchable read/write failures

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use film_roll_core::{BackendFuture, StorageError, Trip, TripBackend, codec};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory backend for fast, deterministic store tests.
///
/// # Example
///
/// ```
/// use film_roll_testing::mocks::InMemoryBackend;
/// use film_roll_core::TripBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = InMemoryBackend::new();
/// backend.set("trips", b"[]".to_vec()).await?;
///
/// assert_eq!(backend.get("trips").await?, Some(b"[]".to_vec()));
/// assert_eq!(backend.write_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// Create a new empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with an encoded collection, bypassing the write counter
    ///
    /// Stands in for a write made by another process or tab.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] if the trips cannot be serialized.
    pub fn put(&self, key: &str, trips: &[Trip]) -> Result<(), StorageError> {
        let bytes = codec::encode(trips)?;
        self.put_raw(key, bytes);
        Ok(())
    }

    /// Seed `key` with arbitrary bytes, e.g. a corrupt record
    pub fn put_raw(&self, key: &str, bytes: Vec<u8>) {
        self.data.write().unwrap().insert(key.to_string(), bytes);
    }

    /// Raw bytes currently stored under `key`
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Decode the collection stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if the record does not decode.
    pub fn trips(&self, key: &str) -> Result<Vec<Trip>, StorageError> {
        codec::decode_record(key, self.raw(key).as_deref())
    }

    /// Number of successful `set` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Drop every record (for test isolation)
    pub fn clear(&self) {
        self.data.write().unwrap().clear();
    }
}

impl TripBackend for InMemoryBackend {
    fn get<'a>(&'a self, key: &'a str) -> BackendFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.put_raw(key, value);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Backend whose reads and writes can be made to fail on demand.
///
/// While healthy it behaves exactly like [`InMemoryBackend`]. A failed write
/// leaves the stored record untouched.
#[derive(Clone, Debug, Default)]
pub struct FailingBackend {
    inner: InMemoryBackend,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingBackend {
    /// Create a healthy, empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The healthy storage underneath
    #[must_use]
    pub const fn inner(&self) -> &InMemoryBackend {
        &self.inner
    }
}

impl TripBackend for FailingBackend {
    fn get<'a>(&'a self, key: &'a str) -> BackendFuture<'a, Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::pin(async {
                Err(StorageError::Unavailable("injected read failure".to_string()))
            });
        }
        self.inner.get(key)
    }

    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BackendFuture<'a, ()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Box::pin(async {
                Err(StorageError::Io("injected write failure".to_string()))
            });
        }
        self.inner.set(key, value)
    }
}
