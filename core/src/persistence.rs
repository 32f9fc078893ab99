//! Key-value persistence contract and the collection codec.
//!
//! The whole trip collection lives in a single record under a fixed key. A
//! backend only has to get and set opaque bytes; [`codec`] turns those bytes
//! into trips and back.
//!
//! # Example
//!
//! ```no_run
//! use film_roll_core::persistence::{codec, TripBackend};
//! use film_roll_core::error::StorageError;
//!
//! async fn example<B: TripBackend>(backend: &B) -> Result<(), StorageError> {
//!     let bytes = backend.get("trips").await?;
//!     let trips = codec::decode_record("trips", bytes.as_deref())?;
//!     backend.set("trips", codec::encode(&trips)?).await?;
//!     Ok(())
//! }
//! ```

use crate::error::StorageError;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`TripBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Durable storage for one serialized blob per key.
///
/// # Dyn Compatibility
///
/// Methods return explicit `Pin<Box<dyn Future>>` so the store can hold an
/// `Arc<dyn TripBackend>` and tests can swap implementations freely.
pub trait TripBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get<'a>(&'a self, key: &'a str) -> BackendFuture<'a, Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    ///
    /// Implementations must be atomic from a reader's point of view: a
    /// concurrent `get` sees either the old value or the new one in full.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails. The previous value must
    /// then still be readable.
    fn set<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BackendFuture<'a, ()>;
}

/// Serialization of the trip collection.
pub mod codec {
    use crate::error::StorageError;
    use crate::types::Trip;

    /// Encode a collection as JSON bytes
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] if serialization fails.
    pub fn encode(trips: &[Trip]) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec(trips).map_err(|e| StorageError::Encode(e.to_string()))
    }

    /// Decode JSON bytes into a collection
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if the bytes are not a valid collection.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Vec<Trip>, StorageError> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode an optional record; a missing record is an empty collection
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if a present record cannot be decoded.
    pub fn decode_record(key: &str, bytes: Option<&[u8]>) -> Result<Vec<Trip>, StorageError> {
        bytes.map_or_else(|| Ok(Vec::new()), |b| decode(key, b))
    }
}
