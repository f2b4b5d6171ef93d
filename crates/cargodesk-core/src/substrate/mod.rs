//! Persistence substrate
//!
//! A durable string-keyed blob store standing in for the browser's
//! persistent storage. Values are whole JSON blobs; a write replaces the
//! entire value for a key. There is no cross-key atomicity.
//!
//! The substrate is an injected dependency of [`crate::store::Store`], so
//! independent store instances (for example in tests) never share state.
//!
//! Two implementations:
//! - [`FileSubstrate`]: one file per key with atomic writes
//! - [`MemorySubstrate`]: in-memory, for tests and ephemeral use

pub mod error;
pub mod file;
pub mod memory;

pub use error::{SubstrateError, SubstrateResult};
pub use file::FileSubstrate;
pub use memory::MemorySubstrate;

/// Durable string-keyed storage.
///
/// An absent key is not an error; it signals "uninitialized" and drives
/// lazy seeding in the collection store.
pub trait Substrate {
    /// Read the blob stored under `key`, or `None` if the key has never
    /// been written (or was removed).
    fn read(&self, key: &str) -> SubstrateResult<Option<String>>;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, value: &str) -> SubstrateResult<()>;

    /// Remove `key` entirely. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> SubstrateResult<()>;
}
