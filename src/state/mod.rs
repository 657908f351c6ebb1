//! Persistent search-state synchronization.

pub mod adapter;
pub mod codec;
pub mod memory;
pub mod store;

pub use adapter::{StorageAdapter, UrlAdapter};
pub use memory::{MemoryStorage, MemoryUrl};
pub use store::{MountSource, PersistentStateStore};
