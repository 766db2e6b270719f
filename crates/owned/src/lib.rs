//! Locally persisted collection of caught Pokemon.
//!
//! The collection is index-addressed by the UI and written back to storage
//! in full after every mutation. Two mutations carry extra rules:
//!
//! - **Release** draws a value from a fixed candidate set and only proceeds
//!   if an independent primality check accepts it
//! - **Rename** suffixes the new nickname with the Fibonacci number of the
//!   item's previous rename count

pub mod error;
pub mod rules;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{StorageError, StoreError};
pub use storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};
pub use store::{OWNED_ITEMS_KEY, OwnedStore, StoreEvent};
pub use types::OwnedItem;
