//! Best-record persistence.
//!
//! One record per grid size, stored as a small JSON value
//! (`{"time": 12.3, "moves": 14}`) under the key `memory_best_<N>` of a
//! [`KeyValueStore`]. Two stores are provided:
//!
//! - [`MemoryStore`]: in-process only (tests, `--no-save`)
//! - [`JsonFileStore`]: one JSON file, by default
//!   `<config dir>/tui-memory/records.json`
//!
//! Missing or malformed values are treated as "no record", never as an
//! error.

pub mod best;
pub mod store;

pub use tui_memory_types as types;

pub use best::{record_key, BestRecords, Improvement};
pub use store::{default_records_path, JsonFileStore, KeyValueStore, MemoryStore, StoreError};

/// Either store, chosen at runtime by the binary.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(JsonFileStore),
}

impl KeyValueStore for AnyStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            AnyStore::Memory(s) => s.get(key),
            AnyStore::File(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            AnyStore::Memory(s) => s.set(key, value),
            AnyStore::File(s) => s.set(key, value),
        }
    }
}
