//! Record store abstraction layer
//!
//! This module provides a trait-based abstraction for storage backends,
//! allowing the record keeper to use different stores (SQLite, YAML files,
//! memory) behind one interface.

mod error;
mod memory_backend;
mod migration;
mod sqlite_backend;
mod traits;
mod yaml_backend;

pub use error::StoreError;
pub use memory_backend::MemoryStore;
pub use migration::{copy_records, CopyReport};
pub use sqlite_backend::SqliteStore;
pub use traits::{BackendType, DatabaseConfig, RecordStore, StoreStats};
pub use yaml_backend::YamlStore;

/// Opens the store described by `config`, creating the file if needed
pub fn create_backend(config: &DatabaseConfig) -> Result<Box<dyn RecordStore>, StoreError> {
    let backend_type = config.backend_type();
    log::debug!("Opening {} record store at {:?}", backend_type, config.path);

    match backend_type {
        BackendType::Sqlite => Ok(Box::new(SqliteStore::new(&config.path, config.wal_mode)?)),
        BackendType::Yaml => Ok(Box::new(YamlStore::new(&config.path))),
        BackendType::Memory => Ok(Box::new(MemoryStore::new())),
    }
}
