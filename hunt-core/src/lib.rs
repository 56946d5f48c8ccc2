pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use config::{get_config_path, Config, ConfigError, Overrides};
pub use db::{
    copy_records, create_backend, BackendType, CopyReport, DatabaseConfig, MemoryStore,
    RecordStore, SqliteStore, StoreError, StoreStats, YamlStore,
};
pub use export::{ExportFormat, Snapshot};
pub use models::{Requirement, User, DEFAULT_PROJECT_ID, DEFAULT_STATUS};
pub use service::{RecordService, ServiceError};
pub use storage::{RecordFile, Storage};
