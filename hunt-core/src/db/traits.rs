//! Record store traits
//!
//! This module defines the contract every storage backend must satisfy.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Requirement, User};

use super::error::StoreError;

/// Types of record store backends available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// SQLite database file
    Sqlite,
    /// YAML file storage (single file)
    Yaml,
    /// Process-local storage, lost on exit
    Memory,
}

impl BackendType {
    /// Infers the backend from a file extension, defaulting to SQLite
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => BackendType::Yaml,
            _ => BackendType::Sqlite,
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::Sqlite => write!(f, "SQLite"),
            BackendType::Yaml => write!(f, "YAML"),
            BackendType::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" | "db" => Ok(BackendType::Sqlite),
            "yaml" | "yml" => Ok(BackendType::Yaml),
            "memory" | "mem" => Ok(BackendType::Memory),
            other => Err(format!("Unknown backend: {}", other)),
        }
    }
}

/// Configuration for record store backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file
    pub path: PathBuf,
    /// Backend type; inferred from the path when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendType>,
    /// Whether to enable write-ahead logging (SQLite only)
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

fn default_wal_mode() -> bool {
    true
}

impl DatabaseConfig {
    /// Creates a config for `path` with the backend inferred from its extension
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backend: None,
            wal_mode: true,
        }
    }

    /// The backend that will actually be opened
    pub fn backend_type(&self) -> BackendType {
        self.backend
            .unwrap_or_else(|| BackendType::from_path(&self.path))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|dir| dir.join("treasure-hunt").join("records.db"))
            .unwrap_or_else(|| PathBuf::from("records.db"));
        Self::new(path)
    }
}

/// Core trait for record stores
///
/// Stores persist rows as given and hand back what they hold. Business rules
/// (blank fields, uniqueness) belong to [`crate::service::RecordService`];
/// a store only assigns ids.
pub trait RecordStore: Send + Sync {
    /// Returns the backend type
    fn backend_type(&self) -> BackendType;

    // =========================================================================
    // Users
    // =========================================================================

    /// Inserts a user and returns it with its assigned id
    fn add_user(&self, user: &User) -> Result<User, StoreError>;

    /// Lists all users in insertion order
    fn list_users(&self) -> Result<Vec<User>, StoreError>;

    // =========================================================================
    // Requirements
    // =========================================================================

    /// Inserts a requirement and returns it with its assigned id
    fn add_requirement(&self, requirement: &Requirement) -> Result<Requirement, StoreError>;

    /// Lists all requirements in insertion order
    fn list_requirements(&self) -> Result<Vec<Requirement>, StoreError>;

    // =========================================================================
    // Utility Operations
    // =========================================================================

    /// Returns statistics about the store
    fn stats(&self) -> Result<StoreStats, StoreError> {
        Ok(StoreStats {
            user_count: self.list_users()?.len(),
            requirement_count: self.list_requirements()?.len(),
            backend_type: self.backend_type(),
        })
    }
}

/// Statistics about a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub user_count: usize,
    pub requirement_count: usize,
    pub backend_type: BackendType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_path() {
        assert_eq!(BackendType::from_path(Path::new("a.yaml")), BackendType::Yaml);
        assert_eq!(BackendType::from_path(Path::new("a.yml")), BackendType::Yaml);
        assert_eq!(BackendType::from_path(Path::new("a.db")), BackendType::Sqlite);
        assert_eq!(BackendType::from_path(Path::new("records")), BackendType::Sqlite);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("SQLite".parse::<BackendType>(), Ok(BackendType::Sqlite));
        assert_eq!("yml".parse::<BackendType>(), Ok(BackendType::Yaml));
        assert_eq!("memory".parse::<BackendType>(), Ok(BackendType::Memory));
        assert!("mysql".parse::<BackendType>().is_err());
    }

    #[test]
    fn test_explicit_backend_wins() {
        let mut config = DatabaseConfig::new("records.yaml");
        assert_eq!(config.backend_type(), BackendType::Yaml);

        config.backend = Some(BackendType::Memory);
        assert_eq!(config.backend_type(), BackendType::Memory);
    }
}
