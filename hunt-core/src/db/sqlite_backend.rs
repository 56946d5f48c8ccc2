//! SQLite record store backend
//!
//! Stores users and requirements in two tables of a SQLite database file.
//! Unique indexes on the name columns reject duplicates that slip past the
//! service's read-then-write check when several processes share a file.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::{Requirement, User};

use super::error::StoreError;
use super::traits::{BackendType, RecordStore};

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite backend implementation
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`
    pub fn new<P: AsRef<Path>>(path: P, wal_mode: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        if wal_mode {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }

        Self::with_connection(path, conn)
    }

    /// Opens a private database that lives only as long as the store
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(PathBuf::from(":memory:"), conn)
    }

    fn with_connection(path: PathBuf, conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            path,
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        log::debug!("Opened SQLite record store at {:?}", store.path);
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock()?;

        // A missing schema_version table means a fresh database
        let current_version: i32 = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        if current_version == 0 {
            conn.execute_batch(include_str!("schema.sql"))?;
        } else if current_version != SCHEMA_VERSION {
            return Err(StoreError::SchemaOutdated {
                found: current_version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn backend_type(&self) -> BackendType {
        BackendType::Sqlite
    }

    fn add_user(&self, user: &User) -> Result<User, StoreError> {
        let conn = self.conn.lock()?;
        conn.execute(
            "INSERT INTO users (username, roleid) VALUES (?1, ?2)",
            params![user.username, user.role_id],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            ..user.clone()
        })
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT id, username, roleid FROM users ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                role_id: row.get(2)?,
            })
        })?;

        let mut users = Vec::new();
        for row_result in rows {
            users.push(row_result?);
        }
        Ok(users)
    }

    fn add_requirement(&self, requirement: &Requirement) -> Result<Requirement, StoreError> {
        let conn = self.conn.lock()?;
        conn.execute(
            "INSERT INTO requirements (projectid, title, description, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                requirement.project_id,
                requirement.title,
                requirement.description,
                requirement.status
            ],
        )?;

        Ok(Requirement {
            id: conn.last_insert_rowid(),
            ..requirement.clone()
        })
    }

    fn list_requirements(&self) -> Result<Vec<Requirement>, StoreError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, projectid, title, description, status
             FROM requirements ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Requirement {
                id: row.get(0)?,
                project_id: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                status: row.get(4)?,
            })
        })?;

        let mut requirements = Vec::new();
        for row_result in rows {
            requirements.push(row_result?);
        }
        Ok(requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sqlite_store_create_and_list_empty() {
        let temp_file = NamedTempFile::with_suffix(".db").unwrap();
        let store = SqliteStore::new(temp_file.path(), true).unwrap();

        assert!(store.list_users().unwrap().is_empty());
        assert!(store.list_requirements().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_store_assigns_ids_in_order() {
        let store = SqliteStore::in_memory().unwrap();

        let alice = store.add_user(&User::new("Alice", 1)).unwrap();
        let bob = store.add_user(&User::new("Bob", 2)).unwrap();
        assert!(alice.id > 0);
        assert!(bob.id > alice.id);

        let users = store.list_users().unwrap();
        assert_eq!(users, vec![alice, bob]);
    }

    #[test]
    fn test_sqlite_store_requirement_round_trip() {
        let store = SqliteStore::in_memory().unwrap();

        let req = Requirement::new("Login", "desc").with_status(Some("Active".into()));
        let stored = store.add_requirement(&req).unwrap();
        assert_eq!(stored.title, "Login");

        let listed = store.list_requirements().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], stored);
        assert_eq!(listed[0].project_id, 1);
        assert_eq!(listed[0].status, "Active");
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let temp_file = NamedTempFile::with_suffix(".db").unwrap();
        {
            let store = SqliteStore::new(temp_file.path(), false).unwrap();
            store.add_user(&User::new("Alice", 1)).unwrap();
            store.add_requirement(&Requirement::new("Login", "")).unwrap();
        }

        let store = SqliteStore::new(temp_file.path(), false).unwrap();
        assert_eq!(store.list_users().unwrap()[0].username, "Alice");
        assert_eq!(store.list_requirements().unwrap()[0].title, "Login");
    }

    #[test]
    fn test_sqlite_store_rejects_case_insensitive_duplicates() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_user(&User::new("Alice", 1)).unwrap();

        let err = store.add_user(&User::new("ALICE", 2)).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        store.add_requirement(&Requirement::new("Login", "")).unwrap();
        let err = store
            .add_requirement(&Requirement::new("login", ""))
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.list_requirements().unwrap().len(), 1);
    }

    #[test]
    fn test_sqlite_store_allows_same_title_in_other_project() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_requirement(&Requirement::new("Login", "")).unwrap();

        let mut other = Requirement::new("Login", "");
        other.project_id = 2;
        store.add_requirement(&other).unwrap();
        assert_eq!(store.list_requirements().unwrap().len(), 2);
    }

    #[test]
    fn test_sqlite_store_refuses_other_schema_versions() {
        let temp_file = NamedTempFile::with_suffix(".db").unwrap();
        drop(SqliteStore::new(temp_file.path(), false).unwrap());

        let conn = Connection::open(temp_file.path()).unwrap();
        conn.execute("UPDATE schema_version SET version = ?1", [SCHEMA_VERSION + 1])
            .unwrap();
        drop(conn);

        let err = SqliteStore::new(temp_file.path(), false).err().unwrap();
        assert!(matches!(
            err,
            StoreError::SchemaOutdated { found, expected }
                if found == SCHEMA_VERSION + 1 && expected == SCHEMA_VERSION
        ));
    }

    #[test]
    fn test_sqlite_store_stats() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_user(&User::new("Alice", 1)).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.user_count, 1);
        assert_eq!(stats.requirement_count, 0);
        assert_eq!(stats.backend_type, BackendType::Sqlite);
    }
}
