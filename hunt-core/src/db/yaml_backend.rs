//! YAML file record store backend
//!
//! This backend keeps all records in a single YAML file, using [`Storage`]
//! for file locking. Inserts re-check uniqueness while the exclusive lock is
//! held, so two processes racing on the same name cannot both succeed.

use std::path::Path;

use crate::models::{names_match, Requirement, User};
use crate::storage::Storage;

use super::error::StoreError;
use super::traits::{BackendType, RecordStore};

/// YAML file backend implementation
pub struct YamlStore {
    storage: Storage,
}

impl YamlStore {
    /// Creates a new YAML backend for the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage: Storage::new(path),
        }
    }
}

impl RecordStore for YamlStore {
    fn backend_type(&self) -> BackendType {
        BackendType::Yaml
    }

    fn add_user(&self, user: &User) -> Result<User, StoreError> {
        self.storage.update_atomically(|records| {
            if records
                .users
                .iter()
                .any(|u| names_match(&u.username, &user.username))
            {
                return Err(StoreError::Constraint(format!(
                    "username '{}' already stored",
                    user.username
                )));
            }

            let stored = User {
                id: records.next_user_id,
                ..user.clone()
            };
            records.next_user_id += 1;
            records.users.push(stored.clone());
            Ok(stored)
        })
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.storage.load()?.users)
    }

    fn add_requirement(&self, requirement: &Requirement) -> Result<Requirement, StoreError> {
        self.storage.update_atomically(|records| {
            if records.requirements.iter().any(|r| {
                r.project_id == requirement.project_id
                    && names_match(&r.title, &requirement.title)
            }) {
                return Err(StoreError::Constraint(format!(
                    "title '{}' already stored for project {}",
                    requirement.title, requirement.project_id
                )));
            }

            let stored = Requirement {
                id: records.next_requirement_id,
                ..requirement.clone()
            };
            records.next_requirement_id += 1;
            records.requirements.push(stored.clone());
            Ok(stored)
        })
    }

    fn list_requirements(&self) -> Result<Vec<Requirement>, StoreError> {
        Ok(self.storage.load()?.requirements)
    }
}
