//! In-memory record store
//!
//! Keeps records in process memory. It stores whatever it is handed, with
//! no uniqueness checks of its own, which makes it the reference fake for
//! exercising the service's rules.

use std::sync::Mutex;

use crate::models::{Requirement, User};
use crate::storage::RecordFile;

use super::error::StoreError;
use super::traits::{BackendType, RecordStore};

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<RecordFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }

    fn add_user(&self, user: &User) -> Result<User, StoreError> {
        let mut records = self.records.lock()?;
        let stored = User {
            id: records.next_user_id,
            ..user.clone()
        };
        records.next_user_id += 1;
        records.users.push(stored.clone());
        Ok(stored)
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.records.lock()?.users.clone())
    }

    fn add_requirement(&self, requirement: &Requirement) -> Result<Requirement, StoreError> {
        let mut records = self.records.lock()?;
        let stored = Requirement {
            id: records.next_requirement_id,
            ..requirement.clone()
        };
        records.next_requirement_id += 1;
        records.requirements.push(stored.clone());
        Ok(stored)
    }

    fn list_requirements(&self) -> Result<Vec<Requirement>, StoreError> {
        Ok(self.records.lock()?.requirements.clone())
    }
}
