//! Validation layer between operator input and the record store
//!
//! [`RecordService`] is the only place the business rules live: required
//! names must not be blank, usernames are unique ignoring case, and
//! requirement titles are unique ignoring case within a project.
//!
//! Uniqueness is checked by reading the current rows and then inserting.
//! The pair is not atomic, so two writers racing on one name can both pass
//! the check; the SQLite and YAML stores reject the loser with
//! [`StoreError::Constraint`].

use thiserror::Error;

use crate::db::{RecordStore, StoreError, StoreStats};
use crate::models::{is_blank, names_match, Requirement, User};

/// Why the service refused or failed an operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required field was empty or whitespace; the store was not touched
    #[error("{0}")]
    Validation(String),

    /// The name is already taken
    #[error("{0}")]
    Duplicate(String),

    /// The store failed
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// True for rejections caused by the input rather than the store
    pub fn is_rejection(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::Duplicate(_))
    }
}

/// Enforces record rules before delegating to the injected store
pub struct RecordService {
    store: Box<dyn RecordStore>,
}

impl RecordService {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Gets a reference to the underlying store
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Adds `candidate` unless its username is blank or already taken
    pub fn add_user(&self, candidate: User) -> Result<User, ServiceError> {
        if is_blank(&candidate.username) {
            return Err(reject(ServiceError::Validation(
                "Username cannot be empty or whitespace.".to_string(),
            )));
        }

        let existing = self.guard(self.store.list_users())?;
        if existing
            .iter()
            .any(|u| names_match(&u.username, &candidate.username))
        {
            return Err(reject(ServiceError::Duplicate(
                "Username already exists.".to_string(),
            )));
        }

        let stored = self.guard(self.store.add_user(&candidate))?;
        log::info!("Added user '{}' (id {})", stored.username, stored.id);
        Ok(stored)
    }

    /// Lists users as the store holds them
    pub fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.guard(self.store.list_users())
    }

    /// Adds `candidate` unless its title is blank or already used in its project
    pub fn add_requirement(&self, candidate: Requirement) -> Result<Requirement, ServiceError> {
        if is_blank(&candidate.title) {
            return Err(reject(ServiceError::Validation(
                "Title cannot be empty or whitespace.".to_string(),
            )));
        }

        let existing = self.guard(self.store.list_requirements())?;
        if existing.iter().any(|r| {
            r.project_id == candidate.project_id && names_match(&r.title, &candidate.title)
        }) {
            return Err(reject(ServiceError::Duplicate(
                "Requirement with the same title already exists.".to_string(),
            )));
        }

        let stored = self.guard(self.store.add_requirement(&candidate))?;
        log::info!("Added requirement '{}' (id {})", stored.title, stored.id);
        Ok(stored)
    }

    /// Lists requirements as the store holds them
    pub fn list_requirements(&self) -> Result<Vec<Requirement>, ServiceError> {
        self.guard(self.store.list_requirements())
    }

    /// Counts stored records
    pub fn stats(&self) -> Result<StoreStats, ServiceError> {
        self.guard(self.store.stats())
    }

    /// Logs a store failure and converts it for the caller
    fn guard<T>(&self, result: Result<T, StoreError>) -> Result<T, ServiceError> {
        result.map_err(|err| {
            log::error!("{} store failed: {}", self.store.backend_type(), err);
            ServiceError::Store(err)
        })
    }
}

fn reject(err: ServiceError) -> ServiceError {
    log::warn!("Rejected: {}", err);
    err
}
