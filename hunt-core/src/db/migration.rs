//! Copying records between backends
//!
//! Used to move a record set from one store to another, e.g. a YAML file
//! into a SQLite database. Target stores assign fresh ids.

use crate::models::{Requirement, User};

use super::error::StoreError;
use super::traits::RecordStore;

/// What a copy moved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub users: usize,
    pub requirements: usize,
}

/// Copies every user and requirement from `source` into `target`
///
/// Records are inserted in source order. The copy stops at the first store
/// error; records already inserted stay in the target.
pub fn copy_records(
    source: &dyn RecordStore,
    target: &dyn RecordStore,
) -> Result<CopyReport, StoreError> {
    let users = source.list_users()?;
    let requirements = source.list_requirements()?;

    let mut report = CopyReport::default();
    for user in &users {
        target.add_user(&User { id: 0, ..user.clone() })?;
        report.users += 1;
    }
    for requirement in &requirements {
        target.add_requirement(&Requirement {
            id: 0,
            ..requirement.clone()
        })?;
        report.requirements += 1;
    }

    log::info!(
        "Copied {} users and {} requirements from {} to {}",
        report.users,
        report.requirements,
        source.backend_type(),
        target.backend_type()
    );
    Ok(report)
}
