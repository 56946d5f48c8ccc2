//! Export of the stored records
//!
//! Produces a read-only snapshot of every user and requirement, rendered as
//! JSON or YAML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Requirement, User};
use crate::service::{RecordService, ServiceError};

/// Output formats for export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("Invalid export format: {}", other)),
        }
    }
}

/// Everything the store holds at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub requirements: Vec<Requirement>,
}

impl Snapshot {
    /// Reads every record through the service
    pub fn capture(service: &RecordService) -> Result<Self, ServiceError> {
        Ok(Self {
            users: service.list_users()?,
            requirements: service.list_requirements()?,
        })
    }

    /// Renders the snapshot in `format`
    pub fn render(&self, format: ExportFormat) -> anyhow::Result<String> {
        let text = match format {
            ExportFormat::Json => serde_json::to_string_pretty(self)?,
            ExportFormat::Yaml => serde_yaml::to_string(self)?,
        };
        Ok(text)
    }

    /// Writes the rendered snapshot to `path`
    pub fn write_to<P: AsRef<Path>>(&self, format: ExportFormat, path: P) -> anyhow::Result<()> {
        use anyhow::Context;

        let path = path.as_ref();
        let text = self.render(format)?;
        fs::write(path, text).with_context(|| format!("Failed to write export to {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use tempfile::TempDir;

    fn populated_service() -> RecordService {
        let service = RecordService::new(Box::new(MemoryStore::new()));
        service.add_user(User::new("Alice", 1)).unwrap();
        service
            .add_requirement(Requirement::new("Login", "desc"))
            .unwrap();
        service
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("yml".parse::<ExportFormat>(), Ok(ExportFormat::Yaml));
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_json_export() {
        let snapshot = Snapshot::capture(&populated_service()).unwrap();
        let json = snapshot.render(ExportFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["users"][0]["username"], "Alice");
        assert_eq!(value["requirements"][0]["status"], "InActive");
        assert_eq!(value["requirements"][0]["project_id"], 1);
    }

    #[test]
    fn test_yaml_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.yaml");

        let snapshot = Snapshot::capture(&populated_service()).unwrap();
        snapshot.write_to(ExportFormat::Yaml, &path).unwrap();

        let loaded: Snapshot = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, snapshot);
    }
}
