use serde::{Deserialize, Serialize};
use std::fmt;

/// Project every requirement belongs to; the record keeper is single-project
pub const DEFAULT_PROJECT_ID: i64 = 1;

/// Status given to requirements created without one
pub const DEFAULT_STATUS: &str = "InActive";

/// Represents an operator account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Identifier assigned by the store (0 until inserted)
    #[serde(default)]
    pub id: i64,

    /// Login name, unique regardless of case
    pub username: String,

    /// Role of the user (1 = manager, 2 = staff by convention)
    pub role_id: i64,
}

impl User {
    /// Creates a user that has not been stored yet
    pub fn new(username: impl Into<String>, role_id: i64) -> Self {
        Self {
            id: 0,
            username: username.into(),
            role_id,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Represents a single requirement in the project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    /// Identifier assigned by the store (0 until inserted)
    #[serde(default)]
    pub id: i64,

    /// Owning project
    #[serde(default = "default_project_id")]
    pub project_id: i64,

    /// Short title, unique within the project regardless of case
    pub title: String,

    /// Detailed description, may be empty
    #[serde(default)]
    pub description: String,

    /// Free-form status label
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_project_id() -> i64 {
    DEFAULT_PROJECT_ID
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Requirement {
    /// Creates a requirement in the default project with the default status
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            project_id: DEFAULT_PROJECT_ID,
            title: title.into(),
            description: description.into(),
            status: default_status(),
        }
    }

    /// Replaces the status, keeping the default when `status` is `None`
    pub fn with_status(mut self, status: Option<String>) -> Self {
        if let Some(status) = status {
            self.status = status;
        }
        self
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Returns true when `value` is empty or contains only whitespace
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Compares two names ignoring case, folding each character to lowercase
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requirement_defaults() {
        let req = Requirement::new("Login", "desc");
        assert_eq!(req.id, 0);
        assert_eq!(req.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(req.status, "InActive");
        assert_eq!(req.description, "desc");
    }

    #[test]
    fn test_with_status() {
        let req = Requirement::new("Login", "").with_status(Some("Active".into()));
        assert_eq!(req.status, "Active");

        let req = Requirement::new("Login", "").with_status(None);
        assert_eq!(req.status, DEFAULT_STATUS);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(User::new("Alice", 1).to_string(), "Alice");
        assert_eq!(Requirement::new("Login", "desc").to_string(), "Login");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(is_blank("\u{2003}"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_names_match_ignores_case() {
        assert!(names_match("Alice", "alice"));
        assert!(names_match("LOGIN", "login"));
        assert!(names_match("Émile", "émile"));
        assert!(!names_match("Alice", "Alicia"));
        assert!(!names_match(" Alice", "alice"));
    }

    #[test]
    fn test_requirement_yaml_defaults() {
        let req: Requirement = serde_yaml::from_str("title: Login\n").unwrap();
        assert_eq!(req.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(req.status, DEFAULT_STATUS);
        assert!(req.description.is_empty());
    }
}
