use colored::Colorize;

use hunt_core::{Requirement, ServiceError, StoreStats, User};

/// Formats users as a table, header first
pub fn users_table(users: &[User]) -> Vec<String> {
    let mut lines = vec![
        format!("{:<6} | {:<30} | {:<6}", "ID", "Username", "Role"),
        "-".repeat(48),
    ];
    lines.extend(
        users
            .iter()
            .map(|u| format!("{:<6} | {:<30} | {:<6}", u.id, u.username, u.role_id)),
    );
    lines
}

/// Formats requirements as a table, header first
pub fn requirements_table(requirements: &[Requirement]) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<6} | {:<8} | {:<30} | {:<10} | {}",
            "ID", "Project", "Title", "Status", "Description"
        ),
        "-".repeat(90),
    ];
    lines.extend(requirements.iter().map(|r| {
        format!(
            "{:<6} | {:<8} | {:<30} | {:<10} | {}",
            r.id, r.project_id, r.title, r.status, r.description
        )
    }));
    lines
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("{}", "No users found.".yellow());
        return;
    }
    for line in users_table(users) {
        println!("{}", line);
    }
}

pub fn print_requirements(requirements: &[Requirement]) {
    if requirements.is_empty() {
        println!("{}", "No requirements found.".yellow());
        return;
    }
    for line in requirements_table(requirements) {
        println!("{}", line);
    }
}

pub fn print_stats(stats: &StoreStats) {
    println!("Backend:      {}", stats.backend_type);
    println!("Users:        {}", stats.user_count);
    println!("Requirements: {}", stats.requirement_count);
}

/// Prints why an operation failed
pub fn print_failure(err: &ServiceError) {
    if err.is_rejection() {
        println!("{}", err.to_string().red());
    } else {
        println!("{} {}", "An error occurred:".red(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_table() {
        let users = vec![
            User {
                id: 1,
                username: "Alice".into(),
                role_id: 1,
            },
            User {
                id: 2,
                username: "Bob".into(),
                role_id: 2,
            },
        ];

        let lines = users_table(&users);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("Alice"));
        assert!(lines[3].starts_with("2 "));
    }

    #[test]
    fn test_requirements_table() {
        let mut req = Requirement::new("Login", "Users can log in");
        req.id = 7;

        let lines = requirements_table(&[req]);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Login"));
        assert!(lines[2].contains("InActive"));
        assert!(lines[2].ends_with("Users can log in"));
    }
}
