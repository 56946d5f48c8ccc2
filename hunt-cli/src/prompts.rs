use inquire::error::InquireResult;
use inquire::{CustomType, Text};

use hunt_core::{Requirement, User};

/// Prompts the operator for a new user
pub fn prompt_new_user() -> InquireResult<User> {
    let username = Text::new("Username:").prompt()?;

    let role_id = CustomType::<i64>::new("Role ID:")
        .with_help_message("1 for manager, 2 for staff")
        .with_error_message("Please enter a whole number")
        .prompt()?;

    Ok(User::new(username, role_id))
}

/// Prompts the operator for a new requirement
pub fn prompt_new_requirement() -> InquireResult<Requirement> {
    let title = Text::new("Requirement title:").prompt()?;
    let description = Text::new("Requirement description:").prompt()?;

    Ok(Requirement::new(title, description))
}
