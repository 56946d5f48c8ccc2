use anyhow::Result;
use colored::Colorize;
use inquire::{InquireError, Select};
use std::fmt;

use hunt_core::RecordService;

use crate::output;
use crate::prompts;

/// Entries of the interactive menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddUser,
    ListUsers,
    AddRequirement,
    ListRequirements,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::AddUser,
        MenuChoice::ListUsers,
        MenuChoice::AddRequirement,
        MenuChoice::ListRequirements,
        MenuChoice::Exit,
    ];
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::AddUser => write!(f, "Add User"),
            MenuChoice::ListUsers => write!(f, "List Users"),
            MenuChoice::AddRequirement => write!(f, "Add Requirement"),
            MenuChoice::ListRequirements => write!(f, "List Requirements"),
            MenuChoice::Exit => write!(f, "Exit"),
        }
    }
}

/// What the loop should do after a prompt ends
enum Flow {
    Continue,
    Quit,
}

/// Runs the menu until the operator exits
///
/// Every action, successful or not, returns to the menu. Esc abandons the
/// current prompt; Ctrl-C leaves the loop.
pub fn run(service: &RecordService) -> Result<()> {
    loop {
        println!();
        let choice = match Select::new("Menu:", MenuChoice::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(err) => match handle_prompt_error(err)? {
                Flow::Continue => continue,
                Flow::Quit => break,
            },
        };

        let outcome = match choice {
            MenuChoice::AddUser => add_user(service),
            MenuChoice::ListUsers => {
                list_users(service);
                Ok(())
            }
            MenuChoice::AddRequirement => add_requirement(service),
            MenuChoice::ListRequirements => {
                list_requirements(service);
                Ok(())
            }
            MenuChoice::Exit => break,
        };

        if let Err(err) = outcome {
            if let Flow::Quit = handle_prompt_error(err)? {
                break;
            }
        }
    }

    println!("Exiting application...");
    Ok(())
}

fn handle_prompt_error(err: InquireError) -> Result<Flow> {
    match err {
        InquireError::OperationCanceled => {
            println!("{}", "Cancelled.".yellow());
            Ok(Flow::Continue)
        }
        InquireError::OperationInterrupted => Ok(Flow::Quit),
        other => Err(other.into()),
    }
}

fn add_user(service: &RecordService) -> Result<(), InquireError> {
    let user = prompts::prompt_new_user()?;
    match service.add_user(user) {
        Ok(stored) => println!(
            "{} {}",
            "User successfully added:".green(),
            stored.username
        ),
        Err(err) => output::print_failure(&err),
    }
    Ok(())
}

fn list_users(service: &RecordService) {
    match service.list_users() {
        Ok(users) => output::print_users(&users),
        Err(err) => output::print_failure(&err),
    }
}

fn add_requirement(service: &RecordService) -> Result<(), InquireError> {
    let requirement = prompts::prompt_new_requirement()?;
    match service.add_requirement(requirement) {
        Ok(stored) => println!(
            "{} {}",
            "Requirement successfully added:".green(),
            stored.title
        ),
        Err(err) => output::print_failure(&err),
    }
    Ok(())
}

fn list_requirements(service: &RecordService) {
    match service.list_requirements() {
        Ok(requirements) => output::print_requirements(&requirements),
        Err(err) => output::print_failure(&err),
    }
}
