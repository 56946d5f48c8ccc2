use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hunt_core::{BackendType, ExportFormat};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Treasure Hunt record keeper for users and requirements")]
pub struct Cli {
    /// Path to the database file (.db for SQLite, .yaml for YAML)
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend (sqlite, yaml, memory); inferred from --db when omitted
    #[clap(long, global = true)]
    pub backend: Option<BackendType>,

    /// Path to the config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug logging to stderr
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing config file
        #[clap(long)]
        force: bool,
    },

    /// Print the path to the config file
    Path,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu (the default)
    Menu,

    /// Add a new user
    AddUser {
        /// Login name, unique regardless of case
        #[clap(long)]
        username: String,

        /// Role ID (1 for manager, 2 for staff)
        #[clap(long)]
        role: i64,
    },

    /// List all users
    ListUsers,

    /// Add a new requirement
    AddRequirement {
        /// Title of the requirement
        #[clap(long)]
        title: String,

        /// Description of the requirement
        #[clap(long, default_value = "")]
        description: String,

        /// Status of the requirement (defaults to InActive)
        #[clap(long)]
        status: Option<String>,
    },

    /// List all requirements
    ListRequirements,

    /// Export all records
    Export {
        /// Output format (json, yaml)
        #[clap(long, short = 'f', default_value = "json")]
        format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show record counts
    Stats,

    /// Copy every record into another database
    Migrate {
        /// Destination database file
        #[clap(long)]
        to: PathBuf,

        /// Destination backend; inferred from --to when omitted
        #[clap(long)]
        to_backend: Option<BackendType>,
    },

    /// Configuration commands
    #[clap(subcommand)]
    Config(ConfigCommand),
}
