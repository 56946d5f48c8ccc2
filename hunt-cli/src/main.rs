mod cli;
mod menu;
mod output;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use hunt_core::{
    copy_records, create_backend, get_config_path, Config, DatabaseConfig, ExportFormat,
    Overrides, RecordService, Requirement, ServiceError, Snapshot, User,
};

use crate::cli::{Cli, Command, ConfigCommand};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match (&cli.command, cli.config.as_deref()) {
        // `config init` may be pointed at a file that does not exist yet
        (Some(Command::Config(ConfigCommand::Init { .. })), Some(path)) if !path.exists() => {
            Config::default()
        }
        (_, explicit) => Config::load_or_default(explicit)?,
    };
    config.apply(
        &Overrides {
            db_path: cli.db.clone(),
            backend: cli.backend,
        }
        .with_env(),
    );

    match cli.command.unwrap_or(Command::Menu) {
        // Config commands work without opening the database
        Command::Config(config_cmd) => {
            handle_config_command(&config_cmd, &config, cli.config.as_deref())?;
        }
        Command::Menu => menu::run(&open_service(&config)?)?,
        Command::AddUser { username, role } => {
            let service = open_service(&config)?;
            return Ok(finish(
                service.add_user(User::new(username, role)),
                |user| format!("User successfully added: {} (id {})", user.username, user.id),
            ));
        }
        Command::ListUsers => match open_service(&config)?.list_users() {
            Ok(users) => output::print_users(&users),
            Err(err) => return Ok(fail(&err)),
        },
        Command::AddRequirement {
            title,
            description,
            status,
        } => {
            let service = open_service(&config)?;
            let requirement = Requirement::new(title, description).with_status(status);
            return Ok(finish(service.add_requirement(requirement), |req| {
                format!(
                    "Requirement successfully added: {} (id {}, status {})",
                    req.title, req.id, req.status
                )
            }));
        }
        Command::ListRequirements => match open_service(&config)?.list_requirements() {
            Ok(requirements) => output::print_requirements(&requirements),
            Err(err) => return Ok(fail(&err)),
        },
        Command::Export { format, output } => {
            handle_export_command(&open_service(&config)?, format, output.as_deref())?;
        }
        Command::Stats => match open_service(&config)?.stats() {
            Ok(stats) => output::print_stats(&stats),
            Err(err) => return Ok(fail(&err)),
        },
        Command::Migrate { to, to_backend } => {
            let target_config = DatabaseConfig {
                path: to,
                backend: to_backend,
                wal_mode: config.database.wal_mode,
            };
            handle_migrate_command(&open_service(&config)?, &target_config)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Opens the configured store and wraps it in the validation service
fn open_service(config: &Config) -> Result<RecordService> {
    let store = create_backend(&config.database).with_context(|| {
        format!(
            "Failed to open {} database at {:?}",
            config.database.backend_type(),
            config.database.path
        )
    })?;
    log::debug!(
        "Using {} database at {:?}",
        store.backend_type(),
        config.database.path
    );
    Ok(RecordService::new(store))
}

fn init_logging(verbose: bool) {
    // Every outcome is already reported on the console, so logging is opt-in
    let default_filter = if verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Reports the outcome of an add and picks the exit code
fn finish<T>(result: Result<T, ServiceError>, describe: impl FnOnce(&T) -> String) -> ExitCode {
    match result {
        Ok(value) => {
            println!("{}", describe(&value).green());
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

fn fail(err: &ServiceError) -> ExitCode {
    output::print_failure(err);
    ExitCode::FAILURE
}

fn handle_export_command(
    service: &RecordService,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let snapshot = Snapshot::capture(service)?;

    match output {
        Some(path) => {
            snapshot.write_to(format, path)?;
            println!(
                "{} {} users and {} requirements to {:?}",
                "Exported".green(),
                snapshot.users.len(),
                snapshot.requirements.len(),
                path
            );
        }
        None => print!("{}", snapshot.render(format)?),
    }

    Ok(())
}

fn handle_migrate_command(service: &RecordService, target: &DatabaseConfig) -> Result<()> {
    let target_store = create_backend(target)
        .with_context(|| format!("Failed to open target database at {:?}", target.path))?;

    let report = copy_records(service.store(), target_store.as_ref())
        .context("Migration stopped")?;

    println!(
        "{} {} users and {} requirements into {} database {:?}",
        "Copied".green(),
        report.users,
        report.requirements,
        target.backend_type(),
        target.path
    );
    Ok(())
}

fn handle_config_command(
    cmd: &ConfigCommand,
    config: &Config,
    explicit_path: Option<&Path>,
) -> Result<()> {
    let config_path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => get_config_path()?,
    };

    match cmd {
        ConfigCommand::Show => {
            print!("{}", config.to_yaml()?);
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {:?}; use --force to overwrite",
                    config_path
                );
            }
            config.save(&config_path)?;
            println!("{} {:?}", "Wrote config to".green(), config_path);
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunt_core::BackendType;
    use tempfile::TempDir;

    #[test]
    fn test_config_commands_leave_database_alone() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("records.db");
        let config_path = dir.path().join("config.yaml");
        let config = Config {
            database: DatabaseConfig::new(&db_path),
        };

        handle_config_command(&ConfigCommand::Init { force: false }, &config, Some(&config_path))
            .unwrap();
        handle_config_command(&ConfigCommand::Show, &config, Some(&config_path)).unwrap();

        assert_eq!(Config::load(&config_path).unwrap(), config);
        assert!(!db_path.exists());

        // A second init without --force refuses to overwrite
        assert!(handle_config_command(
            &ConfigCommand::Init { force: false },
            &config,
            Some(&config_path)
        )
        .is_err());
    }

    #[test]
    fn test_open_service_uses_configured_backend() {
        let mut config = Config::default();
        config.database.backend = Some(BackendType::Memory);

        let service = open_service(&config).unwrap();
        assert_eq!(service.store().backend_type(), BackendType::Memory);
        service.add_user(User::new("Alice", 1)).unwrap();
        assert_eq!(service.list_users().unwrap().len(), 1);
    }
}
