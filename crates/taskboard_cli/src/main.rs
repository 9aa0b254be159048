//! Interactive terminal host for TaskBoard.
//!
//! # Responsibility
//! - Resolve config from env and flags, open storage and logging.
//! - Implement `TaskView` over line-oriented stdin/stdout.
//! - Translate typed commands into `UiEvent` values.

mod terminal;

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_core::{
    init_logging_from_config, launch, open_database, CoreConfig, DbLocation,
    SqliteKeyValueRepository,
};
use terminal::{run_session, TerminalView};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Local task list manager")]
struct Args {
    /// SQLite database file (`:memory:` for a throwaway session).
    #[arg(long)]
    db: Option<String>,

    /// Storage key holding the task collection.
    #[arg(long)]
    key: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("taskboard: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(message) = init_logging_from_config(&config) {
        eprintln!("taskboard: logging disabled: {message}");
    }

    let conn = match open_database(&config.db_location) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("taskboard: failed to open storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let view = TerminalView::new(stdin.lock(), io::stdout());
    let mut controller = launch(
        SqliteKeyValueRepository::new(&conn),
        &config.storage_key,
        view,
    );
    run_session(&mut controller);
    log::info!("event=app_exit module=cli status=ok");
    ExitCode::SUCCESS
}

fn resolve_config(args: Args) -> Result<CoreConfig, String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = args.db {
        config.db_location = DbLocation::parse(&db);
    }
    if let Some(key) = args.key {
        config.storage_key = key.trim().to_string();
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = Some(dir);
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from([
            "taskboard",
            "--db",
            ":memory:",
            "--key",
            "todos",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.db.as_deref(), Some(":memory:"));
        assert_eq!(args.key.as_deref(), Some("todos"));
        assert_eq!(args.log_level.as_deref(), Some("warn"));
        assert!(args.log_dir.is_none());
    }
}
