//! Command-line transport for the student registry.
//!
//! # Responsibility
//! - Parse one student operation from argv and configuration from env.
//! - Open the SQLite store, dispatch to `StudentController`, print the
//!   response envelope as JSON.
//!
//! Exit status is 0 for 2xx-equivalent responses, 1 for rejected requests,
//! and 2 when the store or logging cannot be initialized.

mod args;

use args::{Cli, Command};
use clap::Parser;
use log::info;
use serde_json::json;
use std::process::ExitCode;
use student_core::db::open_db;
use student_core::{
    core_version, init_logging, ApiResponse, SqliteStudentRepository, StudentController,
    StudentService,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(response) => {
            println!(
                "{}",
                json!({ "status": response.status.code(), "body": response.body })
            );
            if response.status.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(message) => {
            eprintln!("student_cli: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ApiResponse, String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.resolved_log_level(), log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} op={}",
        core_version(),
        cli.command.name()
    );

    let db_path = cli.resolved_db_path();
    let conn = open_db(&db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", db_path.display()))?;
    let repo = SqliteStudentRepository::try_new(&conn)
        .map_err(|err| format!("student store init failed: {err}"))?;
    let controller = StudentController::new(StudentService::new(repo));

    let response = match cli.command {
        Command::List => controller.list(),
        Command::Add(payload) => controller.create(payload.into_student()),
        Command::Get { id } => controller.get(id),
        Command::Update { id, payload } => controller.update(id, payload.into_student()),
        Command::Delete { id } => controller.delete(id),
    };
    Ok(response)
}
