//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use student_core::{default_log_level, Gender, Student, StudentId};

const DEFAULT_DB_FILE_NAME: &str = "students.sqlite3";

/// Manage student records stored in a local SQLite database.
#[derive(Debug, Parser)]
#[command(name = "student_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// SQLite database file. Defaults to `students.sqlite3` in the temp dir.
    #[arg(long = "db", env = "STUDENT_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "STUDENT_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "STUDENT_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn resolved_log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all students
    List,
    /// Create a student
    Add(StudentPayload),
    /// Show one student
    Get { id: StudentId },
    /// Replace one student's name, email and gender
    Update {
        id: StudentId,
        #[command(flatten)]
        payload: StudentPayload,
    },
    /// Delete one student
    Delete { id: StudentId },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add(_) => "add",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

#[derive(Debug, Args)]
pub struct StudentPayload {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, value_enum)]
    pub gender: GenderArg,
}

impl StudentPayload {
    pub fn into_student(self) -> Student {
        Student::new(self.name, self.email, self.gender.into())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
            GenderArg::Other => Self::Other,
        }
    }
}
