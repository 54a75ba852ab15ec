//! Core domain logic for the student registry.
//! This crate is the single source of truth for the email-uniqueness rule.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::student_api::{ApiBody, ApiResponse, ApiStatus, StudentController};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Gender, Student, StudentId, StudentValidationError};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::student_service::{StudentService, StudentServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
