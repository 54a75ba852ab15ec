//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the student service consumes.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Student::validate()` before persistence.
//! - Email uniqueness is also enforced by a UNIQUE index; its violation is
//!   reported as `RepoError::DuplicateEmail`, never as a raw SQLite error.

pub mod student_repo;
