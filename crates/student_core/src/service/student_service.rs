//! Student use-case service.
//!
//! # Responsibility
//! - Enforce global email uniqueness on create and edit.
//! - Orchestrate list/get/create/edit/delete over a `StudentRepository`.
//!
//! # Invariants
//! - Rejected operations perform zero repository mutations.
//! - Edit excludes the record under edit from the uniqueness check.
//! - Edit always persists under the target id, whatever id the payload
//!   carries.
//! - Delete checks existence itself; edit relies on the caller's lookup and
//!   on the store refusing to overwrite a missing id.
//!
//! The pre-checks and the following write are not atomic. A concurrent
//! writer can slip in between; the store's UNIQUE index catches that case
//! and it is reported with the same error as the pre-check.

use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for student use-cases.
#[derive(Debug)]
pub enum StudentServiceError {
    /// Create rejected: some student already holds this email.
    EmailTaken(String),
    /// Edit rejected: a different student already holds this email.
    EmailConflict(String),
    /// Target student does not exist.
    StudentNotFound(StudentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailTaken(email) => write!(f, "Email {email} taken"),
            Self::EmailConflict(email) => write!(f, "Email {email} conflict"),
            Self::StudentNotFound(id) => write!(f, "Student with id {id} does not exists"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::StudentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Student service facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every student, unmodified.
    pub fn get_all_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.find_all()
    }

    /// Gets one student. `None` is a normal outcome, not an error.
    pub fn get_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.find_by_id(id)
    }

    /// Creates a student after checking that its email is unused.
    ///
    /// Any id carried by `student` is discarded; the store always assigns a
    /// fresh one, so create never overwrites an existing record.
    ///
    /// # Errors
    /// - `EmailTaken` when any student already holds the email, including
    ///   when a concurrent writer wins the race to the store.
    pub fn add_student(&self, student: &Student) -> Result<Student, StudentServiceError> {
        if self.repo.exists_by_email(&student.email)? {
            warn!("event=student_create module=service status=rejected reason=email_taken");
            return Err(StudentServiceError::EmailTaken(student.email.clone()));
        }

        let mut fresh = student.clone();
        if fresh.is_persisted() {
            debug!("event=student_create module=service status=ok payload_id=discarded");
            fresh.id = None;
        }

        let saved = self.repo.save(&fresh).map_err(|err| match err {
            RepoError::DuplicateEmail(email) => {
                warn!(
                    "event=student_create module=service status=rejected reason=email_taken source=store"
                );
                StudentServiceError::EmailTaken(email)
            }
            other => other.into(),
        })?;

        info!(
            "event=student_create module=service status=ok id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Saves an edit of student `id` after checking no other student holds
    /// the new email.
    ///
    /// Does not look up `id` first; callers resolve existence before
    /// editing. An edit aimed at a missing id still fails with
    /// `StudentNotFound`, because the store refuses to overwrite it.
    ///
    /// # Errors
    /// - `EmailConflict` when a different student holds the email.
    /// - `StudentNotFound` when the store has no record `id`.
    pub fn save_edit_student(
        &self,
        student: &Student,
        id: StudentId,
    ) -> Result<Student, StudentServiceError> {
        if self.repo.exists_conflicting_email(&student.email, id)? {
            warn!(
                "event=student_edit module=service status=rejected reason=email_conflict id={id}"
            );
            return Err(StudentServiceError::EmailConflict(student.email.clone()));
        }

        let target = student.clone().with_id(id);
        let saved = self.repo.save(&target).map_err(|err| match err {
            RepoError::DuplicateEmail(email) => {
                warn!(
                    "event=student_edit module=service status=rejected reason=email_conflict source=store id={id}"
                );
                StudentServiceError::EmailConflict(email)
            }
            other => other.into(),
        })?;

        info!("event=student_edit module=service status=ok id={id}");
        Ok(saved)
    }

    /// Deletes student `id`.
    ///
    /// # Errors
    /// - `StudentNotFound` when no student has `id`; nothing is deleted.
    pub fn delete_student(&self, id: StudentId) -> Result<(), StudentServiceError> {
        if !self.repo.exists_by_id(id)? {
            warn!("event=student_delete module=service status=rejected reason=not_found id={id}");
            return Err(StudentServiceError::StudentNotFound(id));
        }

        self.repo.delete_by_id(id)?;
        info!("event=student_delete module=service status=ok id={id}");
        Ok(())
    }
}
