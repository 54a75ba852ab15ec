//! Student request handlers.
//!
//! Each handler maps to one row of the transport contract:
//!
//! | handler  | success | failures                         |
//! |----------|---------|----------------------------------|
//! | `list`   | 200     | 500                              |
//! | `create` | 201     | 400, 409 `Email <e> taken`, 500  |
//! | `get`    | 200     | 404 (empty body), 500            |
//! | `update` | 200     | 400, 404, 409 `Email <e> conflict`, 500 |
//! | `delete` | 204     | 404 `Student with id <id> does not exists`, 500 |

use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::{RepoError, StudentRepository};
use crate::service::student_service::{StudentService, StudentServiceError};
use log::{error, warn};
use serde::Serialize;

/// Status-code equivalents used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    Conflict,
    InternalError,
}

impl ApiStatus {
    /// Returns the HTTP-equivalent numeric code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }

    /// Returns whether this status is a 2xx equivalent.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }
}

/// Response payload. `Empty` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiBody {
    Student(Student),
    Students(Vec<Student>),
    Error { message: String },
    Empty,
}

/// Response envelope returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: ApiStatus,
    pub body: ApiBody,
}

impl ApiResponse {
    fn new(status: ApiStatus, body: ApiBody) -> Self {
        Self { status, body }
    }

    fn empty(status: ApiStatus) -> Self {
        Self::new(status, ApiBody::Empty)
    }

    fn message(status: ApiStatus, message: impl Into<String>) -> Self {
        Self::new(
            status,
            ApiBody::Error {
                message: message.into(),
            },
        )
    }
}

/// Request handlers over one `StudentService`.
pub struct StudentController<R: StudentRepository> {
    service: StudentService<R>,
}

impl<R: StudentRepository> StudentController<R> {
    /// Creates a controller owning `service`.
    pub fn new(service: StudentService<R>) -> Self {
        Self { service }
    }

    /// Returns the wrapped service.
    pub fn service(&self) -> &StudentService<R> {
        &self.service
    }

    /// Lists all students.
    pub fn list(&self) -> ApiResponse {
        match self.service.get_all_students() {
            Ok(students) => ApiResponse::new(ApiStatus::Ok, ApiBody::Students(students)),
            Err(err) => store_fault("list", &err),
        }
    }

    /// Creates a student. Any id carried by the payload is discarded.
    pub fn create(&self, payload: Student) -> ApiResponse {
        let student = payload.normalized();
        if let Err(err) = student.validate() {
            return bad_request("create", &err);
        }

        match self.service.add_student(&student) {
            Ok(saved) => ApiResponse::new(ApiStatus::Created, ApiBody::Student(saved)),
            Err(err) => service_error_response("create", err),
        }
    }

    /// Gets one student by id.
    pub fn get(&self, id: StudentId) -> ApiResponse {
        match self.service.get_student_by_id(id) {
            Ok(Some(student)) => ApiResponse::new(ApiStatus::Ok, ApiBody::Student(student)),
            Ok(None) => ApiResponse::empty(ApiStatus::NotFound),
            Err(err) => store_fault("get", &err),
        }
    }

    /// Replaces student `id` with `payload`.
    ///
    /// Returns 404 without touching the service's edit path when `id` is
    /// unknown.
    pub fn update(&self, id: StudentId, payload: Student) -> ApiResponse {
        let student = payload.normalized();
        if let Err(err) = student.validate() {
            return bad_request("update", &err);
        }

        match self.service.get_student_by_id(id) {
            Ok(Some(_)) => {}
            Ok(None) => return ApiResponse::empty(ApiStatus::NotFound),
            Err(err) => return store_fault("update", &err),
        }

        match self.service.save_edit_student(&student.with_id(id), id) {
            Ok(saved) => ApiResponse::new(ApiStatus::Ok, ApiBody::Student(saved)),
            Err(err) => service_error_response("update", err),
        }
    }

    /// Deletes student `id`.
    pub fn delete(&self, id: StudentId) -> ApiResponse {
        match self.service.delete_student(id) {
            Ok(()) => ApiResponse::empty(ApiStatus::NoContent),
            Err(err) => service_error_response("delete", err),
        }
    }
}

fn service_error_response(operation: &str, err: StudentServiceError) -> ApiResponse {
    match err {
        StudentServiceError::EmailTaken(_) | StudentServiceError::EmailConflict(_) => {
            ApiResponse::message(ApiStatus::Conflict, err.to_string())
        }
        StudentServiceError::StudentNotFound(_) => {
            ApiResponse::message(ApiStatus::NotFound, err.to_string())
        }
        StudentServiceError::Repo(RepoError::Validation(validation)) => {
            bad_request(operation, &validation)
        }
        StudentServiceError::Repo(repo_err) => store_fault(operation, &repo_err),
    }
}

fn bad_request(operation: &str, err: &impl std::fmt::Display) -> ApiResponse {
    warn!("event=api_request module=api status=rejected op={operation} reason=invalid_payload");
    ApiResponse::message(ApiStatus::BadRequest, err.to_string())
}

fn store_fault(operation: &str, err: &RepoError) -> ApiResponse {
    error!("event=api_request module=api status=error op={operation} error={err}");
    ApiResponse::message(ApiStatus::InternalError, err.to_string())
}
