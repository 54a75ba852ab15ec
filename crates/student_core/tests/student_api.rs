use serde_json::json;
use student_core::db::open_db_in_memory;
use student_core::{
    ApiBody, ApiResponse, ApiStatus, Gender, RepoError, RepoResult, SqliteStudentRepository,
    Student, StudentController, StudentId, StudentRepository, StudentService,
    StudentValidationError,
};

/// Answers every uniqueness/existence query with "free", then fails writes
/// and listing with the configured error.
struct FaultyRepository {
    fault: fn() -> RepoError,
}

impl StudentRepository for FaultyRepository {
    fn find_all(&self) -> RepoResult<Vec<Student>> {
        Err((self.fault)())
    }

    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        Ok(Some(john().with_id(id)))
    }

    fn exists_by_id(&self, _id: StudentId) -> RepoResult<bool> {
        Err((self.fault)())
    }

    fn save(&self, _student: &Student) -> RepoResult<Student> {
        Err((self.fault)())
    }

    fn delete_by_id(&self, _id: StudentId) -> RepoResult<()> {
        Err((self.fault)())
    }

    fn exists_by_email(&self, _email: &str) -> RepoResult<bool> {
        Ok(false)
    }

    fn exists_conflicting_email(&self, _email: &str, _exclude_id: StudentId) -> RepoResult<bool> {
        Ok(false)
    }
}

fn corrupt_row() -> RepoError {
    RepoError::InvalidData("invalid gender `male` in students.gender".to_string())
}

fn rejected_write() -> RepoError {
    RepoError::Validation(StudentValidationError::BlankName)
}

fn john() -> Student {
    Student::new("John", "john@gmail.com", Gender::Male)
}

fn jane() -> Student {
    Student::new("Jane", "jane@gmail.com", Gender::Female)
}

fn created_id(response: &ApiResponse) -> i64 {
    match &response.body {
        ApiBody::Student(student) => student.id.unwrap(),
        other => panic!("unexpected body: {other:?}"),
    }
}

fn error_message(response: &ApiResponse) -> &str {
    match &response.body {
        ApiBody::Error { message } => message.as_str(),
        other => panic!("unexpected body: {other:?}"),
    }
}

#[test]
fn list_returns_all_students_with_200() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    controller.create(john());
    controller.create(jane());

    let response = controller.list();

    assert_eq!(response.status.code(), 200);
    let value = serde_json::to_value(&response.body).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["name"], "John");
    assert_eq!(value[1]["email"], "jane@gmail.com");
}

#[test]
fn create_returns_201_with_assigned_id_and_ignores_payload_id() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));

    let response = controller.create(john().with_id(500));

    assert_eq!(response.status, ApiStatus::Created);
    let value = serde_json::to_value(&response.body).unwrap();
    assert_eq!(
        value,
        json!({"id": 1, "name": "John", "email": "john@gmail.com", "gender": "MALE"})
    );
}

#[test]
fn create_with_taken_email_returns_409_with_message() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    controller.create(john());

    let response = controller.create(Student::new("Johnny", "john@gmail.com", Gender::Male));

    assert_eq!(response.status.code(), 409);
    assert_eq!(error_message(&response), "Email john@gmail.com taken");
}

#[test]
fn create_with_invalid_payload_returns_400() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));

    let blank_name = controller.create(Student::new(" ", "x@gmail.com", Gender::Other));
    let bad_email = controller.create(Student::new("X", "not-an-email", Gender::Other));

    assert_eq!(blank_name.status, ApiStatus::BadRequest);
    assert_eq!(bad_email.status, ApiStatus::BadRequest);
    assert!(controller.service().get_all_students().unwrap().is_empty());
}

#[test]
fn get_returns_200_or_404_with_empty_body() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    let id = created_id(&controller.create(john()));

    let found = controller.get(id);
    assert_eq!(found.status, ApiStatus::Ok);
    assert_eq!(found.body, ApiBody::Student(john().with_id(id)));

    let missing = controller.get(99);
    assert_eq!(missing.status.code(), 404);
    assert_eq!(missing.body, ApiBody::Empty);
    assert_eq!(serde_json::to_value(&missing.body).unwrap(), json!(null));
}

#[test]
fn update_returns_200_and_uses_path_id() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    let id = created_id(&controller.create(Student::new(
        "JohnDoe",
        "john@gmail.com",
        Gender::Male,
    )));

    let response = controller.update(id, john().with_id(999));

    assert_eq!(response.status, ApiStatus::Ok);
    assert_eq!(response.body, ApiBody::Student(john().with_id(id)));
    assert!(controller.get(999).body == ApiBody::Empty);
}

#[test]
fn update_unknown_id_returns_404_without_saving() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));

    let response = controller.update(1, john());

    assert_eq!(response.status, ApiStatus::NotFound);
    assert_eq!(response.body, ApiBody::Empty);
    assert!(controller.service().get_all_students().unwrap().is_empty());
}

#[test]
fn update_to_other_students_email_returns_409_with_message() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    let john_id = created_id(&controller.create(john()));
    controller.create(jane());

    let response = controller.update(john_id, Student::new("John", "jane@gmail.com", Gender::Male));

    assert_eq!(response.status, ApiStatus::Conflict);
    assert_eq!(error_message(&response), "Email jane@gmail.com conflict");
}

#[test]
fn delete_returns_204_then_404_with_message() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    let id = created_id(&controller.create(john()));

    let deleted = controller.delete(id);
    assert_eq!(deleted.status.code(), 204);
    assert_eq!(deleted.body, ApiBody::Empty);

    let again = controller.delete(id);
    assert_eq!(again.status.code(), 404);
    assert_eq!(
        error_message(&again),
        format!("Student with id {id} does not exists")
    );
}

#[test]
fn payload_deserializes_without_id() {
    let payload: Student = serde_json::from_value(json!({
        "name": "John",
        "email": "john@gmail.com",
        "gender": "MALE"
    }))
    .unwrap();

    assert_eq!(payload, john());
}

#[test]
fn status_success_classification() {
    assert!(ApiStatus::NoContent.is_success());
    assert!(!ApiStatus::Conflict.is_success());
    assert_eq!(ApiStatus::InternalError.code(), 500);
    assert_eq!(ApiStatus::BadRequest.code(), 400);
}

#[test]
fn update_with_invalid_payload_returns_400_without_saving() {
    let conn = open_db_in_memory().unwrap();
    let controller = StudentController::new(StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
    ));
    let id = created_id(&controller.create(john()));

    let blank_name = controller.update(id, Student::new("  ", "john@gmail.com", Gender::Male));
    let bad_email = controller.update(id, Student::new("John", "john-at-gmail", Gender::Male));

    assert_eq!(blank_name.status, ApiStatus::BadRequest);
    assert_eq!(error_message(&blank_name), "name must not be blank");
    assert_eq!(bad_email.status, ApiStatus::BadRequest);
    assert_eq!(controller.get(id).body, ApiBody::Student(john().with_id(id)));
}

#[test]
fn store_faults_return_500_with_fault_text() {
    let controller = StudentController::new(StudentService::new(FaultyRepository {
        fault: corrupt_row,
    }));
    let expected = corrupt_row().to_string();

    let listed = controller.list();
    assert_eq!(listed.status, ApiStatus::InternalError);
    assert_eq!(error_message(&listed), expected);

    let created = controller.create(john());
    assert_eq!(created.status.code(), 500);
    assert_eq!(error_message(&created), expected);

    let updated = controller.update(1, jane());
    assert_eq!(updated.status, ApiStatus::InternalError);

    let deleted = controller.delete(1);
    assert_eq!(deleted.status, ApiStatus::InternalError);
    assert_eq!(error_message(&deleted), expected);
}

#[test]
fn store_validation_rejection_returns_400() {
    let controller = StudentController::new(StudentService::new(FaultyRepository {
        fault: rejected_write,
    }));

    let response = controller.create(john());

    assert_eq!(response.status, ApiStatus::BadRequest);
    assert_eq!(error_message(&response), "name must not be blank");
}
