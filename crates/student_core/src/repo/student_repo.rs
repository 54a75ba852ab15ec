//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus existence/uniqueness queries over `students`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save` inserts when `id` is absent and overwrites when present; it
//!   never inserts a row under a caller-chosen id.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::student::{Gender, Student, StudentId, StudentValidationError};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT id, name, email, gender FROM students";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "email", "gender", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    NotFound(StudentId),
    /// Store-level UNIQUE violation on `students.email`.
    DuplicateEmail(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateEmail(email) => write!(f, "email already stored: {email}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract consumed by `StudentService`.
pub trait StudentRepository {
    /// Returns every student ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Student>>;
    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn exists_by_id(&self, id: StudentId) -> RepoResult<bool>;
    /// Inserts when `student.id` is `None`, otherwise overwrites that record.
    ///
    /// Returns the stored record with its identifier set.
    fn save(&self, student: &Student) -> RepoResult<Student>;
    fn delete_by_id(&self, id: StudentId) -> RepoResult<()>;
    fn exists_by_email(&self, email: &str) -> RepoResult<bool>;
    /// True iff a student other than `exclude_id` holds `email`.
    fn exists_conflicting_email(&self, email: &str, exclude_id: StudentId) -> RepoResult<bool>;
}

impl<R: StudentRepository + ?Sized> StudentRepository for &R {
    fn find_all(&self) -> RepoResult<Vec<Student>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        (**self).find_by_id(id)
    }

    fn exists_by_id(&self, id: StudentId) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn save(&self, student: &Student) -> RepoResult<Student> {
        (**self).save(student)
    }

    fn delete_by_id(&self, id: StudentId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }

    fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        (**self).exists_by_email(email)
    }

    fn exists_conflicting_email(&self, email: &str, exclude_id: StudentId) -> RepoResult<bool> {
        (**self).exists_conflicting_email(email, exclude_id)
    }
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `students` shape this repository reads.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn insert(&self, student: &Student) -> RepoResult<Student> {
        self.conn
            .execute(
                "INSERT INTO students (name, email, gender) VALUES (?1, ?2, ?3);",
                params![
                    student.name.as_str(),
                    student.email.as_str(),
                    student.gender.as_str()
                ],
            )
            .map_err(|err| map_write_error(err, &student.email))?;

        let mut stored = student.clone();
        stored.id = Some(self.conn.last_insert_rowid());
        Ok(stored)
    }

    fn update(&self, id: StudentId, student: &Student) -> RepoResult<Student> {
        let changed = self
            .conn
            .execute(
                "UPDATE students
                 SET
                    name = ?1,
                    email = ?2,
                    gender = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?4;",
                params![
                    student.name.as_str(),
                    student.email.as_str(),
                    student.gender.as_str(),
                    id
                ],
            )
            .map_err(|err| map_write_error(err, &student.email))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(student.clone())
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn exists_by_id(&self, id: StudentId) -> RepoResult<bool> {
        query_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
            params![id],
        )
    }

    fn save(&self, student: &Student) -> RepoResult<Student> {
        student.validate()?;

        match student.id {
            None => self.insert(student),
            Some(id) => self.update(id, student),
        }
    }

    fn delete_by_id(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        query_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM students WHERE email = ?1);",
            params![email],
        )
    }

    fn exists_conflicting_email(&self, email: &str, exclude_id: StudentId) -> RepoResult<bool> {
        query_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM students WHERE email = ?1 AND id <> ?2);",
            params![email, exclude_id],
        )
    }
}

fn query_exists(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, args, |row| row.get(0))?;
    Ok(exists == 1)
}

fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    if is_email_unique_violation(&err) {
        return RepoError::DuplicateEmail(email.to_string());
    }
    err.into()
}

fn is_email_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message
                    .as_deref()
                    .is_some_and(|text| text.contains("students.email"))
        }
        _ => false,
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let gender_text: String = row.get("gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in students.gender"
        ))
    })?;

    Ok(Student {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        email: row.get("email")?,
        gender,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'students';",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("students"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(students);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column,
            });
        }
    }

    Ok(())
}
