//! Transport-facing request/response mapping.
//!
//! # Responsibility
//! - Map student use-cases onto status-coded response envelopes.
//! - Own the existence lookup that precedes an edit.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes a response.
//! - Business-rule messages are echoed verbatim from the service.

pub mod student_api;
