//! Core use-case services.
//!
//! # Responsibility
//! - Enforce business invariants above the repository layer.
//! - Keep transport layers decoupled from storage details.

pub mod student_service;
