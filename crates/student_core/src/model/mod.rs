//! Domain model for the student registry.
//!
//! # Invariants
//! - A persisted student is identified by a store-assigned `StudentId`.
//! - No two persisted students share an email address.

pub mod student;
