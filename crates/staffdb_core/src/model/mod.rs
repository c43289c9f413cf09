//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record and its write inputs.
//! - Define read models handed to presentation layers.
//!
//! # Invariants
//! - Every employee is identified by a stable, never reused `EmployeeId`.
//! - Deletion is physical; there is no tombstone state.

pub mod employee;
pub mod hierarchy;
