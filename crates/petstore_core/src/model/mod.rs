//! Domain model for pet records.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and service code.
//!
//! # Invariants
//! - Every persisted pet is identified by a unique numeric `PetId`.
//! - Deletion removes the record; there are no tombstones.

pub mod pet;
