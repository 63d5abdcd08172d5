//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define record-level data access contracts.
//! - Isolate whole-file storage details from service orchestration.
//!
//! # Invariants
//! - Repository APIs report missing records as values, and storage
//!   failures as `RepoError`.

pub mod pet_repo;
