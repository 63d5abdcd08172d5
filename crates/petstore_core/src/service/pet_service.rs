//! Pet use-case service.
//!
//! # Responsibility
//! - Provide domain entry points (birth, lookup, update, delete).
//! - Apply newborn defaults and sanitize partial updates.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - A field without a value never overwrites a stored value.

use crate::model::pet::{Pet, PetId, PetPatch, PetProperties};
use crate::repo::pet_repo::{PetRepository, RepoResult};
use log::debug;

/// Use-case service wrapper for pet operations.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pet with every numeric attribute set to `1`.
    pub fn birth(&self, name: impl Into<String>) -> RepoResult<Pet> {
        self.repo.create_pet(PetProperties::newborn(name))
    }

    pub fn get_all_pets(&self) -> RepoResult<Vec<Pet>> {
        self.repo.list_pets()
    }

    pub fn get_pet_by_id(&self, id: PetId) -> RepoResult<Option<Pet>> {
        self.repo.get_pet(id)
    }

    /// Applies a partial update after dropping fields that carry no value.
    ///
    /// Returns `Ok(None)` when no pet has `id`.
    pub fn update_pet_by_id(&self, id: PetId, patch: PetPatch) -> RepoResult<Option<Pet>> {
        let patch = patch.without_nulls();
        if patch.is_empty() {
            debug!("event=pet_update module=service status=identity pet_id={id}");
        }
        self.repo.update_pet(id, &patch)
    }

    pub fn delete_pet_by_id(&self, id: PetId) -> RepoResult<bool> {
        self.repo.delete_pet(id)
    }
}
