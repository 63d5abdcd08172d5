//! Pet repository contracts and JSON file implementation.
//!
//! # Responsibility
//! - Provide record-level CRUD over a whole-collection store.
//! - Assign ids and merge partial updates.
//!
//! # Invariants
//! - Every mutating call is one locked read-modify-write of the collection.
//! - New ids are `max(existing) + 1`, or `1` for an empty collection.
//! - Not-found is returned as `None`/`false`, never as `RepoError`.
//! - Records with non-finite numbers are rejected before any write.

use crate::model::pet::{Pet, PetId, PetPatch, PetProperties};
use crate::store::{JsonFileStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    InvalidData(String),
    IdExhausted,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid pet data: {message}"),
            Self::IdExhausted => write!(f, "no pet id left above the current maximum"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidData(_) | Self::IdExhausted => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository interface for pet CRUD operations.
pub trait PetRepository {
    fn create_pet(&self, properties: PetProperties) -> RepoResult<Pet>;
    fn list_pets(&self) -> RepoResult<Vec<Pet>>;
    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>>;
    fn update_pet(&self, id: PetId, patch: &PetPatch) -> RepoResult<Option<Pet>>;
    fn delete_pet(&self, id: PetId) -> RepoResult<bool>;
}

/// Returns the id the next created pet receives.
///
/// Fails with `IdExhausted` when the current maximum is `PetId::MAX`.
pub fn next_pet_id(pets: &[Pet]) -> RepoResult<PetId> {
    match pets.iter().map(|pet| pet.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(RepoError::IdExhausted),
    }
}

fn ensure_writable(pet: &Pet) -> RepoResult<()> {
    pet.validate().map_err(|field| {
        RepoError::InvalidData(format!("`{field}` of pet {} is not a finite number", pet.id))
    })
}

/// Pet repository backed by a `JsonFileStore`.
#[derive(Debug)]
pub struct JsonPetRepository {
    store: JsonFileStore<Pet>,
}

impl JsonPetRepository {
    pub fn new(store: JsonFileStore<Pet>) -> Self {
        Self { store }
    }

    /// Opens (or creates) the pet collection file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(JsonFileStore::open(path)?))
    }
}

impl PetRepository for JsonPetRepository {
    fn create_pet(&self, properties: PetProperties) -> RepoResult<Pet> {
        let _guard = self.store.lock();
        let mut pets = self.store.read_all()?;

        let pet = Pet::from_properties(next_pet_id(&pets)?, properties);
        ensure_writable(&pet)?;
        pets.push(pet.clone());
        self.store.write_all(&pets)?;

        info!(
            "event=pet_create module=repo status=ok pet_id={} records={}",
            pet.id,
            pets.len()
        );
        Ok(pet)
    }

    fn list_pets(&self) -> RepoResult<Vec<Pet>> {
        let _guard = self.store.lock();
        Ok(self.store.read_all()?)
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let _guard = self.store.lock();
        let pets = self.store.read_all()?;
        Ok(pets.into_iter().find(|pet| pet.id == id))
    }

    fn update_pet(&self, id: PetId, patch: &PetPatch) -> RepoResult<Option<Pet>> {
        let _guard = self.store.lock();
        let mut pets = self.store.read_all()?;

        let Some(pet) = pets.iter_mut().find(|pet| pet.id == id) else {
            info!("event=pet_update module=repo status=not_found pet_id={id}");
            return Ok(None);
        };
        let mut updated = pet.clone();
        updated.apply_patch(patch);
        ensure_writable(&updated)?;
        *pet = updated.clone();
        self.store.write_all(&pets)?;

        info!("event=pet_update module=repo status=ok pet_id={id}");
        Ok(Some(updated))
    }

    fn delete_pet(&self, id: PetId) -> RepoResult<bool> {
        let _guard = self.store.lock();
        let mut pets = self.store.read_all()?;

        let Some(index) = pets.iter().position(|pet| pet.id == id) else {
            info!("event=pet_delete module=repo status=not_found pet_id={id}");
            return Ok(false);
        };
        pets.remove(index);
        self.store.write_all(&pets)?;

        info!(
            "event=pet_delete module=repo status=ok pet_id={id} records={}",
            pets.len()
        );
        Ok(true)
    }
}
