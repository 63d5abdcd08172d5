//! Core domain logic for the pet store.
//! This crate owns record persistence and every record-level invariant.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Pet, PetId, PetPatch, PetProperties};
pub use repo::pet_repo::{next_pet_id, JsonPetRepository, PetRepository, RepoError, RepoResult};
pub use service::pet_service::PetService;
pub use store::{JsonFileStore, StoreError, StoreResult};
