//! Transport-agnostic request boundary for the pet store.
//!
//! # Responsibility
//! - Validate request bodies and path parameters before they reach core.
//! - Map core results onto status codes and JSON bodies.
//!
//! # Invariants
//! - Handlers never panic and always return an `ApiResponse`.
//! - Missing records map to 404; storage failures map to 500.

pub mod api;
mod error;

pub use api::{ApiRequest, ApiResponse, CreatePetRequest, PetApi};
pub use error::ApiError;
