//! Pet routes and handlers.
//!
//! # Responsibility
//! - Route `(method, path)` pairs onto service calls.
//! - Reject malformed input with 400 before it reaches core.
//!
//! # Invariants
//! - Creation bodies carry exactly one string field, `name`.
//! - Update bodies carry a subset of `name|food|weight|age`; `null` values
//!   are accepted and leave the field unchanged.
//!
//! # Routes
//! - `POST /pets` -> 201 + record
//! - `GET /pets` -> 200 + array
//! - `GET /pets/:id` -> 200 + record | 404
//! - `PATCH /pets/:id` -> 200 + record | 404
//! - `DELETE /pets/:id` -> 204 | 404

use crate::error::ApiError;
use log::{info, warn};
use petstore_core::{JsonPetRepository, PetId, PetPatch, PetRepository, PetService, RepoResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

const PETS_ROUTE: &str = "pets";

/// Inbound request, independent of any HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Outbound response: status code plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(err) => Self::error(500, err.to_string()),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "error": message.into() })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        Self::error(err.status(), err.to_string())
    }
}

/// Body of `POST /pets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePetRequest {
    pub name: String,
}

/// Request handlers over one pet service.
pub struct PetApi<R: PetRepository> {
    service: PetService<R>,
}

impl PetApi<JsonPetRepository> {
    /// Opens the pet collection at `path` and wires repository and service.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let repo = JsonPetRepository::open(path)?;
        Ok(Self::new(PetService::new(repo)))
    }
}

impl<R: PetRepository> PetApi<R> {
    pub fn new(service: PetService<R>) -> Self {
        Self { service }
    }

    /// Dispatches one request to its route handler.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let method = request.method.trim().to_ascii_uppercase();
        let body = request.body.as_deref();
        let path = request
            .path
            .split_once('?')
            .map_or(request.path.as_str(), |(path, _)| path);
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();

        let response = match (method.as_str(), segments.as_slice()) {
            ("POST", [PETS_ROUTE]) => self.create_pet(body),
            ("GET", [PETS_ROUTE]) => self.list_pets(),
            (_, [PETS_ROUTE]) => ApiError::MethodNotAllowed(method.clone()).into(),
            ("GET", [PETS_ROUTE, id]) => self.get_pet(id),
            ("PATCH", [PETS_ROUTE, id]) => self.update_pet(id, body),
            ("DELETE", [PETS_ROUTE, id]) => self.delete_pet(id),
            (_, [PETS_ROUTE, _]) => ApiError::MethodNotAllowed(method.clone()).into(),
            _ => ApiError::NotFound("Route").into(),
        };

        info!(
            "event=api_request module=api method={} route={} status={}",
            method,
            route_label(&segments),
            response.status
        );
        response
    }

    pub fn create_pet(&self, body: Option<&str>) -> ApiResponse {
        respond(
            parse_create_body(body)
                .and_then(|request| Ok(self.service.birth(request.name)?))
                .map(|pet| ApiResponse::json(201, pet)),
        )
    }

    pub fn list_pets(&self) -> ApiResponse {
        respond(
            self.service
                .get_all_pets()
                .map(|pets| ApiResponse::json(200, pets))
                .map_err(ApiError::from),
        )
    }

    pub fn get_pet(&self, id: &str) -> ApiResponse {
        respond(parse_pet_id(id).and_then(|id| {
            self.service
                .get_pet_by_id(id)?
                .map(|pet| ApiResponse::json(200, pet))
                .ok_or(ApiError::NotFound("Pet"))
        }))
    }

    pub fn update_pet(&self, id: &str, body: Option<&str>) -> ApiResponse {
        respond(parse_pet_id(id).and_then(|id| {
            let patch = parse_patch_body(body)?;
            self.service
                .update_pet_by_id(id, patch)?
                .map(|pet| ApiResponse::json(200, pet))
                .ok_or(ApiError::NotFound("Pet"))
        }))
    }

    pub fn delete_pet(&self, id: &str) -> ApiResponse {
        respond(parse_pet_id(id).and_then(|id| {
            if self.service.delete_pet_by_id(id)? {
                Ok(ApiResponse::no_content())
            } else {
                Err(ApiError::NotFound("Pet"))
            }
        }))
    }
}

fn respond(result: Result<ApiResponse, ApiError>) -> ApiResponse {
    match result {
        Ok(response) => response,
        Err(err) => {
            if let ApiError::Repo(repo_err) = &err {
                warn!("event=api_failure module=api status=error error={repo_err}");
            }
            err.into()
        }
    }
}

fn parse_pet_id(raw: &str) -> Result<PetId, ApiError> {
    raw.trim()
        .parse::<PetId>()
        .map_err(|_| ApiError::Validation(format!("invalid pet id `{raw}`")))
}

fn parse_create_body(body: Option<&str>) -> Result<CreatePetRequest, ApiError> {
    let body = body
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("request body is required".to_string()))?;
    serde_json::from_str(body).map_err(|err| ApiError::Validation(format!("invalid body: {err}")))
}

fn parse_patch_body(body: Option<&str>) -> Result<PetPatch, ApiError> {
    match body.filter(|text| !text.trim().is_empty()) {
        None => Ok(PetPatch::default()),
        Some(text) => serde_json::from_str(text)
            .map_err(|err| ApiError::Validation(format!("invalid body: {err}"))),
    }
}

fn route_label(segments: &[&str]) -> &'static str {
    match segments {
        [PETS_ROUTE] => "/pets",
        [PETS_ROUTE, _] => "/pets/:id",
        _ => "unknown",
    }
}
