//! Pet domain model.
//!
//! # Responsibility
//! - Define the persisted pet record and its id-less property set.
//! - Define the partial-update shape used by update paths.
//!
//! # Invariants
//! - `id` is assigned by the repository and never reassigned.
//! - A `PetPatch` field set to `None` never changes the stored value.

use serde::{Deserialize, Serialize};

/// Stable identifier of a pet inside one collection.
pub type PetId = u64;

/// Default value for `food`, `weight` and `age` of a newborn pet.
pub const NEWBORN_ATTRIBUTE: f64 = 1.0;

/// Persisted pet record.
///
/// Field order here is the serialized field order in the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub food: f64,
    pub weight: f64,
    pub age: f64,
}

impl Pet {
    /// Builds a record from properties and an assigned id.
    pub fn from_properties(id: PetId, properties: PetProperties) -> Self {
        Self {
            id,
            name: properties.name,
            food: properties.food,
            weight: properties.weight,
            age: properties.age,
        }
    }

    /// Checks that every numeric attribute can be written as a JSON number.
    ///
    /// Returns the name of the first non-finite attribute.
    pub fn validate(&self) -> Result<(), &'static str> {
        [("food", self.food), ("weight", self.weight), ("age", self.age)]
            .into_iter()
            .find(|(_, value)| !value.is_finite())
            .map_or(Ok(()), |(field, _)| Err(field))
    }

    /// Overlays supplied patch fields onto this record.
    ///
    /// Fields left as `None` in `patch` keep their current value.
    pub fn apply_patch(&mut self, patch: &PetPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(food) = patch.food {
            self.food = food;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
    }
}

/// All pet attributes except the repository-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProperties {
    pub name: String,
    pub food: f64,
    pub weight: f64,
    pub age: f64,
}

impl PetProperties {
    /// Properties of a freshly born pet: every numeric attribute is `1`.
    pub fn newborn(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            food: NEWBORN_ATTRIBUTE,
            weight: NEWBORN_ATTRIBUTE,
            age: NEWBORN_ATTRIBUTE,
        }
    }
}

/// Partial pet update.
///
/// When parsed from JSON, a missing key and an explicit `null` both
/// deserialize to `None`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
}

impl PetPatch {
    /// Returns whether no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.food.is_none() && self.weight.is_none() && self.age.is_none()
    }

    /// Drops every field that carries no usable value.
    ///
    /// Non-finite numbers cannot be written back as JSON, so they count as
    /// absent alongside `None`.
    pub fn without_nulls(self) -> Self {
        Self {
            name: self.name,
            food: self.food.filter(|value| value.is_finite()),
            weight: self.weight.filter(|value| value.is_finite()),
            age: self.age.filter(|value| value.is_finite()),
        }
    }
}
