//! Pet entity and its wire-facing DTO shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Persisted row shape for the `pets` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Pet {
    pub id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub age: i32,
    pub weight: f32,
    /// Assigned once at creation; replace and patch never touch it.
    pub creation_date: DateTime<Utc>,
}

/// Read model returned to clients. Carries everything, including the
/// server-assigned id and creation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView {
    pub id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub age: i32,
    pub weight: f32,
    pub creation_date: DateTime<Utc>,
}

/// Write model accepted on create and replace. `id` and `creationDate` are
/// never client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0, max = 25, message = "age must be between 0 and 25"))]
    pub age: i32,
    pub weight: f32,
}

/// Intermediate document that patch operations are applied against. Unknown
/// fields are rejected so an edit targeting a path outside the writable set
/// fails instead of being silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchPetInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0, max = 25, message = "age must be between 0 and 25"))]
    pub age: i32,
    pub weight: f32,
}
