//! Repository layer: a generic CRUD interface plus its PostgreSQL and
//! in-memory implementations.

mod memory;
mod pg;

pub use memory::InMemoryPetRepository;
pub use pg::PgPetRepository;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// Generic CRUD interface over an entity/DTO triple: the stored row shape is
/// an implementation detail, `View` is what reads return, `Input` is what
/// create and replace accept. The HTTP layer is composed against this trait,
/// so sharing the route logic with another entity type means implementing it
/// for that type's triple, not inheriting from anything.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    type Id: DeserializeOwned + std::fmt::Display + Send + Sync;
    type View: Serialize + Send;
    type Input: DeserializeOwned + Send;

    /// Primary key of a read model. Lets the HTTP layer build Location
    /// headers without knowing the concrete view shape.
    fn id_of(view: &Self::View) -> Self::Id;

    /// All rows in insertion order. Empty store yields an empty vec.
    async fn list(&self) -> Result<Vec<Self::View>, AppError>;

    /// One row by id, or `NotFound`.
    async fn get(&self, id: Self::Id) -> Result<Self::View, AppError>;

    /// Validates the input, assigns a fresh id and creation timestamp,
    /// persists, and returns the stored row's view.
    async fn create(&self, input: Self::Input) -> Result<Self::View, AppError>;

    /// Overwrites every writable field of an existing row. The id and
    /// creation timestamp are preserved. `NotFound` if the id is absent.
    async fn replace(&self, id: Self::Id, input: Self::Input) -> Result<(), AppError>;

    /// Applies an ordered edit sequence (raw wire document) to an existing
    /// row via the injected patch engine, re-validating before anything is
    /// written. `NotFound` if the id is absent.
    async fn patch(&self, id: Self::Id, ops: Value) -> Result<(), AppError>;

    /// Hard-deletes a row. `NotFound` if the id is absent, including when it
    /// was already deleted.
    async fn delete(&self, id: Self::Id) -> Result<(), AppError>;

    /// Row count. The readiness probe uses this as its store ping.
    async fn count(&self) -> Result<u64, AppError>;
}
