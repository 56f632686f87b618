//! Pets API: a PostgreSQL-backed REST service for pet records.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod patch;
pub mod repository;
pub mod routes;
pub mod store;

pub use error::AppError;
pub use extractors::AppJson;
pub use models::{CreatePetInput, PatchPetInput, Pet, PetView};
pub use patch::{JsonPatchEngine, PatchEngine};
pub use repository::{EntityRepository, InMemoryPetRepository, PgPetRepository};
pub use routes::{common_routes, common_routes_with_ready, crud_routes};
pub use store::{ensure_database_exists, ensure_pets_table};
