//! PostgreSQL-backed pet repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreatePetInput, Pet, PetView};
use crate::patch::{patch_snapshot, PatchEngine};
use crate::repository::EntityRepository;

const SELECT_COLUMNS: &str = "id, name, breed, color, age, weight, creation_date";

/// Pet CRUD against the `pets` table. Holds an explicitly injected pool;
/// mutations rely on single-row statement atomicity, so every operation
/// either commits fully or reports a failure.
pub struct PgPetRepository {
    pool: PgPool,
    engine: Arc<dyn PatchEngine>,
}

impl PgPetRepository {
    pub fn new(pool: PgPool, engine: Arc<dyn PatchEngine>) -> Self {
        Self { pool, engine }
    }

    async fn fetch(&self, id: i32) -> Result<Pet, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM pets WHERE id = $1");
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Pet>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pet {id}")))
    }

    /// Overwrites the writable columns of one row; `creation_date` and `id`
    /// are never in the SET list. Returns the number of rows hit.
    async fn update_row(
        &self,
        id: i32,
        name: &str,
        breed: Option<&str>,
        color: Option<&str>,
        age: i32,
        weight: f32,
    ) -> Result<u64, AppError> {
        let sql = "UPDATE pets SET name = $1, breed = $2, color = $3, age = $4, weight = $5 \
                   WHERE id = $6";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql)
            .bind(name)
            .bind(breed)
            .bind(color)
            .bind(age)
            .bind(weight)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EntityRepository for PgPetRepository {
    type Id = i32;
    type View = PetView;
    type Input = CreatePetInput;

    fn id_of(view: &PetView) -> i32 {
        view.id
    }

    async fn list(&self) -> Result<Vec<PetView>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM pets ORDER BY id");
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Pet>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(PetView::from).collect())
    }

    async fn get(&self, id: i32) -> Result<PetView, AppError> {
        Ok(PetView::from(&self.fetch(id).await?))
    }

    async fn create(&self, input: CreatePetInput) -> Result<PetView, AppError> {
        input.validate()?;
        let sql = format!(
            "INSERT INTO pets (name, breed, color, age, weight, creation_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SELECT_COLUMNS}"
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Pet>(&sql)
            .bind(&input.name)
            .bind(&input.breed)
            .bind(&input.color)
            .bind(input.age)
            .bind(input.weight)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(PetView::from(&row))
    }

    async fn replace(&self, id: i32, input: CreatePetInput) -> Result<(), AppError> {
        self.fetch(id).await?;
        input.validate()?;
        let affected = self
            .update_row(
                id,
                &input.name,
                input.breed.as_deref(),
                input.color.as_deref(),
                input.age,
                input.weight,
            )
            .await?;
        if affected == 0 {
            // Row deleted between the existence check and the write.
            return Err(AppError::NotFound(format!("pet {id}")));
        }
        Ok(())
    }

    async fn patch(&self, id: i32, ops: Value) -> Result<(), AppError> {
        let current = self.fetch(id).await?;
        let patched = patch_snapshot(self.engine.as_ref(), &current, &ops)?;
        let affected = self
            .update_row(
                id,
                &patched.name,
                patched.breed.as_deref(),
                patched.color.as_deref(),
                patched.age,
                patched.weight,
            )
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("pet {id}")));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let sql = "DELETE FROM pets WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("pet {id}")));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pets")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }
}
