//! In-memory pet repository: a double for tests and database-less local
//! runs, with the same observable semantics as the PostgreSQL
//! implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::error::AppError;
use crate::mapper::{apply_create_input, apply_patch_input, pet_from_input};
use crate::models::{CreatePetInput, Pet, PetView};
use crate::patch::{patch_snapshot, JsonPatchEngine, PatchEngine};
use crate::repository::EntityRepository;

struct Inner {
    /// Keyed by id; ids are assigned monotonically, so key order is
    /// insertion order.
    rows: BTreeMap<i32, Pet>,
    next_id: i32,
}

pub struct InMemoryPetRepository {
    inner: Mutex<Inner>,
    engine: Arc<dyn PatchEngine>,
}

impl InMemoryPetRepository {
    pub fn new(engine: Arc<dyn PatchEngine>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            engine,
        }
    }
}

impl Default for InMemoryPetRepository {
    fn default() -> Self {
        Self::new(Arc::new(JsonPatchEngine))
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("pet {id}"))
}

#[async_trait]
impl EntityRepository for InMemoryPetRepository {
    type Id = i32;
    type View = PetView;
    type Input = CreatePetInput;

    fn id_of(view: &PetView) -> i32 {
        view.id
    }

    async fn list(&self) -> Result<Vec<PetView>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().map(PetView::from).collect())
    }

    async fn get(&self, id: i32) -> Result<PetView, AppError> {
        let inner = self.inner.lock().await;
        inner
            .rows
            .get(&id)
            .map(PetView::from)
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, input: CreatePetInput) -> Result<PetView, AppError> {
        input.validate()?;
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let pet = pet_from_input(id, &input, Utc::now());
        let view = PetView::from(&pet);
        inner.rows.insert(id, pet);
        Ok(view)
    }

    async fn replace(&self, id: i32, input: CreatePetInput) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        let pet = inner.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        input.validate()?;
        apply_create_input(pet, &input);
        Ok(())
    }

    async fn patch(&self, id: i32, ops: Value) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        let pet = inner.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        let patched = patch_snapshot(self.engine.as_ref(), pet, &ops)?;
        apply_patch_input(pet, &patched);
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.rows.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn count(&self) -> Result<u64, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rex() -> CreatePetInput {
        CreatePetInput {
            name: "Rex".into(),
            breed: Some("Labrador".into()),
            color: Some("brown".into()),
            age: 3,
            weight: 25.5,
        }
    }

    fn named(name: &str) -> CreatePetInput {
        CreatePetInput {
            name: name.into(),
            breed: None,
            color: None,
            age: 1,
            weight: 4.0,
        }
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryPetRepository::default();
        assert!(repo.list().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryPetRepository::default();
        let before = Utc::now();
        let created = repo.create(rex()).await.unwrap();

        assert!(created.id > 0);
        assert!(created.creation_date >= before);
        assert_eq!(created.name, "Rex");
        assert_eq!(created.breed.as_deref(), Some("Labrador"));
        assert_eq!(created.color.as_deref(), Some("brown"));
        assert_eq!(created.age, 3);
        assert_eq!(created.weight, 25.5);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryPetRepository::default();
        let a = repo.create(named("a")).await.unwrap();
        let b = repo.create(named("b")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let repo = InMemoryPetRepository::default();

        let mut empty_name = rex();
        empty_name.name.clear();
        assert!(matches!(
            repo.create(empty_name).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        let mut too_old = rex();
        too_old.age = 26;
        assert!(matches!(
            repo.create(too_old).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let repo = InMemoryPetRepository::default();
        assert!(matches!(
            repo.get(42).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn replace_overwrites_all_writable_fields() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();

        repo.replace(
            created.id,
            CreatePetInput {
                name: "Bolt".into(),
                breed: None,
                color: Some("white".into()),
                age: 5,
                weight: 12.0,
            },
        )
        .await
        .unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Bolt");
        assert_eq!(fetched.breed, None);
        assert_eq!(fetched.color.as_deref(), Some("white"));
        assert_eq!(fetched.age, 5);
        assert_eq!(fetched.weight, 12.0);
        // Identity and creation date survive a full overwrite.
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.creation_date, created.creation_date);
    }

    #[tokio::test]
    async fn replace_unknown_id_is_not_found() {
        let repo = InMemoryPetRepository::default();
        assert!(matches!(
            repo.replace(42, rex()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn replace_with_invalid_input_leaves_row_unchanged() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();

        let mut invalid = rex();
        invalid.age = 30;
        assert!(matches!(
            repo.replace(created.id, invalid).await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patch_edits_the_named_field() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();

        repo.patch(
            created.id,
            json!([{"op": "replace", "path": "/age", "value": 4}]),
        )
        .await
        .unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched.age, 4);
        assert_eq!(fetched.name, created.name);
        assert_eq!(fetched.creation_date, created.creation_date);
    }

    #[tokio::test]
    async fn empty_patch_leaves_row_unchanged() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();
        repo.patch(created.id, json!([])).await.unwrap();
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn failed_patch_validation_persists_nothing() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();

        // Two edits: the first would stick if application were not atomic.
        let ops = json!([
            {"op": "replace", "path": "/name", "value": "Bolt"},
            {"op": "replace", "path": "/age", "value": 30}
        ]);
        assert!(matches!(
            repo.patch(created.id, ops).await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let repo = InMemoryPetRepository::default();
        assert!(matches!(
            repo.patch(42, json!([])).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.get(created.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn deleting_twice_fails_cleanly() {
        let repo = InMemoryPetRepository::default();
        let created = repo.create(rex()).await.unwrap();
        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_tracks_creates_minus_deletes_in_insertion_order() {
        let repo = InMemoryPetRepository::default();
        let a = repo.create(named("a")).await.unwrap();
        let _b = repo.create(named("b")).await.unwrap();
        let c = repo.create(named("c")).await.unwrap();
        repo.delete(a.id).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.delete(c.id).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
