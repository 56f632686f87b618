//! Entity CRUD routes. Generic over the repository so the same router
//! serves the PostgreSQL store and the in-memory double; nest it under the
//! collection's public path (e.g. `/api/pets`).

use crate::handlers::crud::{create, get_by_id, list, patch, remove, replace};
use crate::repository::EntityRepository;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn crud_routes<R: EntityRepository + 'static>(repo: Arc<R>) -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:id",
            get(get_by_id::<R>)
                .put(replace::<R>)
                .patch(patch::<R>)
                .delete(remove::<R>),
        )
        .with_state(repo)
}
