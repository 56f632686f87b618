//! Generic CRUD handlers over an [`EntityRepository`]. Each handler turns
//! one repository outcome into its HTTP shape; the mount point chosen in
//! the router decides which entity they serve.

use crate::error::AppError;
use crate::extractors::AppJson;
use crate::repository::EntityRepository;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// GET / — list every record.
pub async fn list<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
) -> Result<impl IntoResponse, AppError> {
    let views = repo.list().await?;
    Ok(Json(views))
}

/// GET /:id — fetch one record; 404 when absent.
pub async fn get_by_id<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
    Path(id): Path<R::Id>,
) -> Result<impl IntoResponse, AppError> {
    let view = repo.get(id).await?;
    Ok(Json(view))
}

/// POST / — create a record; 201 with a Location header for the new id.
pub async fn create<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
    OriginalUri(uri): OriginalUri,
    AppJson(input): AppJson<R::Input>,
) -> Result<impl IntoResponse, AppError> {
    let view = repo.create(input).await?;
    // OriginalUri survives nesting, so the header points at the public path.
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), R::id_of(&view));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(view),
    ))
}

/// PUT /:id — overwrite every writable field; 204 on success.
pub async fn replace<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
    Path(id): Path<R::Id>,
    AppJson(input): AppJson<R::Input>,
) -> Result<impl IntoResponse, AppError> {
    repo.replace(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /:id — apply a JSON Patch document; 204 on success.
pub async fn patch<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
    Path(id): Path<R::Id>,
    AppJson(ops): AppJson<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    repo.patch(id, ops).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /:id — remove the record; 204 on success, 404 when absent.
pub async fn remove<R: EntityRepository + 'static>(
    State(repo): State<Arc<R>>,
    Path(id): Path<R::Id>,
) -> Result<impl IntoResponse, AppError> {
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
