//! Partial updates behind an injected capability.
//!
//! Repositories hand the raw wire document to a [`PatchEngine`] and never
//! inspect the edit grammar themselves, so the validate-then-commit core can
//! be exercised with any engine.

use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::error::AppError;
use crate::models::{PatchPetInput, Pet};

#[derive(Error, Debug)]
pub enum PatchRejection {
    #[error("malformed patch document: {0}")]
    Malformed(String),
    #[error("patch could not be applied: {0}")]
    Failed(String),
}

impl From<PatchRejection> for AppError {
    fn from(rejection: PatchRejection) -> Self {
        AppError::validation(rejection.to_string())
    }
}

/// Applies an ordered sequence of `{op, path, value}` edits to a JSON
/// document in place. `ops` arrives as the raw request body.
pub trait PatchEngine: Send + Sync {
    fn apply(&self, doc: &mut Value, ops: &Value) -> Result<(), PatchRejection>;
}

/// RFC 6902 implementation over the `json-patch` crate:
/// add/remove/replace/move/copy/test against named fields.
pub struct JsonPatchEngine;

impl PatchEngine for JsonPatchEngine {
    fn apply(&self, doc: &mut Value, ops: &Value) -> Result<(), PatchRejection> {
        let patch: json_patch::Patch = serde_json::from_value(ops.clone())
            .map_err(|e| PatchRejection::Malformed(e.to_string()))?;
        json_patch::patch(doc, &patch).map_err(|e| PatchRejection::Failed(e.to_string()))
    }
}

/// Core of the patch operation, shared by every repository implementation:
/// snapshot the current row, run the edits against the snapshot's JSON form,
/// re-deserialize, re-validate. Nothing is persisted unless every step
/// succeeds, so a failed patch leaves the stored row untouched.
pub fn patch_snapshot(
    engine: &dyn PatchEngine,
    current: &Pet,
    ops: &Value,
) -> Result<PatchPetInput, AppError> {
    let snapshot = PatchPetInput::from(current);
    let mut doc = serde_json::to_value(&snapshot)?;
    engine.apply(&mut doc, ops)?;
    let patched: PatchPetInput = serde_json::from_value(doc)
        .map_err(|e| AppError::validation(format!("patch produced an invalid document: {e}")))?;
    patched.validate()?;
    Ok(patched)
}
