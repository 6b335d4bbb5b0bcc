//! Read-or-create for singleton documents.
//!
//! Every singleton collection is served through [`load_or_create`]: the first read
//! of an empty collection seeds the typed default, and concurrent first reads all
//! observe the one stored document. Uniqueness is enforced by the store (unique
//! `kind`), not by a find-then-insert sequence.

use serde_json::{Map, Value};

use crate::{
    documents::{Singleton, SingletonDocument, StoredDocument},
    error::ApiError,
    repository::Repository,
};

/// Returns the single document of `D`, seeding `D::default()` if none exists.
pub async fn load_or_create<D: SingletonDocument>(
    repo: &dyn Repository,
) -> Result<Singleton<D>, ApiError> {
    if let Some(stored) = repo.find_document(D::KIND).await? {
        return decode(stored);
    }

    let default_body = serde_json::to_value(D::default())?;
    let stored = repo.insert_document_if_absent(D::KIND, default_body).await?;
    decode(stored)
}

/// apply_patch
///
/// Merges the top-level fields of `patch` into the current document (or the default
/// when the collection is empty), validates the result and stores it.
///
/// Fields `D` does not know are dropped. A known field with the wrong shape, or a
/// merged document that fails `D::validate`, is a 400 and nothing is written.
pub async fn apply_patch<D: SingletonDocument>(
    repo: &dyn Repository,
    patch: Value,
) -> Result<Singleton<D>, ApiError> {
    let Value::Object(patch) = patch else {
        return Err(ApiError::bad_request("Expected a JSON object"));
    };

    let current = match repo.find_document(D::KIND).await? {
        Some(stored) => decode::<D>(stored)?.document,
        None => D::default(),
    };

    let mut merged = match serde_json::to_value(current)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(patch);

    let document: D = serde_json::from_value(Value::Object(merged))
        .map_err(|e| ApiError::bad_request(format!("Invalid {}: {e}", D::KIND.as_str())))?;
    document.validate().map_err(ApiError::BadRequest)?;

    // Re-serializing drops unknown fields before they reach the store.
    let body = serde_json::to_value(&document)?;
    let stored = repo.replace_document(D::KIND, body).await?;

    tracing::info!(kind = D::KIND.as_str(), "document updated");

    Ok(Singleton {
        id: stored.id,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        document,
    })
}

fn decode<D: SingletonDocument>(stored: StoredDocument) -> Result<Singleton<D>, ApiError> {
    let document = serde_json::from_value(stored.body.0).map_err(|e| {
        ApiError::Internal(format!("stored {} is unreadable: {e}", D::KIND.as_str()))
    })?;

    Ok(Singleton {
        id: stored.id,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        document,
    })
}
