// Category routes

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::{ApiError, AppState};
use crate::models::{Category, CategoryPatch, NewCategory};

pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<Vec<Category>> {
    let store = state.store.read().await;
    Json(store.list_categories())
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let store = state.store.read().await;
    store
        .get_category(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Category>(id))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(new) = payload?;
    let new = new.validated()?;

    let mut store = state.store.write().await;
    let created = store.create_category(new)?;
    tracing::info!(id = %created.id, name = %created.name, "category created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(patch) = payload?;
    let patch = patch.validated()?;

    let mut store = state.store.write().await;
    store
        .update_category(&id, patch)
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Category>(id))
}

/// Detaches the category from its tasks before removing it.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    if store.delete_category(&id) {
        tracing::info!(id = %id, "category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found::<Category>(id))
    }
}
