// Task routes

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Local;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::bulk::{BulkAction, BulkOutcome};
use crate::models::{Category, NewTask, Task, TaskPatch, TaskWithCategory, ValidationError};
use crate::reorder::DragSession;
use crate::store::Store;
use crate::view::{self, TaskStats, ViewState};

/// Body of `POST /api/tasks/reorder`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub task_ids: Vec<String>,
}

/// Body of `POST /api/tasks/move`: a drag from `source_index` to `target_index` of the
/// sequence `view` displays.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    #[serde(default)]
    pub view: ViewState,
    pub task_id: String,
    pub source_index: usize,
    pub target_index: usize,
}

/// Body of `POST /api/tasks/bulk`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub action: BulkAction,
    pub task_ids: Vec<String>,
}

/// Response of `GET /api/tasks/view`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TaskView {
    pub title: String,
    pub description: String,
    pub tasks: Vec<TaskWithCategory>,
}

fn ensure_category(store: &Store, id: Option<&str>) -> Result<(), ApiError> {
    match id {
        Some(id) if !store.has_category(id) => Err(ValidationError::UnknownCategory(id.to_string()).into()),
        _ => Ok(()),
    }
}

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<TaskWithCategory>> {
    let store = state.store.read().await;
    Json(store.list_tasks())
}

pub async fn view_tasks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ViewState>, QueryRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let Query(view) = query?;
    let (tasks, categories): (Vec<TaskWithCategory>, Vec<Category>) = {
        let store = state.store.read().await;
        (store.list_tasks(), store.list_categories())
    };

    let tasks = view::apply_view(&tasks, &view, &Local::now());
    tracing::debug!(filters = ?view.filters(), sort = %view.sort, count = tasks.len(), "view_tasks");

    Ok(Json(TaskView {
        title: view.title(&categories),
        description: view.description().to_string(),
        tasks,
    }))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskWithCategory>, ApiError> {
    let store = state.store.read().await;
    store
        .get_task(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Task>(id))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskWithCategory>), ApiError> {
    let Json(new) = payload?;
    let new = new.validated()?;

    let mut store = state.store.write().await;
    ensure_category(&store, new.category_id.as_deref())?;
    let created = store.create_task(new)?;
    tracing::info!(id = %created.task.id, title = %created.task.title, "task created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskWithCategory>, ApiError> {
    let Json(patch) = payload?;
    let patch = patch.validated()?;

    let mut store = state.store.write().await;
    ensure_category(&store, patch.assigned_category())?;
    store
        .update_task(&id, patch)
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Task>(id))
}

pub async fn delete_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    if store.delete_task(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found::<Task>(id))
    }
}

pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskWithCategory>, ApiError> {
    let mut store = state.store.write().await;
    store
        .toggle_task_complete(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found::<Task>(id))
}

pub async fn reorder_tasks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let mut store = state.store.write().await;
    store.reorder_tasks(&request.task_ids);
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a drag gesture against the view as the server currently evaluates it.
///
/// The displayed sequence, the splice and the position rewrite all happen under one
/// write lock.
pub async fn move_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let session = DragSession::start(request.task_id, request.source_index);

    let mut store = state.store.write().await;
    let displayed = view::apply_view(&store.list_tasks(), &request.view, &Local::now());
    if let Some(ids) = session.drop_at(&displayed, request.target_index)? {
        let rewritten = store.reorder_tasks(&ids);
        tracing::debug!(
            task_id = session.task_id(),
            from = session.source_index(),
            to = request.target_index,
            rewritten,
            "move_task"
        );
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Apply an action to each selected task.
///
/// Each id takes the lock separately, like independent requests would; there is no
/// rollback when some ids fail.
pub async fn bulk_tasks(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BulkRequest>, JsonRejection>,
) -> Result<Json<BulkOutcome>, ApiError> {
    let Json(request) = payload?;
    let mut outcome = BulkOutcome::new(request.action);

    for id in request.task_ids {
        let ok = {
            let mut store = state.store.write().await;
            request.action.apply(&mut store, &id)
        };
        outcome.record(id, ok);
    }

    if outcome.is_success() {
        tracing::info!(action = %request.action, "{}", outcome.summary());
    } else {
        tracing::warn!(action = %request.action, missing = ?outcome.not_found, "{}", outcome.summary());
    }
    Ok(Json(outcome))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<TaskStats> {
    let tasks = state.store.read().await.list_tasks();
    Json(view::summarize(&tasks, &Local::now()))
}
