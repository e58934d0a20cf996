// HTTP API: shared state, routing and server startup

pub mod categories;
pub mod error;
pub mod tasks;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::store::Store;

pub use error::ApiError;

/// Shared state behind every route.
///
/// Handlers hold the store lock for one store operation and never await while holding it.
#[derive(Debug, Default)]
pub struct AppState {
    pub store: RwLock<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

/// Build the application router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/view", get(tasks::view_tasks))
        .route("/api/tasks/reorder", post(tasks::reorder_tasks))
        .route("/api/tasks/move", post(tasks::move_task))
        .route("/api/tasks/bulk", post(tasks::bulk_tasks))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/tasks/{id}/toggle", post(tasks::toggle_task))
        .route("/api/stats", get(tasks::stats))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Bind `addr` and serve the API on a background task.
///
/// Returns the bound address (useful with port 0) and the server task handle.
pub async fn start_server(addr: &str, state: Arc<AppState>) -> eyre::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    let app = router(state);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> eyre::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
