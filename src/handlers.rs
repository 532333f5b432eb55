use crate::client::CreditoApi;
use crate::models::SearchMode;
use crate::render::render_page;
use crate::view::SearchView;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single search form shown to every visitor.
    pub view: Arc<Mutex<SearchView>>,
    /// Client for the credit API.
    pub api: Arc<dyn CreditoApi>,
}

impl AppState {
    pub fn new(api: Arc<dyn CreditoApi>) -> Self {
        Self {
            view: Arc::new(Mutex::new(SearchView::new())),
            api,
        }
    }
}

/// Fields posted by the search form.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub termo: String,
    #[serde(default)]
    pub tipo: Option<String>,
}

/// Builds the router with every route of the search page.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/buscar", post(search))
        .route("/limpar", post(clear))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "credito-search",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
///
/// Renders the search page with the current view state.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.view.lock().await;
    Html(render_page(&view))
}

/// POST /buscar
///
/// Updates the term and mode, runs the search, then redirects back to the page.
/// The view lock is released while the backend call is in flight; a search
/// started meanwhile supersedes this one. The call runs on its own task, so a
/// dropped request still clears the loading state.
pub async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Redirect {
    tracing::info!("POST /buscar - tipo: {:?}, termo: {:?}", form.tipo, form.termo);

    let pending = {
        let mut view = state.view.lock().await;
        if let Some(tipo) = form.tipo.as_deref() {
            match tipo.parse::<SearchMode>() {
                Ok(mode) => view.set_mode(mode),
                Err(e) => tracing::warn!("Ignoring search mode: {}", e),
            }
        }
        view.set_query(form.termo);
        view.begin_search()
    };

    if let Some(pending) = pending {
        // Detached so the view is completed even if the browser goes away.
        let task_state = state.clone();
        let task = tokio::spawn(async move {
            let outcome = pending.run(&*task_state.api).await;
            let applied = task_state.view.lock().await.complete(outcome);
            if !applied {
                tracing::info!("Search superseded by a newer one");
            }
        });
        if let Err(e) = task.await {
            tracing::error!("Search task failed: {}", e);
        }
    }

    Redirect::to("/")
}

/// POST /limpar
pub async fn clear(State(state): State<AppState>) -> Redirect {
    tracing::info!("POST /limpar");
    state.view.lock().await.clear();
    Redirect::to("/")
}
