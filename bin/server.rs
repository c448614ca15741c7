// Trophée Palmarès - Web Server
// JSON API over the loaded snapshot, plus the static viewer page

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trophee_palmares::{
    places_for_year, ranked_for_selection, years_present, Config, LevelGroup, Snapshot, ViewState,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    snapshot: Arc<Snapshot>,
    /// Why the data file could not be loaded, if it could not
    load_error: Option<Arc<String>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn failed(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    entries: usize,
    source: String,
    loaded_at: String,
}

#[derive(Deserialize)]
struct ResultsQuery {
    place: String,
}

#[derive(Serialize)]
struct ResultsResponse {
    year: i64,
    place: String,
    breadcrumb: String,
    groups: Vec<LevelGroup>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check and data status
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let health = HealthResponse {
        entries: state.snapshot.len(),
        source: state.snapshot.source.clone(),
        loaded_at: state.snapshot.loaded_at.to_rfc3339(),
    };

    match &state.load_error {
        None => (StatusCode::OK, Json(ApiResponse::ok(health))),
        Some(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failed(health, err.as_str())),
        ),
    }
}

/// GET /api/years - Years, most recent first
async fn get_years(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(years_present(state.snapshot.entries())))
}

/// GET /api/years/:year/places - Places of a year
async fn get_places(
    State(state): State<AppState>,
    Path(year): Path<i64>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(places_for_year(state.snapshot.entries(), year)))
}

/// GET /api/years/:year/results?place=... - Ranked table, grouped by level
async fn get_results(
    State(state): State<AppState>,
    Path(year): Path<i64>,
    Query(query): Query<ResultsQuery>,
) -> impl IntoResponse {
    let view = ViewState::years().select_year(year).select_place(query.place);
    let groups = ranked_for_selection(state.snapshot.entries(), &view.selection);

    Json(ApiResponse::ok(ResultsResponse {
        year,
        place: view.selection.place.clone().unwrap_or_default(),
        breadcrumb: view.breadcrumb(),
        groups,
    }))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState, web_dir: &std::path::Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/years", get(get_years))
        .route("/years/:year/places", get(get_places))
        .route("/years/:year/results", get(get_results))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(web_dir))
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    // A missing data file is reported, not fatal: every query answers empty
    let (snapshot, load_error) = match Snapshot::load(&config.data_path) {
        Ok(snapshot) => (snapshot, None),
        Err(err) => {
            error!(error = %format!("{:#}", err), "data file not loaded");
            (Snapshot::empty(), Some(Arc::new(format!("{:#}", err))))
        }
    };

    let state = AppState {
        snapshot: Arc::new(snapshot),
        load_error,
    };

    let app = router(state, &config.web_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server running");
    info!("API: http://{}/api/years", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
