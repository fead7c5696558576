// Rickllow Listings - Web Server
// REST surface over the catalog core with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use rickllow::{get_by_name, list, list_by_category, Error};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

/// Query parameters for the list route
#[derive(Deserialize)]
struct ListParams {
    search_term: Option<String>,
}

/// Map a core error onto its status code and the error body the
/// frontend expects: { "error": { "message", "status" } }
fn error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Store(_) => {
            eprintln!("Store error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = json!({
        "error": {
            "message": err.to_string(),
            "status": status.as_u16(),
        }
    });

    (status, Json(body))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "OK", "version": rickllow::VERSION }))
}

/// GET /locations?search_term=<s> - Location summaries, optionally filtered
async fn get_locations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match list(&conn, params.search_term.as_deref()) {
        Ok(locations) => {
            (StatusCode::OK, Json(json!({ "locations": locations }))).into_response()
        }
        Err(err) => error_response(err).into_response(),
    }
}

/// GET /locations/:name - Full nested document for one location
async fn get_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_by_name(&conn, &name) {
        Ok(location) => {
            (StatusCode::OK, Json(json!({ "location": location }))).into_response()
        }
        Err(err) => error_response(err).into_response(),
    }
}

/// GET /locations/categories/:category - Pre-filtered location summaries
async fn get_locations_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match list_by_category(&conn, &category.to_lowercase()) {
        Ok(locations) => {
            (StatusCode::OK, Json(json!({ "locations": locations }))).into_response()
        }
        Err(err) => error_response(err).into_response(),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("Rickllow Listings - Web Server");

    let db_path =
        std::env::var("RICKLLOW_DB").unwrap_or_else(|_| "rickllow.db".to_string());

    if !std::path::Path::new(&db_path).exists() {
        eprintln!("Database not found at {:?}", db_path);
        eprintln!("   Run: cargo run init");
        eprintln!("   to create and seed the database first.");
        std::process::exit(1);
    }

    let conn = Connection::open(&db_path).expect("Failed to open database");
    println!("✓ Database opened: {}", db_path);

    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    // The static "categories" segment outranks the :name capture, so
    // /locations/categories/planets never resolves as a location name
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/locations", get(get_locations))
        .route("/locations/categories/:category", get(get_locations_by_category))
        .route("/locations/:name", get(get_location))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3001";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("Server running on http://localhost:3001");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
