use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use extract::Table;
use review::{ReviewSession, SaveOutcome};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod metrics;

use config::ReviewConfig;
use metrics::{Metrics, MetricsSnapshot};

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<ReviewSession>>,
    metrics: Arc<Metrics>,
}

/// Everything a client needs to render the current record: position,
/// per-record completion markers, the label for the unified save button,
/// and the editable table itself.
#[derive(Serialize)]
struct SessionView {
    index: usize,
    total: usize,
    completed: Vec<bool>,
    current_completed: bool,
    save_label: &'static str,
    finished: bool,
    file_name: String,
    table: Table,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    tables: usize,
}

#[derive(Serialize)]
struct SaveResponse {
    outcome: SaveOutcome,
    session: SessionView,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Optional first argument: path to a JSON config file.
    let config = match std::env::args().nth(1) {
        Some(path) => ReviewConfig::from_file(&PathBuf::from(path))
            .expect("Failed to load review config"),
        None => ReviewConfig::default(),
    };

    // Load every generated frame up front; nothing to review is fatal.
    let session = ReviewSession::open(&config.frames_dir, config.output_file.clone())
        .await
        .expect("Failed to open review session");

    let state = Arc::new(AppState {
        session: Arc::new(Mutex::new(session)),
        metrics: Metrics::new(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/session", get(get_session))
        .route("/session/previous", post(go_previous))
        .route("/session/next", post(go_next))
        .route("/session/table", put(edit_table))
        .route("/session/save", post(save_current))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind review service address");

    tracing::info!(addr = %config.bind_addr, "Review service listening");

    axum::serve(listener, app).await.unwrap();
}

fn session_view(session: &ReviewSession) -> SessionView {
    let state = session.state();

    SessionView {
        index: state.cursor,
        total: state.tables.len(),
        completed: state.completed.clone(),
        current_completed: state.is_current_completed(),
        save_label: state.save_label(),
        finished: state.is_finished(),
        file_name: state.current().file_name.clone(),
        table: state.current().table.clone(),
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let session = state.session.lock().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        tables: session.state().tables.len(),
    })
}

async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    state.metrics.record_request();
    let session = state.session.lock().await;

    Json(session_view(&session))
}

async fn go_previous(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    state.metrics.record_request();
    let mut session = state.session.lock().await;

    // Disallowed at the first record; the unchanged view comes back.
    session.previous();

    Json(session_view(&session))
}

async fn go_next(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    state.metrics.record_request();
    let mut session = state.session.lock().await;

    // Only moves once the current record is saved, and never past the end.
    session.next();

    Json(session_view(&session))
}

async fn edit_table(
    State(state): State<Arc<AppState>>,
    Json(table): Json<Table>,
) -> Json<SessionView> {
    state.metrics.record_request();
    state.metrics.record_edit();
    let mut session = state.session.lock().await;

    session.edit(table);

    Json(session_view(&session))
}

async fn save_current(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SaveResponse>, StatusCode> {
    state.metrics.record_request();
    let mut session = state.session.lock().await;

    let outcome = session.save().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to append to cumulative output");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state.metrics.record_save(outcome.rows_appended);

    Ok(Json(SaveResponse {
        outcome,
        session: session_view(&session),
    }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
