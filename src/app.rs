#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::chart::{ChartConfig, ChartController};
use crate::downloader;
use crate::graph::{ChartStyle, render_gpa_chart};
use crate::loader;
use crate::semester::SemesterRecord;

/// How often the server-side intro animation advances a frame.
const INTRO_TICK: Duration = Duration::from_millis(33);

pub struct AppState {
    chart: Mutex<ChartSession>,
}

/// One chart mount. Replacing the session (new snapshot, reset) rotates the
/// id, which orphans any intro task still holding the previous one.
struct ChartSession {
    id: Uuid,
    fetched_at: DateTime<Utc>,
    controller: ChartController,
    intro_task: Option<JoinHandle<()>>,
}

impl ChartSession {
    fn new(records: Vec<SemesterRecord>, fetched_at: DateTime<Utc>) -> Self {
        let mut controller = ChartController::new(records, ChartConfig::default());
        controller.on_data_change(|records| {
            log::debug!("chart data changed, republishing {} semesters", records.len());
        });
        ChartSession {
            id: Uuid::new_v4(),
            fetched_at,
            controller,
            intro_task: None,
        }
    }

    fn stop_intro_task(&mut self) {
        if let Some(task) = self.intro_task.take() {
            task.abort();
        }
    }
}

#[derive(Deserialize)]
struct PointerDownRequest {
    index: usize,
    y: f64,
}

#[derive(Deserialize)]
struct PointerMoveRequest {
    y: f64,
}

#[derive(Deserialize)]
struct BarDownRequest {
    index: usize,
    x: f64,
    width: f64,
}

#[derive(Deserialize)]
struct BarMoveRequest {
    x: f64,
    width: f64,
}

#[derive(Deserialize)]
struct WhatIfRequest {
    index: usize,
    sgpa: f64,
}

#[derive(Serialize)]
struct UpdateResponse {
    status: String,
    semesters: Option<Vec<SemesterRecord>>,
}

#[derive(Deserialize)]
struct ChartQuery {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

pub async fn run(snapshot_path: Option<PathBuf>, addr: &str) -> Result<(), Box<dyn Error>> {
    let (records, fetched_at) = match snapshot_path {
        Some(path) => {
            let snapshot = loader::from_json_file(&path)?;
            log::info!(
                "loaded {} semesters from {}",
                snapshot.records.len(),
                path.display()
            );
            (snapshot.records, snapshot.fetched_at)
        }
        None => {
            log::info!("no snapshot file given, serving the example dataset");
            (loader::example_semesters(), Utc::now())
        }
    };

    // Setup app state
    let app_state = Arc::new(AppState {
        chart: Mutex::new(ChartSession::new(records, fetched_at)),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/semesters", get(get_semesters))
        .route("/api/chart/intro", post(start_intro))
        .route("/api/chart/pointer_down", post(pointer_down))
        .route("/api/chart/pointer_move", post(pointer_move))
        .route("/api/chart/pointer_up", post(pointer_up))
        .route("/api/chart/bar_down", post(bar_down))
        .route("/api/chart/bar_move", post(bar_move))
        .route("/api/whatif", post(what_if))
        .route("/api/reset", post(reset_chart))
        .route("/api/chart.png", get(chart_png))
        .route("/api/export/csv", get(export_csv))
        .route("/api/export/xlsx", get(export_xlsx))
        .route("/api/load", post(load_snapshot))
        .nest_service("/static", ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(ConcurrencyLimitLayer::new(64))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn get_semesters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.chart.lock().unwrap();

    Json(serde_json::json!({
        "status": "ok",
        "session": session.id,
        "fetched_at": session.fetched_at,
        "intro_pending": session.controller.is_intro_scheduled(),
        "intro_playing": session.controller.is_intro_playing(),
        "semesters": session.controller.data(),
    }))
}

/// Arms the intro animation and spawns the tick loop that drives it. The
/// loop stops on its own once the controller reports the intro done, when
/// the session id rotates, or when the task handle is aborted.
async fn start_intro(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.chart.lock().unwrap();
    session.stop_intro_task();
    session.controller.schedule_intro(Instant::now());

    let session_id = session.id;
    let task_state = Arc::clone(&state);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(INTRO_TICK);
        loop {
            ticker.tick().await;
            let done = {
                let mut session = task_state.chart.lock().unwrap();
                session.id != session_id || !session.controller.tick(Instant::now())
            };
            if done {
                break;
            }
        }
    });
    session.intro_task = Some(task);

    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}

async fn pointer_down(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PointerDownRequest>,
) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    let accepted = session.controller.pointer_down(payload.index, payload.y);
    update_response(accepted, &session)
}

async fn pointer_move(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PointerMoveRequest>,
) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    let accepted = session.controller.pointer_move(payload.y);
    update_response(accepted, &session)
}

async fn pointer_up(State(state): State<Arc<AppState>>) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    session.controller.pointer_up();
    update_response(true, &session)
}

async fn bar_down(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BarDownRequest>,
) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    let accepted = session
        .controller
        .bar_pointer_down(payload.index, payload.x, payload.width);
    update_response(accepted, &session)
}

async fn bar_move(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BarMoveRequest>,
) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    let accepted = session.controller.bar_pointer_move(payload.x, payload.width);
    update_response(accepted, &session)
}

async fn what_if(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WhatIfRequest>,
) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    let accepted = session.controller.set_sgpa(payload.index, payload.sgpa);
    update_response(accepted, &session)
}

async fn reset_chart(State(state): State<Arc<AppState>>) -> Json<UpdateResponse> {
    let mut session = state.chart.lock().unwrap();
    session.stop_intro_task();
    session.controller.reset_to_original();
    update_response(true, &session)
}

fn update_response(accepted: bool, session: &ChartSession) -> Json<UpdateResponse> {
    Json(UpdateResponse {
        status: if accepted { "ok" } else { "rejected" }.to_string(),
        semesters: accepted.then(|| session.controller.snapshot()),
    })
}

async fn chart_png(
    Query(params): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    // render outside the lock; only the snapshot needs it
    let records = {
        let session = state.chart.lock().unwrap();
        session.controller.snapshot()
    };

    let style = ChartStyle {
        width: params.width.unwrap_or(800),
        height: params.height.unwrap_or(600),
        ..ChartStyle::default()
    };

    match render_gpa_chart(&records, &style) {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(png))
            .unwrap(),
        Err(e) => error_response(e),
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let records = {
        let session = state.chart.lock().unwrap();
        session.controller.snapshot()
    };

    match downloader::to_csv(&records) {
        Ok(csv) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/csv")
            .header(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"semesters.csv\"",
            )
            .body(Body::from(csv))
            .unwrap(),
        Err(e) => error_response(e),
    }
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let records = {
        let session = state.chart.lock().unwrap();
        session.controller.snapshot()
    };

    match downloader::to_xlsx(&records) {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            )
            .header(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"semesters.xlsx\"",
            )
            .body(Body::from(bytes))
            .unwrap(),
        Err(e) => error_response(e),
    }
}

/// Replaces the whole session with a freshly captured portal payload. Any
/// in-flight intro animation for the old session is stopped.
async fn load_snapshot(State(state): State<Arc<AppState>>, body: String) -> Json<StatusResponse> {
    match loader::records_from_json(&body) {
        Ok(records) => {
            let count = records.len();
            let mut session = state.chart.lock().unwrap();
            session.stop_intro_task();
            *session = ChartSession::new(records, Utc::now());
            log::info!("snapshot replaced, {count} semesters loaded");
            Json(StatusResponse {
                status: "ok".to_string(),
                message: Some(format!("{count} semesters loaded")),
            })
        }
        Err(e) => Json(StatusResponse {
            status: "error".to_string(),
            message: Some(e.to_string()),
        }),
    }
}

fn error_response(e: Box<dyn Error>) -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_string(&StatusResponse {
                status: "error".to_string(),
                message: Some(e.to_string()),
            })
            .unwrap(),
        ))
        .unwrap()
}
