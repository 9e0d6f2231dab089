use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use analysis::bundle_for_display;
use loading::{DatasetState, LoadPhase};
use session::DashboardSession;

use crate::datasets::{self, DatasetSlot};
use crate::AppState;

// Initial camera over Indonesia.
const INITIAL_LON_DEG: f64 = 117.9903;
const INITIAL_LAT_DEG: f64 = -2.5489;
const INITIAL_ZOOM: u32 = 5;

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

fn slot_status<T>(state: &DatasetState<T>) -> Value {
    match state {
        DatasetState::Pending => json!({ "state": "pending" }),
        DatasetState::Loaded(_) => json!({ "state": "loaded" }),
        DatasetState::Failed(err) => json!({ "state": "failed", "error": err.to_string() }),
    }
}

fn status_payload(session: &DashboardSession) -> Value {
    json!({
        "phase": session.phase().as_str(),
        "datasets": {
            (session::CONCESSIONS_SLOT): slot_status(session.load().first()),
            (session::PONDS_SLOT): slot_status(session.load().second()),
        }
    })
}

pub async fn get_status(State(state): State<AppState>) -> Json<Value> {
    let session = state.session.read().await;
    Json(status_payload(&session))
}

/// Resets every failed dataset slot and re-runs its load, then reports the
/// resulting status.
pub async fn post_retry(State(state): State<AppState>) -> Json<Value> {
    let reset = {
        let mut session = state.session.write().await;
        session.reset_failed()
    };

    for label in reset {
        if let Some(slot) = DatasetSlot::from_label(label) {
            datasets::load_slot(&state, slot).await;
        }
    }

    let session = state.session.read().await;
    Json(status_payload(&session))
}

/// The summary is served only once both datasets have loaded; before that
/// the status payload comes back with 503 so the client can tell "still
/// loading" from "failed".
pub async fn get_summary(State(state): State<AppState>) -> Response {
    let session = state.session.read().await;
    match session.summary() {
        Some(stats) => Json(stats).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, Json(status_payload(&session))).into_response(),
    }
}

pub async fn get_concession_display(
    State(state): State<AppState>,
    AxumPath(index): AxumPath<usize>,
) -> Response {
    let session = state.session.read().await;
    if session.phase() != LoadPhase::Ready {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status_payload(&session))).into_response();
    }
    let Some(concessions) = session.concessions() else {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status_payload(&session))).into_response();
    };

    let Some(feature) = concessions.features.get(index) else {
        return api_error(StatusCode::NOT_FOUND, "feature index out of range").into_response();
    };

    match bundle_for_display(feature) {
        Some(record) => Json(record).into_response(),
        // Malformed geometry is content absence, not a server fault.
        None => api_error(StatusCode::NOT_FOUND, "feature has no displayable geometry")
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    pub style_url: String,
    pub center: MapCenter,
    pub zoom: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

pub async fn get_map_style(State(state): State<AppState>) -> Json<MapStyle> {
    let key = state.config.maptiler_key.trim();
    let style_url = if key.is_empty() {
        "https://api.maptiler.com/maps/streets/style.json".to_string()
    } else {
        format!("https://api.maptiler.com/maps/streets/style.json?key={key}")
    };

    Json(MapStyle {
        style_url,
        center: MapCenter {
            lon_deg: INITIAL_LON_DEG,
            lat_deg: INITIAL_LAT_DEG,
        },
        zoom: INITIAL_ZOOM,
    })
}

pub async fn get_concessions_document(State(state): State<AppState>) -> Response {
    let raw = state.raw.read().await;
    serve_document(raw.concessions.as_deref(), session::CONCESSIONS_SLOT)
}

pub async fn get_ponds_document(State(state): State<AppState>) -> Response {
    let raw = state.raw.read().await;
    serve_document(raw.ponds.as_deref(), session::PONDS_SLOT)
}

fn serve_document(text: Option<&str>, label: &str) -> Response {
    match text {
        Some(text) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/geo+json"),
            );
            (StatusCode::OK, headers, Body::from(text.to_string())).into_response()
        }
        None => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{label} dataset not loaded"),
        )
        .into_response(),
    }
}

/// The CSV is an opaque byte stream handed out as a download; it is never
/// parsed or validated.
pub async fn get_concessions_csv(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&state.config.csv_path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv"),
            );
            headers.insert(
                http::header::CONTENT_DISPOSITION,
                HeaderValue::from_static(
                    "attachment; filename=\"Indonesia_oil_palm_concessions.csv\"",
                ),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            warn!("csv read failed: {:?} -> {err}", state.config.csv_path);
            api_error(StatusCode::NOT_FOUND, "csv not found").into_response()
        }
    }
}
