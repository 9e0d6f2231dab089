use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use session::DashboardSession;

mod api;
mod datasets;

use datasets::RawDocuments;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub session: Arc<RwLock<DashboardSession>>,
    pub raw: Arc<RwLock<RawDocuments>>,
    pub http: reqwest::Client,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Path or http(s) URL of the concession polygons document.
    pub concessions_source: String,
    /// Path or http(s) URL of the ponds overlay document.
    pub ponds_source: String,
    /// Opaque CSV offered as a download; never parsed.
    pub csv_path: PathBuf,
    /// Base-map style credential. An empty key degrades the style URL but
    /// is not treated as an error.
    pub maptiler_key: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("DASH_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("invalid DASH_ADDR");

    let data_root = env::var("DATA_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    let config = ServerConfig {
        concessions_source: env_var_source(
            "CONCESSIONS_SOURCE",
            &data_root,
            "Indonesia_oil_palm_concessions.geojson",
        ),
        ponds_source: env_var_source(
            "PONDS_SOURCE",
            &data_root,
            "telangana_ponds_final_cleaned.geojson",
        ),
        csv_path: env::var("CONCESSIONS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_root.join("Indonesia_oil_palm_concessions.csv")),
        maptiler_key: env::var("MAPTILER_KEY").unwrap_or_default(),
    };

    let state = AppState {
        config: Arc::new(config),
        session: Arc::new(RwLock::new(DashboardSession::new())),
        raw: Arc::new(RwLock::new(RawDocuments::default())),
        http: reqwest::Client::new(),
    };

    // Both datasets load in parallel while the server is already up, so
    // /api/status reports the loading phase from the first request on.
    let loader_state = state.clone();
    tokio::spawn(async move {
        datasets::load_all(&loader_state).await;
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(api::healthz))
        .route("/api/status", get(api::get_status))
        .route("/api/retry", post(api::post_retry))
        .route("/api/summary", get(api::get_summary))
        .route(
            "/api/concessions/:index/display",
            get(api::get_concession_display),
        )
        .route("/api/map-style", get(api::get_map_style))
        .route(
            "/datasets/concessions.geojson",
            get(api::get_concessions_document),
        )
        .route("/datasets/ponds.geojson", get(api::get_ponds_document))
        .route("/datasets/concessions.csv", get(api::get_concessions_csv))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    info!("dashboard server listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn env_var_source(key: &str, data_root: &std::path::Path, file_name: &str) -> String {
    env::var(key).unwrap_or_else(|_| data_root.join(file_name).to_string_lossy().into_owned())
}
