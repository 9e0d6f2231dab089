use geodata::FeatureCollection;
use loading::LoadError;
use tracing::{error, info};

use crate::AppState;

/// Cap on a fetched dataset body.
const MAX_BYTES: usize = 64 * 1024 * 1024;

/// The raw upstream document text per dataset, kept verbatim so the
/// overlay endpoints serve exactly the bytes the upstream produced.
#[derive(Debug, Default)]
pub struct RawDocuments {
    pub concessions: Option<String>,
    pub ponds: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSlot {
    Concessions,
    Ponds,
}

impl DatasetSlot {
    pub fn label(self) -> &'static str {
        match self {
            DatasetSlot::Concessions => session::CONCESSIONS_SLOT,
            DatasetSlot::Ponds => session::PONDS_SLOT,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            session::CONCESSIONS_SLOT => Some(DatasetSlot::Concessions),
            session::PONDS_SLOT => Some(DatasetSlot::Ponds),
            _ => None,
        }
    }

    fn source(self, state: &AppState) -> &str {
        match self {
            DatasetSlot::Concessions => &state.config.concessions_source,
            DatasetSlot::Ponds => &state.config.ponds_source,
        }
    }
}

/// Startup load of both datasets, issued together and joined.
pub async fn load_all(state: &AppState) {
    let (concessions, ponds) = tokio::join!(
        load_source(state, DatasetSlot::Concessions),
        load_source(state, DatasetSlot::Ponds),
    );
    record(state, DatasetSlot::Concessions, concessions).await;
    record(state, DatasetSlot::Ponds, ponds).await;
}

/// Re-runs one slot's load after a retry reset.
pub async fn load_slot(state: &AppState, slot: DatasetSlot) {
    let outcome = load_source(state, slot).await;
    record(state, slot, outcome).await;
}

async fn record(
    state: &AppState,
    slot: DatasetSlot,
    outcome: Result<(String, FeatureCollection), LoadError>,
) {
    let mut session = state.session.write().await;
    let mut raw = state.raw.write().await;
    match outcome {
        Ok((text, collection)) => {
            info!(
                "{} dataset loaded: {} features",
                slot.label(),
                collection.features.len()
            );
            match slot {
                DatasetSlot::Concessions => {
                    raw.concessions = Some(text);
                    session.concessions_loaded(collection);
                }
                DatasetSlot::Ponds => {
                    raw.ponds = Some(text);
                    session.ponds_loaded(collection);
                }
            }
        }
        Err(err) => {
            error!("{} dataset load failed: {err}", slot.label());
            match slot {
                DatasetSlot::Concessions => session.concessions_failed(err),
                DatasetSlot::Ponds => session.ponds_failed(err),
            }
        }
    }
}

async fn load_source(
    state: &AppState,
    slot: DatasetSlot,
) -> Result<(String, FeatureCollection), LoadError> {
    let source = slot.source(state);
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_text(&state.http, source).await?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| LoadError::Fetch(format!("{source}: {e}")))?
    };

    let collection =
        FeatureCollection::from_geojson_str(&text).map_err(|e| LoadError::Decode(e.to_string()))?;
    Ok((text, collection))
}

async fn fetch_text(http: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(LoadError::Status(resp.status().as_u16()));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;

    if bytes.len() > MAX_BYTES {
        return Err(LoadError::Fetch(format!(
            "payload too large (max {MAX_BYTES} bytes)"
        )));
    }

    String::from_utf8(bytes.to_vec())
        .map_err(|_| LoadError::Decode("response was not valid UTF-8".to_string()))
}
