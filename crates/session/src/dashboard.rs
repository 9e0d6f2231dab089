use analysis::{SummaryStats, bundle_for_display, summarize};
use geodata::{FeatureCollection, GeoFeature};
use loading::{DualLoad, LoadError, LoadPhase};

use crate::selection::Selection;

pub const CONCESSIONS_SLOT: &str = "concessions";
pub const PONDS_SLOT: &str = "ponds";

/// One page session of the dashboard.
///
/// Owns the dual load of the concession and pond collections, the popup
/// selection, and the summary. The summary is derived from the concession
/// collection alone (ponds are overlay-only) and only at the transition
/// where both slots become loaded, so nothing can read an aggregate while
/// either dataset is still in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSession {
    load: DualLoad<FeatureCollection, FeatureCollection>,
    selection: Selection,
    summary: Option<SummaryStats>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            load: DualLoad::new(CONCESSIONS_SLOT, PONDS_SLOT),
            selection: Selection::new(),
            summary: None,
        }
    }

    pub fn load(&self) -> &DualLoad<FeatureCollection, FeatureCollection> {
        &self.load
    }

    pub fn phase(&self) -> LoadPhase {
        self.load.phase()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn summary(&self) -> Option<&SummaryStats> {
        self.summary.as_ref()
    }

    pub fn concessions(&self) -> Option<&FeatureCollection> {
        self.load.first().value()
    }

    pub fn ponds(&self) -> Option<&FeatureCollection> {
        self.load.second().value()
    }

    pub fn concessions_loaded(&mut self, collection: FeatureCollection) {
        self.load.first_mut().complete(collection);
        self.derive_summary_if_ready();
    }

    pub fn concessions_failed(&mut self, error: LoadError) {
        self.load.first_mut().fail(error);
    }

    pub fn ponds_loaded(&mut self, collection: FeatureCollection) {
        self.load.second_mut().complete(collection);
        self.derive_summary_if_ready();
    }

    pub fn ponds_failed(&mut self, error: LoadError) {
        self.load.second_mut().fail(error);
    }

    /// Resets failed slots for a retry, returning their labels.
    ///
    /// The summary and selection are dropped with them: both are derived
    /// from loaded data and come back once the session is ready again.
    pub fn reset_failed(&mut self) -> Vec<&'static str> {
        let reset = self.load.reset_failed();
        if !reset.is_empty() {
            self.summary = None;
            self.selection.clear();
        }
        reset
    }

    /// Pointer entered a concession. Malformed features, and any interaction
    /// before the session is ready, are silently ignored.
    pub fn hover(&mut self, feature: &GeoFeature) {
        if self.phase() != LoadPhase::Ready {
            return;
        }
        if let Some(record) = bundle_for_display(feature) {
            self.selection.hover_enter(record);
        }
    }

    pub fn hover_leave(&mut self) {
        self.selection.hover_leave();
    }

    /// Click pins a popup; same silent-skip rules as [`Self::hover`].
    pub fn click(&mut self, feature: &GeoFeature) {
        if self.phase() != LoadPhase::Ready {
            return;
        }
        if let Some(record) = bundle_for_display(feature) {
            self.selection.pin(record);
        }
    }

    pub fn dismiss(&mut self) {
        self.selection.dismiss();
    }

    fn derive_summary_if_ready(&mut self) {
        if self.summary.is_some() || self.phase() != LoadPhase::Ready {
            return;
        }
        self.summary = self.concessions().map(summarize);
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}
