//! One render cycle: resolve the selection once, then derive every view from
//! that single subset.

use crate::analyzers::aggregate::{DEFAULT_HISTOGRAM_BINS, aggregate_with_bins};
use crate::analyzers::summary::summarize;
use crate::analyzers::types::{AggregateViews, Summary};
use crate::filter::{FilterSelection, resolve};
use crate::record::Dataset;
use crate::suggest::SuggestionIndex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Everything the rendering layer needs for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    /// The selection matched nothing and the full dataset is shown instead.
    pub fell_back: bool,
    pub row_count: usize,
    pub summary: Summary,
    pub views: AggregateViews,
}

/// Shared, read-only dashboard state over one dataset.
///
/// Cheap to clone; per-request state lives only in the arguments to
/// [`Dashboard::render`].
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    suggestions: Arc<SuggestionIndex>,
    histogram_bins: usize,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let suggestions = Arc::new(SuggestionIndex::from_dataset(&dataset));
        Self {
            dataset,
            suggestions,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn suggestions(&self) -> &SuggestionIndex {
        &self.suggestions
    }

    #[tracing::instrument(skip(self))]
    pub fn render(&self, selection: &FilterSelection) -> DashboardSnapshot {
        let (subset, fell_back) = resolve(&self.dataset, selection);

        let summary = summarize(&subset);
        let views = aggregate_with_bins(&subset, self.histogram_bins);

        debug!(
            rows = subset.len(),
            fell_back,
            total_trips = summary.total_trips,
            "Render cycle complete"
        );

        DashboardSnapshot {
            selection: selection.clone(),
            fell_back,
            row_count: subset.len(),
            summary,
            views,
        }
    }
}
