//! Explicit per-user session state.

use crate::filter::{apply_filter, Facets, FilterCriteria, FilteredView};
use crate::model::Dataset;
use crate::report::{build_report, DashboardReport, ReportOptions};
use std::sync::Arc;

/// A loaded dataset and the current filter selection.
///
/// Changing the selection produces a new session; the dataset is shared and
/// never modified.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    criteria: FilterCriteria,
}

impl Session {
    /// Starts a session with everything selected.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let criteria = FilterCriteria::everything(&dataset);
        Self { dataset, criteria }
    }

    /// Same dataset, different selection.
    #[must_use]
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            criteria,
        }
    }

    /// The shared dataset.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// The current selection.
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Filter widget facets of the whole dataset.
    pub fn facets(&self) -> Facets {
        Facets::of(&self.dataset)
    }

    /// The events matching the current selection.
    pub fn view(&self) -> FilteredView<'_> {
        apply_filter(&self.dataset, &self.criteria)
    }

    /// Builds the dashboard report for the current selection.
    pub fn report(&self, options: &ReportOptions) -> DashboardReport {
        build_report(&self.view(), options)
    }
}
