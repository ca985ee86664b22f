use std::path::{Path, PathBuf};

use crate::color::ColorScale;
use crate::config::DashboardConfig;
use crate::data::aggregate::Aggregates;
use crate::data::error::DataError;
use crate::data::filter::{filter_view, FilterDomain, FilterStore, FilteredView};
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Dimension, FilterValue, Record};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Where `dataset` came from, for Reload.
    pub source_path: Option<PathBuf>,

    /// Domain and selection for the four filter dimensions.
    pub filters: FilterStore,

    /// Records passing the current filters, as of the last pass.
    pub view: FilteredView,

    /// KPIs and chart series for `view`.
    pub aggregates: Aggregates,

    /// Continuous colour scale shared by the charts.
    pub color_scale: ColorScale,

    /// Non-fatal notice (e.g. empty dataset) shown in the top bar.
    pub status_message: Option<String>,

    /// A failed load. Replaces the whole dashboard until the next load.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source_path: None,
            filters: FilterStore::new(),
            view: FilteredView::default(),
            aggregates: Aggregates::default(),
            color_scale: ColorScale::default(),
            status_message: None,
            load_error: None,
        }
    }

    /// Load a file and start a fresh filter generation for it.
    ///
    /// The path becomes the reload target even when loading it fails.
    pub fn open(&mut self, path: &Path) {
        self.source_path = Some(path.to_path_buf());
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.fail_load(path, &e),
        }
    }

    /// Re-read the current file, keeping whatever the user still can select.
    pub fn reload(&mut self) {
        let Some(path) = self.source_path.clone() else {
            return;
        };
        match load_file(&path) {
            Ok(dataset) => {
                let domain = self.extract_domain(&dataset);
                self.filters.rebase(domain);
                self.dataset = Some(dataset);
                self.load_error = None;
                self.recompute();
            }
            Err(e) => self.fail_load(&path, &e),
        }
    }

    /// Ingest a newly loaded dataset: derive the domain, select everything.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let domain = self.extract_domain(&dataset);
        self.filters.initialize(domain);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.recompute();
    }

    fn extract_domain(&mut self, dataset: &Dataset) -> FilterDomain {
        match FilterDomain::extract(dataset) {
            Ok(domain) => {
                self.status_message = None;
                domain
            }
            Err(e) => {
                log::warn!("{e}");
                self.status_message = Some(format!("Warning: {e}"));
                FilterDomain::default()
            }
        }
    }

    fn fail_load(&mut self, path: &Path, err: &DataError) {
        log::error!("Failed to load {}: {err}", path.display());
        self.dataset = None;
        self.view = FilteredView::default();
        self.aggregates = Aggregates::default();
        self.status_message = None;
        self.load_error = Some(format!("Could not load {}: {err}", path.display()));
    }

    /// One full pass: current selection → filtered view → aggregates.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.view = FilteredView::default();
            self.aggregates = Aggregates::default();
            return;
        };
        self.view = filter_view(dataset, self.filters.selection());
        let records = self.view.records(dataset);
        self.aggregates = Aggregates::compute(&records, &self.config.aggregate_settings());
        log::debug!(
            "Recomputed view: {} of {} records",
            self.view.len(),
            dataset.len()
        );
    }

    /// Records of the current view, for the table and exports.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.dataset
            .as_ref()
            .map(|ds| self.view.records(ds))
            .unwrap_or_default()
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &FilterValue) {
        self.filters.toggle(dimension, value);
        self.recompute();
    }

    /// Select every value of one dimension.
    pub fn select_dimension(&mut self, dimension: Dimension) {
        let all = self.filters.domain().get(dimension).clone();
        self.filters.update(dimension, all);
        self.recompute();
    }

    /// Deselect every value of one dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.filters.select_none(dimension);
        self.recompute();
    }

    /// The "select all filters" quick action.
    pub fn select_all(&mut self) {
        self.filters.select_all();
        self.recompute();
    }
}
