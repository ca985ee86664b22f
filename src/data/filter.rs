use std::collections::{BTreeSet, HashSet};

use super::error::{DataError, Result};
use super::model::{Dataset, Dimension, FilterKey, FilterValue, Record};

// ---------------------------------------------------------------------------
// FilterDomain: which values each dimension can offer
// ---------------------------------------------------------------------------

/// For every dimension, the sorted set of distinct values in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDomain {
    values: [BTreeSet<FilterValue>; 4],
}

impl FilterDomain {
    /// Collect the distinct values of each dimension.
    ///
    /// Fails with [`DataError::EmptyDataset`] when there is nothing to offer;
    /// callers fall back to [`FilterDomain::default`] (all domains empty).
    pub fn extract(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        let mut keys: [BTreeSet<FilterKey<'_>>; 4] = Default::default();
        for record in &dataset.records {
            for dim in Dimension::ALL {
                keys[dim.index()].insert(record.key(dim));
            }
        }
        let values = keys.map(|set| set.into_iter().map(FilterKey::to_value).collect());
        Ok(FilterDomain { values })
    }

    /// Sorted domain of one dimension.
    pub fn get(&self, dimension: Dimension) -> &BTreeSet<FilterValue> {
        &self.values[dimension.index()]
    }

    pub fn contains(&self, dimension: Dimension, value: &FilterValue) -> bool {
        self.get(dimension).contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(BTreeSet::is_empty)
    }
}

// ---------------------------------------------------------------------------
// FilterSelection: which values are currently chosen
// ---------------------------------------------------------------------------

/// The chosen values per dimension. An empty set for a dimension means
/// nothing is chosen there, so no record can match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    values: [BTreeSet<FilterValue>; 4],
}

impl FilterSelection {
    /// Every domain value chosen in every dimension.
    pub fn full(domain: &FilterDomain) -> Self {
        FilterSelection {
            values: domain.values.clone(),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &BTreeSet<FilterValue> {
        &self.values[dimension.index()]
    }

    pub(crate) fn set(&mut self, dimension: Dimension, values: BTreeSet<FilterValue>) {
        self.values[dimension.index()] = values;
    }

    fn get_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<FilterValue> {
        &mut self.values[dimension.index()]
    }
}

// ---------------------------------------------------------------------------
// FilterStore: sole owner of the mutable selection
// ---------------------------------------------------------------------------

/// Holds the current domain and the user's selection across recomputation
/// passes. The selection is only reachable mutably through these methods,
/// which keep it a subset of the domain.
#[derive(Debug, Default)]
pub struct FilterStore {
    domain: FilterDomain,
    selection: FilterSelection,
    initialized: bool,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a domain generation with everything selected.
    ///
    /// Calling again with an identical domain keeps the current selection.
    pub fn initialize(&mut self, domain: FilterDomain) -> &FilterSelection {
        if self.initialized && self.domain == domain {
            return &self.selection;
        }
        self.selection = FilterSelection::full(&domain);
        self.domain = domain;
        self.initialized = true;
        &self.selection
    }

    /// Swap in a new domain (dataset reload) while keeping the user's choices.
    ///
    /// Values that left the domain are pruned. A dimension that had its whole
    /// old domain selected stays fully selected under the new one.
    pub fn rebase(&mut self, domain: FilterDomain) -> &FilterSelection {
        if !self.initialized {
            return self.initialize(domain);
        }
        for dim in Dimension::ALL {
            let was_full = self.selection.get(dim) == self.domain.get(dim);
            let next = if was_full {
                domain.get(dim).clone()
            } else {
                self.selection
                    .get(dim)
                    .intersection(domain.get(dim))
                    .cloned()
                    .collect()
            };
            self.selection.set(dim, next);
        }
        self.domain = domain;
        &self.selection
    }

    /// Replace one dimension's selection. Values outside the domain are
    /// dropped without error.
    pub fn update<I>(&mut self, dimension: Dimension, values: I) -> &FilterSelection
    where
        I: IntoIterator<Item = FilterValue>,
    {
        let domain = self.domain.get(dimension);
        let (kept, dropped): (BTreeSet<FilterValue>, BTreeSet<FilterValue>) =
            values.into_iter().partition(|v| domain.contains(v));
        if !dropped.is_empty() {
            log::debug!("{dimension}: ignoring out-of-domain values {dropped:?}");
        }
        self.selection.set(dimension, kept);
        &self.selection
    }

    /// Flip one value in or out of a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &FilterValue) -> &FilterSelection {
        if !self.domain.contains(dimension, value) {
            log::debug!("{dimension}: ignoring toggle of out-of-domain value {value}");
            return &self.selection;
        }
        let selected = self.selection.get_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        &self.selection
    }

    /// Bulk action: every dimension back to its full domain in one assignment.
    pub fn select_all(&mut self) -> &FilterSelection {
        self.selection = FilterSelection::full(&self.domain);
        &self.selection
    }

    /// Clear one dimension.
    pub fn select_none(&mut self, dimension: Dimension) -> &FilterSelection {
        self.update(dimension, std::iter::empty())
    }

    pub fn domain(&self) -> &FilterDomain {
        &self.domain
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }
}

// ---------------------------------------------------------------------------
// View filter
// ---------------------------------------------------------------------------

/// Indices of the records that pass the selection, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub indices: Vec<usize>,
}

impl FilteredView {
    /// Resolve the indices against the dataset they were computed from.
    pub fn records<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Record> {
        self.indices
            .iter()
            .filter_map(|&i| dataset.records.get(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the records that pass all four dimension filters.
///
/// A record passes when, for every dimension, its value is one of the
/// selected values. An empty selection in any dimension therefore yields an
/// empty view.
pub fn filter_view(dataset: &Dataset, selection: &FilterSelection) -> FilteredView {
    if Dimension::ALL
        .iter()
        .any(|&dim| selection.get(dim).is_empty())
    {
        return FilteredView::default();
    }

    let masks: Vec<HashSet<FilterKey<'_>>> = Dimension::ALL
        .iter()
        .map(|&dim| selection.get(dim).iter().map(FilterValue::as_key).collect())
        .collect();

    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            Dimension::ALL
                .iter()
                .all(|&dim| masks[dim.index()].contains(&record.key(dim)))
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { indices }
}
