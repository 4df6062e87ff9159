//! The displayable option chain for one resolved tuple.

use crate::aggregator::filter::StrikeFilter;
use crate::aggregator::grouping::{StrikeMap, StrikeRow, group_records, reference_price};
use crate::aggregator::sort::{SortKey, SortSpec};
use crate::error::Result;
use crate::types::enums::DataOrigin;
use crate::types::option_chain::{ContractRecord, ResolvedTuple, StrikeKey};

/// Grouped, filterable, sortable option chain for a single resolved tuple.
///
/// Built once per tuple; a new tuple gets a new view rather than patching
/// this one. Rows are grouped in arrival order when the view is built, so
/// column sorting reorders [`records`](Self::records) but never regroups.
#[derive(Debug, Clone)]
pub struct OptionChainView {
    tuple: ResolvedTuple,
    origin: DataOrigin,
    records: Vec<ContractRecord>,
    rows: StrikeMap,
    filter: StrikeFilter,
    sort: SortSpec,
    reference_price: Option<f64>,
}

impl OptionChainView {
    /// Group `records` and select every strike.
    pub fn new(tuple: ResolvedTuple, records: Vec<ContractRecord>, origin: DataOrigin) -> Self {
        let rows = group_records(&records);
        let filter = StrikeFilter::new(rows.keys().cloned());
        let reference_price = reference_price(&records);
        tracing::info!(
            %tuple,
            records = records.len(),
            strikes = rows.len(),
            ?origin,
            "option chain view built"
        );
        Self {
            tuple,
            origin,
            records,
            rows,
            filter,
            sort: SortSpec::default(),
            reference_price,
        }
    }

    pub fn tuple(&self) -> &ResolvedTuple {
        &self.tuple
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    /// Whether the records are fallback data.
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    /// No records for this selection. This is an empty state, not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row, ascending by strike.
    pub fn rows(&self) -> &StrikeMap {
        &self.rows
    }

    pub fn row(&self, strike: &StrikeKey) -> Option<&StrikeRow> {
        self.rows.get(strike)
    }

    /// Rows selected by the strike filter, ascending by strike.
    pub fn visible_rows(&self) -> impl Iterator<Item = &StrikeRow> {
        self.rows
            .iter()
            .filter(|(k, _)| self.filter.contains(k))
            .map(|(_, row)| row)
    }

    /// The flat record list in the current sort order.
    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    /// Underlying price shared by the records; `None` when empty.
    pub fn reference_price(&self) -> Option<f64> {
        self.reference_price
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    /// Click a column: update the sort spec and reorder the flat list.
    pub fn sort_by(&mut self, key: SortKey) -> SortSpec {
        self.sort = self.sort.toggle(key);
        self.sort.apply(&mut self.records);
        self.sort
    }

    pub fn filter(&self) -> &StrikeFilter {
        &self.filter
    }

    pub fn select_all_strikes(&mut self) {
        self.filter.select_all();
    }

    pub fn select_multiples_of(&mut self, n: u32) -> Result<()> {
        self.filter.select_multiples_of(n)
    }

    pub fn toggle_strike(&mut self, strike: &StrikeKey) {
        self.filter.toggle(strike);
    }
}
