//! Grouping of flat contract records into strike-indexed CE/PE rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::enums::{OptionPosition, OptionType};
use crate::types::option_chain::{ContractRecord, StrikeKey};

/// Strike-indexed rows, iterated in ascending strike order.
pub type StrikeMap = BTreeMap<StrikeKey, StrikeRow>;

/// The call and put contracts sharing one strike.
///
/// Either side may be absent when the source omits that contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeRow {
    strike: StrikeKey,
    ce: Option<ContractRecord>,
    pe: Option<ContractRecord>,
}

impl StrikeRow {
    fn new(strike: StrikeKey) -> Self {
        Self {
            strike,
            ce: None,
            pe: None,
        }
    }

    pub fn strike(&self) -> &StrikeKey {
        &self.strike
    }

    pub fn call(&self) -> Option<&ContractRecord> {
        self.ce.as_ref()
    }

    pub fn put(&self) -> Option<&ContractRecord> {
        self.pe.as_ref()
    }

    /// The contract on one side of the row.
    pub fn side(&self, option_type: OptionType) -> Option<&ContractRecord> {
        match option_type {
            OptionType::CE => self.call(),
            OptionType::PE => self.put(),
        }
    }

    /// Both CE and PE present.
    pub fn is_complete(&self) -> bool {
        self.ce.is_some() && self.pe.is_some()
    }

    /// Moneyness of one side relative to `reference`.
    ///
    /// `None` when there is no reference price or the strike is not numeric;
    /// moneyness styling is suppressed in both cases.
    pub fn moneyness(&self, option_type: OptionType, reference: Option<f64>) -> Option<OptionPosition> {
        let strike = self.strike.value()?;
        Some(OptionPosition::derive(option_type, strike, reference?))
    }

    fn assign(&mut self, record: &ContractRecord) {
        let slot = match record.option_type {
            OptionType::CE => &mut self.ce,
            OptionType::PE => &mut self.pe,
        };
        if slot.is_some() {
            tracing::debug!(
                strike = %self.strike,
                side = %record.option_type,
                "duplicate contract record, keeping the later one"
            );
        }
        *slot = Some(record.clone());
    }
}

/// Group records by normalized strike in a single pass.
///
/// Duplicate `(strike, option_type)` records resolve last-write-wins in
/// iteration order.
pub fn group_records(records: &[ContractRecord]) -> StrikeMap {
    let mut rows = StrikeMap::new();
    for record in records {
        rows.entry(record.strike_price.clone())
            .or_insert_with_key(|key| StrikeRow::new(key.clone()))
            .assign(record);
    }
    rows
}

/// Underlying last traded price shared by a record collection.
///
/// `None` for an empty collection.
pub fn reference_price(records: &[ContractRecord]) -> Option<f64> {
    records.first().map(|r| r.index_ltp)
}
