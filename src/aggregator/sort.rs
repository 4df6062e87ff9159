//! Column sorting over the flat record list.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::enums::SortDirection;
use crate::types::option_chain::ContractRecord;

// ---------------------------------------------------------------------------
// Sort Key
// ---------------------------------------------------------------------------

/// A sortable [`ContractRecord`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortKey {
    StrikePrice,
    OptionType,
    OptionPosition,
    Symbol,
    OpenInterest,
    ChangeInOpenInterest,
    TradeVolume,
    ChangeInTradeVolume,
    TotalBuyQuantity,
    ChangeInTotalBuyQuantity,
    TotalSellQuantity,
    ChangeInTotalSellQuantity,
    Ltp,
    ChangeInLtp,
    IndexLtp,
    ChangeInIndexLtp,
}

/// Raw value of a field, compared without any display formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl SortValue<'_> {
    /// Numbers order before text; incomparable numbers (NaN) compare equal.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl SortKey {
    /// Extract this field from a record.
    pub fn value_of<'a>(self, r: &'a ContractRecord) -> SortValue<'a> {
        use SortValue::{Number, Text};
        match self {
            Self::StrikePrice => match r.strike_price.value() {
                Some(v) => Number(v),
                None => Text(r.strike_price.as_str()),
            },
            Self::OptionType => Text(r.option_type.as_str()),
            Self::OptionPosition => Text(r.option_position.map_or("", |p| p.as_str())),
            Self::Symbol => Text(&r.symbol),
            Self::OpenInterest => Number(r.open_interest),
            Self::ChangeInOpenInterest => Number(r.change_in_open_interest),
            Self::TradeVolume => Number(r.trade_volume),
            Self::ChangeInTradeVolume => Number(r.change_in_trade_volume),
            Self::TotalBuyQuantity => Number(r.total_buy_quantity),
            Self::ChangeInTotalBuyQuantity => Number(r.change_in_total_buy_quantity),
            Self::TotalSellQuantity => Number(r.total_sell_quantity),
            Self::ChangeInTotalSellQuantity => Number(r.change_in_total_sell_quantity),
            Self::Ltp => Number(r.ltp),
            Self::ChangeInLtp => Number(r.change_in_ltp),
            Self::IndexLtp => Number(r.index_ltp),
            Self::ChangeInIndexLtp => Number(r.change_in_index_ltp),
        }
    }
}

// ---------------------------------------------------------------------------
// Sort Spec
// ---------------------------------------------------------------------------

/// Active column sort. `key == None` means arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Next spec after clicking `key`: the same key flips direction, a new
    /// key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self {
                key: self.key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key: Some(key),
                direction: SortDirection::Ascending,
            }
        }
    }

    /// Sort `records` in place. Ties keep no guaranteed order.
    pub fn apply(&self, records: &mut [ContractRecord]) {
        let Some(key) = self.key else {
            return;
        };
        records.sort_by(|a, b| {
            let ord = key.value_of(a).compare(&key.value_of(b));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}
