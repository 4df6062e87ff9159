//! Option-chain aggregation.
//!
//! Turns the flat [`ContractRecord`](crate::types::option_chain::ContractRecord)
//! list of one resolved tuple into strike-indexed CE/PE rows, with a strike
//! filter and a column sort on top.
//!
//! - [`grouping`] — [`StrikeRow`] and the single-pass grouping
//! - [`filter`] — [`StrikeFilter`] set operations
//! - [`sort`] — [`SortSpec`] and sortable fields
//! - [`view`] — [`OptionChainView`], the per-tuple aggregate

pub mod filter;
pub mod grouping;
pub mod sort;
pub mod view;

pub use filter::StrikeFilter;
pub use grouping::{StrikeMap, StrikeRow, group_records, reference_price};
pub use sort::{SortKey, SortSpec, SortValue};
pub use view::OptionChainView;
