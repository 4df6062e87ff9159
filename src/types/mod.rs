//! Request and response types for the OI analytics API.
//!
//! ## Organization
//!
//! - [`enums`] — Shared enumerations (option type, moneyness, chain levels)
//! - [`option_chain`] — Strike keys, contract records and list envelopes
//! - [`strike_history`] — Per-strike time series for the drill-down view
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod enums;
pub mod option_chain;
pub mod strike_history;

pub use enums::*;
