//! Shared enum types for option-chain records and the parameter chain.
//!
//! Wire enums use the backend's upper-case string values (`CE`, `ITM`, ...)
//! as variant names, so we suppress the Rust naming convention lint.
#![allow(non_camel_case_types)]

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Option Type
// ---------------------------------------------------------------------------

/// Call or put side of an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option.
    CE,
    /// Put option.
    PE,
}

impl OptionType {
    /// The wire string (`"CE"` / `"PE"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CE => "CE",
            Self::PE => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Option Position
// ---------------------------------------------------------------------------

/// Moneyness of a contract relative to the underlying last traded price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionPosition {
    /// In the money.
    ITM,
    /// Out of the money.
    OTM,
}

impl OptionPosition {
    /// Derive moneyness from strike and underlying price.
    ///
    /// A call is ITM when the strike is below the underlying; a put when it
    /// is above. At-the-money counts as OTM for both sides.
    pub fn derive(option_type: OptionType, strike: f64, underlying: f64) -> Self {
        let itm = match option_type {
            OptionType::CE => strike < underlying,
            OptionType::PE => strike > underlying,
        };
        if itm { Self::ITM } else { Self::OTM }
    }

    /// The wire string (`"ITM"` / `"OTM"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ITM => "ITM",
            Self::OTM => "OTM",
        }
    }
}

impl fmt::Display for OptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// One level of the dependent parameter chain, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Symbol,
    Expiry,
    Date,
    Time,
}

impl Level {
    /// All levels, upstream first.
    pub const ALL: [Level; 4] = [Level::Symbol, Level::Expiry, Level::Date, Level::Time];

    /// Position of the level in the chain (`Symbol` = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The level fed by this one, if any.
    pub fn next(self) -> Option<Level> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Lower-case name, used in logs and query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Expiry => "expiry",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Level Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a single chain level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LevelStatus {
    /// No upstream selection yet (or invalidated by an upstream change).
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// Live candidates populated.
    Ready,
    /// Fetch failed; fallback candidates substituted.
    Degraded,
}

impl LevelStatus {
    /// `Ready` or `Degraded`.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Degraded)
    }
}

// ---------------------------------------------------------------------------
// Data Source
// ---------------------------------------------------------------------------

/// Where a piece of displayed data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataOrigin {
    /// Returned by the backend.
    Live,
    /// Substituted by the fallback provider after a failure.
    Fallback,
}

// ---------------------------------------------------------------------------
// Sort Direction
// ---------------------------------------------------------------------------

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Sign of a "change since previous sample" field, for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Classify a change value.
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}
