//! Constants for the OI analytics backend.
//!
//! Contains backend machine addresses, endpoint paths, transport defaults and
//! the strike multiples offered by the strike filter. These are used
//! internally by [`ChainClient`](crate::client::ChainClient) and the
//! aggregator, but are also exported for advanced usage.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Backend machines
// ---------------------------------------------------------------------------

/// A named backend host serving the analytics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendMachine {
    /// Short machine label (e.g. `"M124"`).
    pub name: &'static str,
    /// Base URL of the machine's REST API.
    pub url: &'static str,
}

impl BackendMachine {
    /// Look a machine up by name, ignoring ASCII case.
    pub fn by_name(name: &str) -> Option<&'static BackendMachine> {
        BACKEND_MACHINES
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// All known backend machines. The first entry is the default.
pub const BACKEND_MACHINES: &[BackendMachine] = &[
    BackendMachine { name: "M124", url: "http://44.202.58.76:5000" },
    BackendMachine { name: "M123", url: "http://54.221.81.212:5000" },
    BackendMachine { name: "M122", url: "http://54.164.171.217:5000" },
    BackendMachine { name: "M125", url: "http://54.234.199.237:5000" },
];

/// Base URL used when no machine or URL is configured (`M124`).
pub const DEFAULT_BASE_URL: &str = "http://44.202.58.76:5000";

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("oichain-rs/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Endpoint paths
// ---------------------------------------------------------------------------

/// Endpoint paths of the analytics REST API.
pub mod endpoints {
    /// Instrument symbols with option-chain data.
    pub const SYMBOLS: &str = "/get_symbols";
    /// Expiries for a symbol.
    pub const EXPIRIES: &str = "/get_expiries";
    /// Trading dates for a symbol and expiry.
    pub const DATES: &str = "/get_dates";
    /// Intraday sample times for a symbol, expiry and date.
    pub const TIMES: &str = "/get_times";
    /// Per-contract records for a fully resolved tuple.
    pub const OPTION_CHAIN: &str = "/option_chain";
    /// Time series of a single strike.
    pub const STRIKE_HISTORY: &str = "/option_chain_by_strike_price";
}

// ---------------------------------------------------------------------------
// Strike filter
// ---------------------------------------------------------------------------

/// Strike multiples offered as quick filters.
pub const STRIKE_MULTIPLES: [u32; 3] = [100, 200, 500];
