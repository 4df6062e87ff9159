//! Substitute data shown when a lookup fails.
//!
//! Fallback data only keeps the dashboard populated; it is never preferred
//! over a live response. [`DemoFallback`] is deterministic: the same inputs
//! always produce the same output.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::types::enums::{Level, OptionPosition, OptionType};
use crate::types::option_chain::{ContractRecord, ResolvedTuple, StrikeKey};
use crate::types::strike_history::StrikeSnapshot;

/// Supplies a same-shaped substitute for every failed lookup.
pub trait FallbackDataProvider: Send + Sync + 'static {
    /// Non-empty substitute candidates for `level`.
    fn candidates(&self, level: Level, upstream: &[String]) -> Vec<String>;

    /// Substitute contract records for a resolved tuple.
    fn contract_records(&self, tuple: &ResolvedTuple) -> Vec<ContractRecord>;

    /// Substitute time series for one strike, most recent first.
    fn strike_history(&self, symbol: &str, expiry: &str, strike: &StrikeKey) -> Vec<StrikeSnapshot>;
}

// ---------------------------------------------------------------------------
// Demo data
// ---------------------------------------------------------------------------

const DEMO_SYMBOLS: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY"];
const DEMO_EXPIRIES: &[&str] = &["06MAR2025", "13MAR2025", "27MAR2025"];
/// Most recent first.
const DEMO_DATES: &[&str] = &["20250304", "20250303", "20250302", "20250301", "20250228"];

/// Strikes on each side of the at-the-money strike.
const STRIKES_EACH_SIDE: i64 = 10;
/// Samples in a strike-history series.
const HISTORY_SAMPLES: i64 = 10;
const HISTORY_SPACING_MINUTES: i64 = 30;

/// Deterministic demo data shaped like the live payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoFallback;

impl DemoFallback {
    /// Intraday sample times, 09:15 to 15:30 every 15 minutes.
    fn times() -> Vec<String> {
        (0..26)
            .map(|i| {
                let minutes = 9 * 60 + 15 + i * 15;
                format!("{:02}:{:02}", minutes / 60, minutes % 60)
            })
            .collect()
    }

    /// Spot level and strike step for a symbol.
    fn profile(symbol: &str) -> (f64, f64) {
        match symbol {
            "NIFTY" => (22_400.0, 50.0),
            "BANKNIFTY" => (48_000.0, 100.0),
            "FINNIFTY" => (23_500.0, 50.0),
            _ => (1_000.0, 10.0),
        }
    }

    /// Small deterministic wobble in `[-1, 1]` derived from a seed.
    fn wobble(seed: i64) -> f64 {
        ((seed * 37 + 11).rem_euclid(21) - 10) as f64 / 10.0
    }
}

impl FallbackDataProvider for DemoFallback {
    fn candidates(&self, level: Level, _upstream: &[String]) -> Vec<String> {
        let owned = |v: &[&str]| v.iter().map(|s| (*s).to_owned()).collect();
        match level {
            Level::Symbol => owned(DEMO_SYMBOLS),
            Level::Expiry => owned(DEMO_EXPIRIES),
            Level::Date => owned(DEMO_DATES),
            Level::Time => Self::times(),
        }
    }

    fn contract_records(&self, tuple: &ResolvedTuple) -> Vec<ContractRecord> {
        let (spot, step) = Self::profile(&tuple.symbol);
        let underlying = spot + step / 4.0;
        let mut records = Vec::with_capacity((STRIKES_EACH_SIDE as usize * 2 + 1) * 2);
        for i in -STRIKES_EACH_SIDE..=STRIKES_EACH_SIDE {
            let strike = spot + i as f64 * step;
            for option_type in [OptionType::CE, OptionType::PE] {
                records.push(demo_record(
                    &tuple.symbol,
                    &tuple.expiry,
                    strike,
                    option_type,
                    underlying,
                    i,
                ));
            }
        }
        records
    }

    fn strike_history(&self, symbol: &str, expiry: &str, strike: &StrikeKey) -> Vec<StrikeSnapshot> {
        let (spot, step) = Self::profile(symbol);
        let strike_value = strike.value().unwrap_or(spot);
        let anchor = demo_anchor();
        (0..HISTORY_SAMPLES)
            .map(|i| {
                let at = anchor - Duration::minutes(i * HISTORY_SPACING_MINUTES);
                let underlying = strike_value + Self::wobble(i) * 2.0 * step;
                let offset = ((strike_value - spot) / step).round() as i64;
                let seed = offset + i;
                let mut ce = demo_record(symbol, expiry, strike_value, OptionType::CE, underlying, seed);
                let mut pe = demo_record(symbol, expiry, strike_value, OptionType::PE, underlying, seed);
                ce.strike_price = strike.clone();
                pe.strike_price = strike.clone();
                StrikeSnapshot {
                    timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    at: Some(at),
                    ce: Some(ce),
                    pe: Some(pe),
                }
            })
            .collect()
    }
}

/// Most recent demo sample time: the close of the latest demo date.
fn demo_anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 4)
        .and_then(|d| d.and_hms_opt(15, 30, 0))
        .unwrap_or_default()
}

/// One demo contract. `seed` varies the numbers between strikes.
fn demo_record(
    symbol: &str,
    expiry: &str,
    strike: f64,
    option_type: OptionType,
    underlying: f64,
    seed: i64,
) -> ContractRecord {
    let distance = seed.unsigned_abs() as f64;
    let intrinsic = match option_type {
        OptionType::CE => (underlying - strike).max(0.0),
        OptionType::PE => (strike - underlying).max(0.0),
    };
    let side_seed = seed * 2 + i64::from(option_type == OptionType::PE);
    let wobble = DemoFallback::wobble(side_seed);
    let open_interest = 50_000.0 + (STRIKES_EACH_SIDE as f64 - distance).max(0.0) * 25_000.0;
    let trade_volume = 10_000.0 + open_interest / 5.0;
    let buy = 5_000.0 + open_interest / 20.0;
    let sell = 5_000.0 + open_interest / 25.0;
    let ltp = ((intrinsic + 5.0 + (STRIKES_EACH_SIDE as f64 - distance).max(0.0) * 4.0) * 100.0)
        .round()
        / 100.0;
    let strike_key = StrikeKey::from_f64(strike);
    let token = 45_000 + side_seed.rem_euclid(1_000);

    ContractRecord {
        symbol: format!("{symbol}{expiry}{strike_key}{option_type}"),
        token: token.to_string(),
        option_position: Some(OptionPosition::derive(option_type, strike, underlying)),
        strike_price: strike_key,
        option_type,
        open_interest,
        change_in_open_interest: (wobble * 10_000.0).round(),
        trade_volume,
        change_in_trade_volume: (wobble * 2_500.0).round(),
        total_buy_quantity: buy,
        change_in_total_buy_quantity: (wobble * 5_000.0).round(),
        total_sell_quantity: sell,
        change_in_total_sell_quantity: (-wobble * 5_000.0).round(),
        ltp,
        change_in_ltp: (wobble * 3.0 * 100.0).round() / 100.0,
        index_ltp: underlying,
        change_in_index_ltp: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple() -> ResolvedTuple {
        ResolvedTuple {
            symbol: "NIFTY".into(),
            expiry: "27MAR2025".into(),
            date: "20250304".into(),
            time: "09:15".into(),
        }
    }

    #[test]
    fn every_level_has_candidates() {
        for level in Level::ALL {
            assert!(!DemoFallback.candidates(level, &[]).is_empty(), "{level}");
        }
        let times = DemoFallback.candidates(Level::Time, &[]);
        assert_eq!(times.first().map(String::as_str), Some("09:15"));
        assert_eq!(times.last().map(String::as_str), Some("15:30"));
    }

    #[test]
    fn records_are_deterministic_and_paired() {
        let a = DemoFallback.contract_records(&tuple());
        let b = DemoFallback.contract_records(&tuple());
        assert_eq!(a, b);
        assert_eq!(a.len(), 42);
        assert!(a.iter().all(|r| r.index_ltp == a[0].index_ltp));
    }

    #[test]
    fn history_is_most_recent_first() {
        let history = DemoFallback.strike_history("NIFTY", "27MAR2025", &StrikeKey::from(22_400_u32));
        assert_eq!(history.len(), 10);
        assert!(history.windows(2).all(|w| w[0].at > w[1].at));
        assert_eq!(history[0].timestamp, "2025-03-04 15:30:00");
    }
}
