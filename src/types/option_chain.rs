#![allow(missing_docs)]
//! Option Chain types — strike keys, per-contract records, list envelopes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::enums::*;

// ---------------------------------------------------------------------------
// Strike Key
// ---------------------------------------------------------------------------

/// Canonical, string-normalized strike price.
///
/// Numeric strikes (JSON numbers or numeric strings) normalize to their
/// shortest decimal form, so `25650`, `25650.0` and `"25650.000000"` share the
/// key `"25650"`. Anything else keeps its trimmed text and has no numeric
/// value. Keys order numerically ascending, non-numeric keys last.
#[derive(Debug, Clone)]
pub struct StrikeKey {
    text: String,
    value: Option<f64>,
}

impl StrikeKey {
    /// Normalize a strike given as text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::from_f64(v),
            _ => Self {
                text: trimmed.to_owned(),
                value: None,
            },
        }
    }

    /// Normalize a numeric strike. Non-finite values are kept as text.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self {
                text: value.to_string(),
                value: None,
            };
        }
        // `-0.0 + 0.0` is `0.0`; keeps "-0" out of the key space.
        let value = value + 0.0;
        Self {
            text: value.to_string(),
            value: Some(value),
        }
    }

    /// The canonical key text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric value, if the strike parsed as a finite number.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Whether the strike is an exact multiple of `n`.
    ///
    /// Always `false` for non-numeric strikes and for `n == 0`.
    pub fn is_multiple_of(&self, n: u32) -> bool {
        match self.value {
            Some(v) if n > 0 => v.rem_euclid(f64::from(n)) == 0.0,
            _ => false,
        }
    }
}

impl PartialEq for StrikeKey {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StrikeKey {}

impl Hash for StrikeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Ord for StrikeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value, other.value) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for StrikeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StrikeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.text)
    }
}

impl From<&str> for StrikeKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<f64> for StrikeKey {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<u32> for StrikeKey {
    fn from(value: u32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

/// Strike as it appears on the wire: a number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStrike {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for StrikeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawStrike::deserialize(deserializer)? {
            RawStrike::Number(v) => Self::from_f64(v),
            RawStrike::Text(s) => Self::parse(&s),
        })
    }
}

impl Serialize for StrikeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Contract Record
// ---------------------------------------------------------------------------

/// One observation of a single option contract.
///
/// Every numeric field is paired with its change since the previous sample.
/// Records are immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireContractRecord")]
pub struct ContractRecord {
    pub strike_price: StrikeKey,
    pub option_type: OptionType,
    /// Moneyness as sent, or derived from the strike and `Indexltp`.
    /// `None` when neither is possible (non-numeric strike).
    pub option_position: Option<OptionPosition>,
    /// Trading symbol of the contract (e.g. `NIFTY27MAR2522500CE`).
    pub symbol: String,
    /// Exchange token.
    pub token: String,
    #[serde(rename = "opn_interest")]
    pub open_interest: f64,
    #[serde(rename = "change_in_opn_interest")]
    pub change_in_open_interest: f64,
    pub trade_volume: f64,
    pub change_in_trade_volume: f64,
    #[serde(rename = "total_buy_quan")]
    pub total_buy_quantity: f64,
    #[serde(rename = "change_in_total_buy_quan")]
    pub change_in_total_buy_quantity: f64,
    #[serde(rename = "total_sell_quan")]
    pub total_sell_quantity: f64,
    #[serde(rename = "change_in_total_sell_quan")]
    pub change_in_total_sell_quantity: f64,
    pub ltp: f64,
    pub change_in_ltp: f64,
    /// Last traded price of the underlying index.
    #[serde(rename = "Indexltp")]
    pub index_ltp: f64,
    #[serde(rename = "change_in_Indexltp")]
    pub change_in_index_ltp: f64,
}

/// Contract record as the backend emits it, before validation.
///
/// `strike_price` is optional here because the strike-history endpoint omits
/// it; `option_position` is derived when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct WireContractRecord {
    #[serde(default)]
    strike_price: Option<StrikeKey>,
    option_type: OptionType,
    #[serde(default)]
    option_position: Option<OptionPosition>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    token: Option<String>,
    opn_interest: f64,
    #[serde(default)]
    change_in_opn_interest: f64,
    trade_volume: f64,
    #[serde(default)]
    change_in_trade_volume: f64,
    total_buy_quan: f64,
    #[serde(default)]
    change_in_total_buy_quan: f64,
    total_sell_quan: f64,
    #[serde(default)]
    change_in_total_sell_quan: f64,
    ltp: f64,
    #[serde(default)]
    change_in_ltp: f64,
    #[serde(rename = "Indexltp")]
    index_ltp: f64,
    #[serde(default, rename = "change_in_Indexltp")]
    change_in_index_ltp: f64,
}

impl WireContractRecord {
    /// Validate into a [`ContractRecord`], filling a missing strike from
    /// `fallback_strike`.
    pub(crate) fn into_record(
        self,
        fallback_strike: Option<&StrikeKey>,
    ) -> Result<ContractRecord, String> {
        let strike_price = match (self.strike_price, fallback_strike) {
            (Some(s), _) => s,
            (None, Some(s)) => s.clone(),
            (None, None) => return Err("missing strike_price".to_owned()),
        };
        let option_position = self.option_position.or_else(|| {
            strike_price
                .value()
                .map(|strike| OptionPosition::derive(self.option_type, strike, self.index_ltp))
        });
        Ok(ContractRecord {
            strike_price,
            option_type: self.option_type,
            option_position,
            symbol: self.symbol.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            open_interest: self.opn_interest,
            change_in_open_interest: self.change_in_opn_interest,
            trade_volume: self.trade_volume,
            change_in_trade_volume: self.change_in_trade_volume,
            total_buy_quantity: self.total_buy_quan,
            change_in_total_buy_quantity: self.change_in_total_buy_quan,
            total_sell_quantity: self.total_sell_quan,
            change_in_total_sell_quantity: self.change_in_total_sell_quan,
            ltp: self.ltp,
            change_in_ltp: self.change_in_ltp,
            index_ltp: self.index_ltp,
            change_in_index_ltp: self.change_in_index_ltp,
        })
    }
}

impl TryFrom<WireContractRecord> for ContractRecord {
    type Error = String;

    fn try_from(wire: WireContractRecord) -> Result<Self, Self::Error> {
        wire.into_record(None)
    }
}

// ---------------------------------------------------------------------------
// Resolved Tuple
// ---------------------------------------------------------------------------

/// A complete `(symbol, expiry, date, time)` selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedTuple {
    pub symbol: String,
    pub expiry: String,
    pub date: String,
    pub time: String,
}

impl fmt::Display for ResolvedTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.symbol, self.expiry, self.date, self.time)
    }
}

// ---------------------------------------------------------------------------
// List Responses
// ---------------------------------------------------------------------------

/// Response from `GET /get_symbols`.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolListResponse {
    #[serde(deserialize_with = "de_candidates")]
    pub symbols: Vec<String>,
}

/// Response from `GET /get_expiries`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpiryListResponse {
    #[serde(deserialize_with = "de_candidates")]
    pub expiries: Vec<String>,
}

/// Response from `GET /get_dates`.
#[derive(Debug, Clone, Deserialize)]
pub struct DateListResponse {
    #[serde(deserialize_with = "de_candidates")]
    pub dates: Vec<String>,
}

/// Response from `GET /get_times`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeListResponse {
    #[serde(deserialize_with = "de_candidates")]
    pub times: Vec<String>,
}

/// Response from `GET /option_chain`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionChainResponse {
    pub data: Vec<ContractRecord>,
}

/// A candidate value the backend may send as a string or a bare number
/// (dates such as `20250228` often arrive unquoted).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandidate {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl From<RawCandidate> for String {
    fn from(raw: RawCandidate) -> Self {
        match raw {
            RawCandidate::Text(s) => s,
            RawCandidate::Integer(i) => i.to_string(),
            RawCandidate::Number(f) => f.to_string(),
        }
    }
}

fn de_candidates<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Vec::<RawCandidate>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}

fn de_lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawCandidate>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_keys_normalize_numeric_forms() {
        assert_eq!(StrikeKey::parse("25650.000000").as_str(), "25650");
        assert_eq!(StrikeKey::from_f64(25650.0).as_str(), "25650");
        assert_eq!(StrikeKey::parse(" 100.50 ").as_str(), "100.5");
        assert_eq!(StrikeKey::parse("-0").as_str(), "0");
        assert_eq!(StrikeKey::parse("25650"), StrikeKey::from_f64(25650.0));
    }

    #[test]
    fn non_numeric_strikes_keep_text_and_sort_last() {
        let odd = StrikeKey::parse(" ATM ");
        assert_eq!(odd.as_str(), "ATM");
        assert_eq!(odd.value(), None);
        assert!(!odd.is_multiple_of(100));
        assert!(StrikeKey::from(900_u32) < odd);
        assert!(StrikeKey::from(100_u32) < StrikeKey::from(900_u32));
    }

    #[test]
    fn multiples_use_numeric_value() {
        assert!(StrikeKey::from(22500_u32).is_multiple_of(500));
        assert!(!StrikeKey::from(22550_u32).is_multiple_of(100));
        assert!(!StrikeKey::parse("100.5").is_multiple_of(100));
        assert!(!StrikeKey::from(100_u32).is_multiple_of(0));
    }

    #[test]
    fn record_derives_missing_position() {
        let json = serde_json::json!({
            "strike_price": "22400",
            "option_type": "PE",
            "opn_interest": 1200,
            "trade_volume": 300.0,
            "total_buy_quan": 10,
            "total_sell_quan": 12,
            "ltp": 85.5,
            "Indexltp": 22350.0,
            "token": 45426
        });
        let record: ContractRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.option_position, Some(OptionPosition::ITM));
        assert_eq!(record.token, "45426");
        assert_eq!(record.change_in_ltp, 0.0);
    }

    #[test]
    fn payload_keeps_non_numeric_strike_without_position() {
        let json = serde_json::json!({"data": [
            {"strike_price": 100, "option_type": "CE", "opn_interest": 5, "trade_volume": 1,
             "total_buy_quan": 1, "total_sell_quan": 1, "ltp": 2.5, "Indexltp": 150},
            {"strike_price": "ODD", "option_type": "PE", "opn_interest": 7, "trade_volume": 1,
             "total_buy_quan": 1, "total_sell_quan": 1, "ltp": 1.0, "Indexltp": 150}
        ]});
        let resp: OptionChainResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].option_position, Some(OptionPosition::ITM));
        assert_eq!(resp.data[1].strike_price.as_str(), "ODD");
        assert_eq!(resp.data[1].option_position, None);
    }

    #[test]
    fn record_rejects_unknown_option_type() {
        let json = serde_json::json!({
            "strike_price": 22400,
            "option_type": "XX",
            "opn_interest": 0, "trade_volume": 0, "total_buy_quan": 0,
            "total_sell_quan": 0, "ltp": 0, "Indexltp": 0
        });
        assert!(serde_json::from_value::<ContractRecord>(json).is_err());
    }

    #[test]
    fn candidates_accept_bare_numbers() {
        let resp: DateListResponse =
            serde_json::from_str(r#"{"dates": [20250304, "20250303"]}"#).unwrap();
        assert_eq!(resp.dates, vec!["20250304", "20250303"]);
    }
}
