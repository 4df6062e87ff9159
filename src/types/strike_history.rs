//! Strike History types — the time series behind the strike drill-down.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{ChainError, Result};
use crate::types::option_chain::{ContractRecord, StrikeKey, WireContractRecord};

/// Call and put observation of one strike at one sample time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeSnapshot {
    /// Sample time as sent by the backend.
    pub timestamp: String,
    /// Parsed sample time, when the timestamp is in a recognized format.
    pub at: Option<NaiveDateTime>,
    pub ce: Option<ContractRecord>,
    pub pe: Option<ContractRecord>,
}

/// One timestamped entry of `GET /option_chain_by_strike_price`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireStrikeSample {
    #[serde(rename = "CE", default)]
    ce: Option<WireContractRecord>,
    #[serde(rename = "PE", default)]
    pe: Option<WireContractRecord>,
}

/// Response from `GET /option_chain_by_strike_price`: timestamp → sample.
pub(crate) type StrikeHistoryResponse = HashMap<String, WireStrikeSample>;

/// Validate a strike-history payload and order it most recent first.
///
/// Entry records omit the strike, so `strike` is filled in. Timestamps that
/// do not parse sort after every parsed one, by text.
pub(crate) fn into_snapshots(
    strike: &StrikeKey,
    response: StrikeHistoryResponse,
) -> Result<Vec<StrikeSnapshot>> {
    let mut snapshots = response
        .into_iter()
        .map(|(timestamp, sample)| {
            let ce = sample
                .ce
                .map(|r| r.into_record(Some(strike)))
                .transpose()
                .map_err(ChainError::MalformedPayload)?;
            let pe = sample
                .pe
                .map(|r| r.into_record(Some(strike)))
                .transpose()
                .map_err(ChainError::MalformedPayload)?;
            Ok(StrikeSnapshot {
                at: calendar::parse_timestamp(&timestamp),
                timestamp,
                ce,
                pe,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    snapshots.sort_by(|a, b| match (a.at, b.at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.timestamp.cmp(&b.timestamp),
    });
    Ok(snapshots)
}
