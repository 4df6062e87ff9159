//! The data collaborator the resolver fetches from.

use std::future::Future;

use crate::calendar;
use crate::client::ChainClient;
use crate::error::{ChainError, Result};
use crate::types::enums::Level;
use crate::types::option_chain::{ContractRecord, ResolvedTuple, StrikeKey};
use crate::types::strike_history::StrikeSnapshot;

/// Remote lookups behind each chain level.
///
/// Implemented by [`ChainClient`]; tests and offline front-ends can supply
/// their own. Any error is treated as a failed fetch and degraded to
/// fallback data by the resolver.
pub trait ChainDataSource: Send + Sync + 'static {
    fn list_instruments(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn list_expiries(&self, symbol: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn list_dates(
        &self,
        symbol: &str,
        expiry: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn list_times(
        &self,
        symbol: &str,
        expiry: &str,
        date: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn fetch_contract_records(
        &self,
        tuple: &ResolvedTuple,
    ) -> impl Future<Output = Result<Vec<ContractRecord>>> + Send;

    fn fetch_strike_history(
        &self,
        symbol: &str,
        expiry: &str,
        strike: &StrikeKey,
    ) -> impl Future<Output = Result<Vec<StrikeSnapshot>>> + Send;
}

impl ChainDataSource for ChainClient {
    async fn list_instruments(&self) -> Result<Vec<String>> {
        self.get_symbols().await
    }

    async fn list_expiries(&self, symbol: &str) -> Result<Vec<String>> {
        self.get_expiries(symbol).await
    }

    async fn list_dates(&self, symbol: &str, expiry: &str) -> Result<Vec<String>> {
        self.get_dates(symbol, expiry).await
    }

    async fn list_times(&self, symbol: &str, expiry: &str, date: &str) -> Result<Vec<String>> {
        self.get_times(symbol, expiry, date).await
    }

    async fn fetch_contract_records(&self, tuple: &ResolvedTuple) -> Result<Vec<ContractRecord>> {
        self.get_option_chain(tuple).await
    }

    async fn fetch_strike_history(
        &self,
        symbol: &str,
        expiry: &str,
        strike: &StrikeKey,
    ) -> Result<Vec<StrikeSnapshot>> {
        self.get_strike_history(symbol, expiry, strike).await
    }
}

/// Run the lookup for `level` with its upstream selections.
///
/// Dates come back most recent first whatever order the source used.
pub(crate) async fn fetch_candidates<S: ChainDataSource>(
    source: &S,
    level: Level,
    upstream: &[String],
) -> Result<Vec<String>> {
    match (level, upstream) {
        (Level::Symbol, []) => source.list_instruments().await,
        (Level::Expiry, [symbol]) => source.list_expiries(symbol).await,
        (Level::Date, [symbol, expiry]) => {
            let mut dates = source.list_dates(symbol, expiry).await?;
            calendar::sort_dates_descending(&mut dates);
            Ok(dates)
        }
        (Level::Time, [symbol, expiry, date]) => source.list_times(symbol, expiry, date).await,
        _ => Err(ChainError::InvalidArgument(format!(
            "{level} lookup needs {} upstream values, got {}",
            level.index(),
            upstream.len()
        ))),
    }
}
