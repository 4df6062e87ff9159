//! Option Chain endpoints — the parameter lists and the contract records.

use crate::calendar;
use crate::client::ChainClient;
use crate::constants::endpoints;
use crate::error::Result;
use crate::types::option_chain::*;

impl ChainClient {
    /// List the instrument symbols that have option-chain data.
    ///
    /// **Endpoint:** `GET /get_symbols`
    pub async fn get_symbols(&self) -> Result<Vec<String>> {
        let resp: SymbolListResponse = self.get(endpoints::SYMBOLS, &[]).await?;
        Ok(resp.symbols)
    }

    /// List the expiries available for `symbol`.
    ///
    /// **Endpoint:** `GET /get_expiries`
    pub async fn get_expiries(&self, symbol: &str) -> Result<Vec<String>> {
        let resp: ExpiryListResponse = self
            .get(endpoints::EXPIRIES, &[("symbol", symbol)])
            .await?;
        Ok(resp.expiries)
    }

    /// List the trading dates recorded for `symbol` and `expiry`, most
    /// recent first.
    ///
    /// **Endpoint:** `GET /get_dates`
    pub async fn get_dates(&self, symbol: &str, expiry: &str) -> Result<Vec<String>> {
        let resp: DateListResponse = self
            .get(endpoints::DATES, &[("symbol", symbol), ("expiry", expiry)])
            .await?;
        let mut dates = resp.dates;
        calendar::sort_dates_descending(&mut dates);
        Ok(dates)
    }

    /// List the intraday sample times for `symbol`, `expiry` and `date`.
    ///
    /// **Endpoint:** `GET /get_times`
    pub async fn get_times(&self, symbol: &str, expiry: &str, date: &str) -> Result<Vec<String>> {
        let resp: TimeListResponse = self
            .get(
                endpoints::TIMES,
                &[("symbol", symbol), ("expiry", expiry), ("date", date)],
            )
            .await?;
        Ok(resp.times)
    }

    /// Retrieve every contract record for a fully resolved tuple.
    ///
    /// **Endpoint:** `GET /option_chain`
    pub async fn get_option_chain(&self, tuple: &ResolvedTuple) -> Result<Vec<ContractRecord>> {
        let resp: OptionChainResponse = self
            .get(
                endpoints::OPTION_CHAIN,
                &[
                    ("symbol", tuple.symbol.as_str()),
                    ("expiry", tuple.expiry.as_str()),
                    ("date", tuple.date.as_str()),
                    ("time", tuple.time.as_str()),
                ],
            )
            .await?;
        Ok(resp.data)
    }
}
