//! Strike History endpoint — one strike's samples across the session.

use crate::client::ChainClient;
use crate::constants::endpoints;
use crate::error::Result;
use crate::types::option_chain::StrikeKey;
use crate::types::strike_history::{StrikeHistoryResponse, StrikeSnapshot, into_snapshots};

impl ChainClient {
    /// Retrieve the CE/PE time series of one strike, most recent first.
    ///
    /// **Endpoint:** `GET /option_chain_by_strike_price`
    pub async fn get_strike_history(
        &self,
        symbol: &str,
        expiry: &str,
        strike: &StrikeKey,
    ) -> Result<Vec<StrikeSnapshot>> {
        let resp: StrikeHistoryResponse = self
            .get(
                endpoints::STRIKE_HISTORY,
                &[
                    ("symbol", symbol),
                    ("expiry", expiry),
                    ("strike_price", strike.as_str()),
                ],
            )
            .await?;
        into_snapshots(strike, resp)
    }
}
