//! Integration tests against a live OI analytics backend.
//!
//! # Running
//!
//! Point the tests at a backend before running:
//!
//! ```sh
//! export OICHAIN_BASE_URL="http://44.202.58.76:5000"
//! cargo test --test backend -- --nocapture
//! ```
//!
//! Without `OICHAIN_BASE_URL`, every test is silently skipped.
//!
//! # What is tested
//!
//! - **Lookups** — symbols → expiries → dates → times, in chain order
//! - **Option chain** — records for the first resolved tuple, grouped by strike
//! - **Strike history** — drill-down series for one strike of that chain
//! - **Resolver** — full resolution with the live client
//! - **Error handling** — an unreachable host produces a degradable error

use std::time::Duration;

use oichain_rs::client::{ChainClient, ChainClientBuilder};
use oichain_rs::types::option_chain::ResolvedTuple;
use oichain_rs::{OptionChainView, Resolver};
use oichain_rs::types::DataOrigin;

/// Helper: create a backend client or skip the test.
fn backend_client() -> Option<ChainClient> {
    let url = std::env::var("OICHAIN_BASE_URL").ok()?;
    if url.is_empty() {
        return None;
    }
    ChainClient::new(url).ok()
}

/// Macro to skip a test when no backend is configured.
macro_rules! require_client {
    () => {
        match backend_client() {
            Some(c) => c,
            None => {
                eprintln!("⏭  Skipped (OICHAIN_BASE_URL not set)");
                return;
            }
        }
    };
}

/// Walk the lookups taking the first candidate at every level.
async fn first_tuple(client: &ChainClient) -> Option<ResolvedTuple> {
    let symbol = client.get_symbols().await.expect("get_symbols failed").into_iter().next()?;
    let expiry = client
        .get_expiries(&symbol)
        .await
        .expect("get_expiries failed")
        .into_iter()
        .next()?;
    let date = client
        .get_dates(&symbol, &expiry)
        .await
        .expect("get_dates failed")
        .into_iter()
        .next()?;
    let time = client
        .get_times(&symbol, &expiry, &date)
        .await
        .expect("get_times failed")
        .into_iter()
        .next()?;
    Some(ResolvedTuple {
        symbol,
        expiry,
        date,
        time,
    })
}

// ===================================================================
// Lookups
// ===================================================================

#[tokio::test]
async fn test_symbols() {
    let client = require_client!();
    let symbols = client.get_symbols().await.expect("get_symbols failed");
    println!("✅ Symbols: {symbols:?}");
    assert!(symbols.iter().all(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_lookup_chain() {
    let client = require_client!();
    let Some(tuple) = first_tuple(&client).await else {
        eprintln!("⏭  Backend offered an empty level, nothing to resolve");
        return;
    };
    println!("✅ Resolved: {tuple}");

    let dates = client
        .get_dates(&tuple.symbol, &tuple.expiry)
        .await
        .expect("get_dates failed");
    let mut sorted = dates.clone();
    oichain_rs::calendar::sort_dates_descending(&mut sorted);
    assert_eq!(dates, sorted, "dates should come back most recent first");
}

// ===================================================================
// Option chain
// ===================================================================

#[tokio::test]
async fn test_option_chain() {
    let client = require_client!();
    let Some(tuple) = first_tuple(&client).await else {
        return;
    };
    let records = client
        .get_option_chain(&tuple)
        .await
        .expect("get_option_chain failed");
    let view = OptionChainView::new(tuple, records, DataOrigin::Live);
    println!(
        "✅ Option chain: {} records, {} strikes, underlying {:?}",
        view.records().len(),
        view.rows().len(),
        view.reference_price()
    );
    assert!(view.rows().len() <= view.records().len());
}

#[tokio::test]
async fn test_strike_history() {
    let client = require_client!();
    let Some(tuple) = first_tuple(&client).await else {
        return;
    };
    let records = client
        .get_option_chain(&tuple)
        .await
        .expect("get_option_chain failed");
    let Some(strike) = records.first().map(|r| r.strike_price.clone()) else {
        eprintln!("⏭  Empty option chain, no strike to drill into");
        return;
    };

    let snapshots = client
        .get_strike_history(&tuple.symbol, &tuple.expiry, &strike)
        .await
        .expect("get_strike_history failed");
    println!("✅ Strike {strike}: {} samples", snapshots.len());
    assert!(snapshots.windows(2).all(|w| match (w[0].at, w[1].at) {
        (Some(a), Some(b)) => a >= b,
        _ => true,
    }));
}

// ===================================================================
// Resolver
// ===================================================================

#[tokio::test]
async fn test_resolver_against_backend() {
    let client = require_client!();
    let resolver = Resolver::new(client);
    resolver.start().await;

    let snapshot = resolver.snapshot().await;
    for (level, state) in snapshot.chain.levels() {
        println!("   {level}: {:?} {:?}", state.selected(), state.status());
        assert!(state.status().is_settled() || state.selected().is_none());
    }
    for advisory in resolver.take_advisories().await {
        println!("⚠  {}", advisory.message);
    }
}

// ===================================================================
// Error handling
// ===================================================================

#[tokio::test]
async fn test_unreachable_backend_is_degradable() {
    // Only runs alongside the live tests so offline `cargo test` stays quiet.
    let _ = require_client!();
    let client = ChainClientBuilder::new()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client should build");

    let err = client.get_symbols().await.unwrap_err();
    println!("✅ Got expected error: {err}");
    assert!(err.is_degradable());
}
