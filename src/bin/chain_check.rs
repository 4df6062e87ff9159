//! Binary to resolve an option chain against the analytics backend and print
//! the grouped strike rows for inspection.
//!
//! # Usage
//!
//! ```sh
//! export OICHAIN_MACHINE="M124"            # or OICHAIN_BASE_URL=http://host:5000
//! export OICHAIN_SYMBOL="NIFTY"            # optional overrides, applied in order
//! export OICHAIN_EXPIRY="27MAR2025"
//! export OICHAIN_MULTIPLE="100"            # optional: toggle multiples of 100/200/500
//! cargo run --bin chain_check --features cli
//! ```

use std::env;

use oichain_rs::client::ChainClientBuilder;
use oichain_rs::constants::STRIKE_MULTIPLES;
use oichain_rs::error::ChainError;
use oichain_rs::types::{Level, Trend};
use oichain_rs::{OptionChainView, Resolver};

#[tokio::main]
async fn main() -> oichain_rs::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut builder = ChainClientBuilder::new();
    if let Ok(url) = env::var("OICHAIN_BASE_URL") {
        builder = builder.base_url(url);
    } else if let Ok(machine) = env::var("OICHAIN_MACHINE") {
        builder = builder.machine(&machine)?;
    }
    let client = builder.build()?;
    println!("Resolving option chain against {}…", client.base_url());

    let resolver = Resolver::new(client);
    resolver.start().await;

    let overrides = [
        (Level::Symbol, "OICHAIN_SYMBOL"),
        (Level::Expiry, "OICHAIN_EXPIRY"),
        (Level::Date, "OICHAIN_DATE"),
        (Level::Time, "OICHAIN_TIME"),
    ];
    for (level, var) in overrides {
        if let Ok(value) = env::var(var) {
            println!("Selecting {level} = {value}");
            resolver.select(level, value).await?;
        }
    }

    if let Ok(raw) = env::var("OICHAIN_MULTIPLE") {
        let n: u32 = raw.trim().parse().map_err(|_| {
            ChainError::InvalidArgument(format!(
                "OICHAIN_MULTIPLE must be one of {STRIKE_MULTIPLES:?}, got {raw:?}"
            ))
        })?;
        println!("Toggling strikes that are multiples of {n}");
        resolver
            .with_view(|view| view.select_multiples_of(n))
            .await
            .transpose()?;
    }

    let snapshot = resolver.snapshot().await;
    for (level, state) in snapshot.chain.levels() {
        println!(
            "{level:>6}: {:<12} {:?} ({} candidates)",
            state.selected().unwrap_or("-"),
            state.status(),
            state.candidates().len()
        );
    }

    match &snapshot.view {
        Some(view) => print_view(view),
        None => println!("\nNo option chain for this selection."),
    }

    for advisory in resolver.take_advisories().await {
        eprintln!("⚠  {}", advisory.message);
    }

    Ok(())
}

fn print_view(view: &OptionChainView) {
    println!(
        "\n{}{}",
        view.tuple(),
        if view.is_fallback() { " (Using Fallback Data)" } else { "" }
    );
    match view.reference_price() {
        Some(price) => println!("Underlying: {price:.2}"),
        None => println!("Underlying: N/A"),
    }
    if view.is_empty() {
        println!("No data for this selection.");
        return;
    }

    println!(
        "\n{:>12} {:>10} | {:^10} | {:<10} {:<12}",
        "CE OI", "CE LTP", "STRIKE", "PE LTP", "PE OI"
    );
    let cell = |v: Option<f64>, precision: usize| match v {
        Some(v) => format!("{v:.precision$}"),
        None => "N/A".to_owned(),
    };
    let ltp = |record: Option<&oichain_rs::types::option_chain::ContractRecord>| match record {
        Some(r) => {
            let arrow = match Trend::of(r.change_in_ltp) {
                Trend::Up => "▲",
                Trend::Down => "▼",
                Trend::Flat => " ",
            };
            format!("{:.2}{arrow}", r.ltp)
        }
        None => "N/A".to_owned(),
    };
    for row in view.visible_rows() {
        println!(
            "{:>12} {:>10} | {:^10} | {:<10} {:<12}",
            cell(row.call().map(|r| r.open_interest), 0),
            ltp(row.call()),
            row.strike(),
            ltp(row.put()),
            cell(row.put().map(|r| r.open_interest), 0),
        );
    }
}
