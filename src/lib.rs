//! # oichain-rs
//!
//! Option-chain ("OI") analytics core for a derivatives dashboard: a
//! cascading parameter resolver (symbol → expiry → date → time) that drives
//! the backend lookups, and an aggregator that groups the resulting
//! per-contract records into strike-indexed CE/PE rows with a strike filter
//! and column sort.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oichain_rs::{ChainClient, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> oichain_rs::error::Result<()> {
//!     let resolver = Resolver::new(ChainClient::new("http://localhost:5000")?);
//!     resolver.start().await;
//!     let snapshot = resolver.snapshot().await;
//!     println!("resolved: {:?}", snapshot.chain.resolved_tuple());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod api;
pub mod calendar;
pub mod client;
pub mod constants;
pub mod error;
pub mod resolver;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::ChainClient;
/// Re-export the error type and Result alias.
pub use error::{ChainError, Result};
/// Re-export the resolver and the view it produces.
pub use aggregator::OptionChainView;
pub use resolver::Resolver;
