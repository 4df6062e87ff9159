//! REST API endpoint implementations.
//!
//! Each sub-module adds high-level `async` methods to
//! [`ChainClient`](crate::client::ChainClient) via `impl` blocks. All methods
//! handle JSON decoding, HTTP transport, and error mapping automatically.
//!
//! ## Usage
//!
//! ```no_run
//! use oichain_rs::ChainClient;
//!
//! # #[tokio::main]
//! # async fn main() -> oichain_rs::Result<()> {
//! let client = ChainClient::new("http://localhost:5000")?;
//! let symbols = client.get_symbols().await?;
//! let expiries = client.get_expiries(&symbols[0]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`option_chain`] | 5 | Symbols, expiries, dates, times, contract records |
//! | [`strike_history`] | 1 | Per-strike time series |

pub mod option_chain;
pub mod strike_history;
