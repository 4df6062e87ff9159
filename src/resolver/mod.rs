//! Cascading parameter resolution.
//!
//! [`Resolver`] drives a [`ParameterChain`] against a [`ChainDataSource`]:
//! one lookup per level, strictly in order, then the contract records of the
//! resolved tuple, which become the current [`OptionChainView`]. Failed
//! lookups never stop the chain; the [`FallbackDataProvider`] fills in and an
//! [`Advisory`] is queued for the rendering layer.
//!
//! # Architecture
//!
//! ```text
//!   select / refresh / start
//!              │
//!        state lock ──► ParameterChain ──► FetchTicket
//!              │                               │
//!        (lock released)                 source fetch
//!              │                               │
//!        state lock ◄── apply (stale? drop) ◄──┘
//! ```
//!
//! The state lock is never held across a fetch, so a selection made while a
//! lookup is in flight lands immediately and the late result is discarded.
//!
//! # Example
//!
//! ```no_run
//! use oichain_rs::{ChainClient, Resolver};
//! use oichain_rs::types::Level;
//!
//! # #[tokio::main]
//! # async fn main() -> oichain_rs::Result<()> {
//! let resolver = Resolver::new(ChainClient::new("http://localhost:5000")?);
//! resolver.start().await;
//! resolver.select(Level::Expiry, "27MAR2025").await?;
//!
//! let snapshot = resolver.snapshot().await;
//! if let Some(view) = &snapshot.view {
//!     for row in view.visible_rows() {
//!         println!("{}", row.strike());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod fallback;
pub mod source;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

pub use chain::{Applied, FetchOutcome, FetchRequest, FetchTicket, LevelState, ParameterChain};
pub use fallback::{DemoFallback, FallbackDataProvider};
pub use source::ChainDataSource;

use crate::aggregator::OptionChainView;
use crate::calendar;
use crate::error::{ChainError, Result};
use crate::types::enums::{DataOrigin, Level};
use crate::types::option_chain::{ResolvedTuple, StrikeKey};
use crate::types::strike_history::StrikeSnapshot;

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

/// What a degradation advisory is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvisoryScope {
    Level(Level),
    Records,
    StrikeHistory,
}

/// One-shot notice that fallback data replaced a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub scope: AdvisoryScope,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Everything the rendering layer needs, copied out of the resolver.
#[derive(Debug, Clone)]
pub struct ResolverSnapshot {
    pub chain: ParameterChain,
    /// The aggregate of the resolved tuple, once its records arrived.
    pub view: Option<OptionChainView>,
}

impl ResolverSnapshot {
    /// Underlying price of the current view, if any.
    pub fn reference_price(&self) -> Option<f64> {
        self.view.as_ref().and_then(OptionChainView::reference_price)
    }
}

/// A strike's time series and where it came from.
#[derive(Debug, Clone)]
pub struct StrikeHistory {
    pub strike: StrikeKey,
    pub origin: DataOrigin,
    /// Most recent first.
    pub snapshots: Vec<StrikeSnapshot>,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

struct State {
    chain: ParameterChain,
    view: Option<OptionChainView>,
    advisories: Vec<Advisory>,
}

struct Inner<S, F> {
    source: S,
    fallback: F,
    state: Mutex<State>,
}

/// Async driver of the parameter chain and owner of the current view.
///
/// Cheap to clone; clones share state.
pub struct Resolver<S, F = DemoFallback> {
    inner: Arc<Inner<S, F>>,
}

impl<S, F> Clone for Resolver<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ChainDataSource> Resolver<S> {
    /// A resolver falling back to [`DemoFallback`].
    pub fn new(source: S) -> Self {
        Self::with_fallback(source, DemoFallback)
    }
}

impl<S: ChainDataSource, F: FallbackDataProvider> Resolver<S, F> {
    /// A resolver with a custom fallback provider.
    pub fn with_fallback(source: S, fallback: F) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                fallback,
                state: Mutex::new(State {
                    chain: ParameterChain::new(),
                    view: None,
                    advisories: Vec::new(),
                }),
            }),
        }
    }

    /// Resolve the whole chain from scratch.
    pub async fn start(&self) {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            state.view = None;
            state.chain.start()
        };
        self.drive(ticket).await;
    }

    /// Re-run every lookup from the current selections.
    pub async fn refresh(&self) {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            state.view = None;
            state.chain.refresh()
        };
        self.drive(ticket).await;
    }

    /// Change one level's selection and re-resolve everything downstream.
    ///
    /// Returns once the chain has settled again, or as soon as a newer
    /// selection supersedes this one.
    pub async fn select(&self, level: Level, value: impl Into<String>) -> Result<()> {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            let ticket = state.chain.select(level, value)?;
            if ticket.is_some() {
                state.view = None;
            }
            ticket
        };
        if let Some(ticket) = ticket {
            self.drive(ticket).await;
        }
        Ok(())
    }

    /// Copy out the chain and the current view.
    pub async fn snapshot(&self) -> ResolverSnapshot {
        let state = self.inner.state.lock().await;
        ResolverSnapshot {
            chain: state.chain.clone(),
            view: state.view.clone(),
        }
    }

    /// Run `f` on the current view (filter and sort operations).
    ///
    /// `None` when no view is built yet.
    pub async fn with_view<R>(&self, f: impl FnOnce(&mut OptionChainView) -> R) -> Option<R> {
        let mut state = self.inner.state.lock().await;
        state.view.as_mut().map(f)
    }

    /// Drain the queued advisories.
    pub async fn take_advisories(&self) -> Vec<Advisory> {
        std::mem::take(&mut self.inner.state.lock().await.advisories)
    }

    /// Fetch the time series of `strike` for the resolved symbol and expiry.
    pub async fn strike_history(&self, strike: &StrikeKey) -> Result<StrikeHistory> {
        let tuple = self.resolved_tuple().await.ok_or_else(|| {
            ChainError::InvalidArgument("strike history needs a resolved chain".to_owned())
        })?;

        let (snapshots, origin) = match self
            .inner
            .source
            .fetch_strike_history(&tuple.symbol, &tuple.expiry, strike)
            .await
        {
            Ok(snapshots) => (snapshots, DataOrigin::Live),
            Err(err) => {
                tracing::warn!(%strike, error = %err, "strike history fetch failed, using fallback data");
                self.advise(AdvisoryScope::StrikeHistory, &err).await;
                let snapshots = self
                    .inner
                    .fallback
                    .strike_history(&tuple.symbol, &tuple.expiry, strike);
                (snapshots, DataOrigin::Fallback)
            }
        };

        Ok(StrikeHistory {
            strike: strike.clone(),
            origin,
            snapshots,
        })
    }

    async fn resolved_tuple(&self) -> Option<ResolvedTuple> {
        self.inner.state.lock().await.chain.resolved_tuple()
    }

    // -----------------------------------------------------------------------
    // Driving the chain
    // -----------------------------------------------------------------------

    /// Follow tickets until the chain settles or a ticket goes stale.
    async fn drive(&self, ticket: FetchTicket) {
        let mut next = Some(ticket);
        while let Some(ticket) = next.take() {
            next = match ticket.request() {
                FetchRequest::Candidates { level, upstream } => {
                    self.resolve_level(&ticket, *level, upstream).await
                }
                FetchRequest::Records(tuple) => {
                    self.load_records(&ticket, tuple).await;
                    None
                }
            };
        }
    }

    async fn resolve_level(
        &self,
        ticket: &FetchTicket,
        level: Level,
        upstream: &[String],
    ) -> Option<FetchTicket> {
        let outcome = match source::fetch_candidates(&self.inner.source, level, upstream).await {
            Ok(candidates) => FetchOutcome::live(candidates),
            Err(err) => {
                if err.is_degradable() {
                    tracing::warn!(%level, error = %err, "lookup failed, using fallback data");
                } else {
                    tracing::error!(%level, error = %err, "lookup rejected, using fallback data");
                }
                let mut candidates = self.inner.fallback.candidates(level, upstream);
                if level == Level::Date {
                    calendar::sort_dates_descending(&mut candidates);
                }
                FetchOutcome::fallback(candidates, err.to_string())
            }
        };
        let degraded = outcome.reason().map(str::to_owned);

        let mut state = self.inner.state.lock().await;
        match state.chain.apply(ticket, outcome) {
            Applied::Stale => {
                tracing::debug!(%level, epoch = ticket.epoch(), "discarding stale lookup result");
                None
            }
            Applied::Settled(next) => {
                let settled = state.chain.level(level);
                tracing::info!(
                    %level,
                    candidates = settled.candidates().len(),
                    selected = settled.selected().unwrap_or("<none>"),
                    status = ?settled.status(),
                    "level resolved"
                );
                if let Some(reason) = degraded {
                    state.advisories.push(Advisory {
                        scope: AdvisoryScope::Level(level),
                        message: format!("{level} lookup failed, using demo data: {reason}"),
                    });
                }
                next
            }
        }
    }

    async fn load_records(&self, ticket: &FetchTicket, tuple: &ResolvedTuple) {
        let fetched = self.inner.source.fetch_contract_records(tuple).await;

        let mut state = self.inner.state.lock().await;
        if !state.chain.accepts_records(ticket) {
            tracing::debug!(%tuple, "discarding stale contract records");
            return;
        }
        let (records, origin) = match fetched {
            Ok(records) => (records, DataOrigin::Live),
            Err(err) => {
                tracing::warn!(%tuple, error = %err, "option chain fetch failed, using fallback data");
                state.advisories.push(Advisory {
                    scope: AdvisoryScope::Records,
                    message: format!("option chain lookup failed, using demo data: {err}"),
                });
                (self.inner.fallback.contract_records(tuple), DataOrigin::Fallback)
            }
        };
        state.view = Some(OptionChainView::new(tuple.clone(), records, origin));
    }

    async fn advise(&self, scope: AdvisoryScope, err: &ChainError) {
        self.inner.state.lock().await.advisories.push(Advisory {
            scope,
            message: format!("lookup failed, using demo data: {err}"),
        });
    }
}
