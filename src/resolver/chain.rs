//! The dependent parameter chain as a pure state machine.
//!
//! [`ParameterChain`] holds the four levels and hands out [`FetchTicket`]s
//! describing the next lookup to run. Fetch results come back through
//! [`ParameterChain::apply`]; a ticket issued before the latest selection
//! change is stale and its result is discarded. No I/O happens here, so the
//! cascade can be driven by any event loop and tested without one.
//!
//! ```text
//!   select(k) ──► levels > k: Idle, empty ──► level k+1: Loading ──► ticket
//!                                                                     │
//!   apply(ticket, outcome) ◄──────────── fetch (live or fallback) ◄───┘
//!        │
//!        └──► Ready/Degraded, default selected ──► next ticket (k+2 or records)
//! ```

use serde::Serialize;

use crate::error::{ChainError, Result};
use crate::types::enums::{DataOrigin, Level, LevelStatus};
use crate::types::option_chain::ResolvedTuple;

// ---------------------------------------------------------------------------
// Level state
// ---------------------------------------------------------------------------

/// Candidates, selection and status of one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelState {
    candidates: Vec<String>,
    selected: Option<String>,
    status: LevelStatus,
    degraded_reason: Option<String>,
}

impl LevelState {
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    /// Showing fallback candidates.
    pub fn is_degraded(&self) -> bool {
        self.status == LevelStatus::Degraded
    }

    /// Why the level fell back, if it did.
    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded_reason.as_deref()
    }

    fn invalidate(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Tickets and outcomes
// ---------------------------------------------------------------------------

/// What a ticket asks the caller to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Candidates for `level`, given the selected values of every level
    /// before it (in chain order).
    Candidates { level: Level, upstream: Vec<String> },
    /// The contract records of a fully resolved tuple.
    Records(ResolvedTuple),
}

/// A pending lookup, tagged with the chain epoch that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    request: FetchRequest,
}

impl FetchTicket {
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of a candidate fetch, after fallback substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    candidates: Vec<String>,
    origin: DataOrigin,
    reason: Option<String>,
}

impl FetchOutcome {
    /// Candidates returned by the backend. An empty list is a valid outcome.
    pub fn live(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            origin: DataOrigin::Live,
            reason: None,
        }
    }

    /// Fallback candidates substituted after a failed fetch.
    pub fn fallback(candidates: Vec<String>, reason: impl Into<String>) -> Self {
        Self {
            candidates,
            origin: DataOrigin::Fallback,
            reason: Some(reason.into()),
        }
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// What [`ParameterChain::apply`] did with a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The ticket predates the latest selection change; nothing changed.
    Stale,
    /// The level settled. Carries the next lookup, if the chain can go on.
    Settled(Option<FetchTicket>),
}

// ---------------------------------------------------------------------------
// Parameter chain
// ---------------------------------------------------------------------------

/// Symbol → Expiry → Date → Time, each level fed by the ones before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterChain {
    levels: [LevelState; 4],
    /// Bumped on every start, refresh and selection change.
    epoch: u64,
    /// Selections to restore while a refresh walks the chain.
    #[serde(skip)]
    pending: [Option<String>; 4],
}

impl ParameterChain {
    /// A chain with every level `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, level: Level) -> &LevelState {
        &self.levels[level.index()]
    }

    /// All levels, upstream first.
    pub fn levels(&self) -> impl Iterator<Item = (Level, &LevelState)> {
        Level::ALL.into_iter().zip(self.levels.iter())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Begin resolving from scratch: clear everything and load `Symbol`.
    pub fn start(&mut self) -> FetchTicket {
        self.pending = Default::default();
        self.restart()
    }

    /// Re-run every lookup, keeping current selections where the fresh
    /// candidates still contain them.
    pub fn refresh(&mut self) -> FetchTicket {
        self.pending = std::array::from_fn(|i| {
            self.levels[i]
                .selected
                .clone()
                .or_else(|| self.pending[i].clone())
        });
        self.restart()
    }

    fn restart(&mut self) -> FetchTicket {
        self.epoch += 1;
        self.levels.iter_mut().for_each(LevelState::invalidate);
        self.begin(Level::Symbol)
    }

    /// Select `value` on `level`.
    ///
    /// Every downstream level is cleared and goes `Idle`; the next level
    /// starts `Loading` and its ticket is returned. Selecting `Time` returns
    /// the records ticket. Re-selecting the current value is a no-op.
    pub fn select(&mut self, level: Level, value: impl Into<String>) -> Result<Option<FetchTicket>> {
        let value = value.into();
        let state = &self.levels[level.index()];
        if !state.status.is_settled() || !state.candidates.contains(&value) {
            return Err(ChainError::InvalidSelection { level, value });
        }
        if state.selected.as_deref() == Some(value.as_str()) {
            return Ok(None);
        }

        self.epoch += 1;
        self.levels[level.index()].selected = Some(value);
        self.invalidate_after(level);
        self.pending = Default::default();
        Ok(self.advance(level))
    }

    /// Feed a fetch result back into the chain.
    ///
    /// The level takes the candidates wholesale and selects a default: the
    /// value being restored by a refresh if it is still offered, otherwise
    /// the first candidate. An empty candidate list settles the level with no
    /// selection and stops the chain there.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> Applied {
        let FetchRequest::Candidates { level, upstream } = &ticket.request else {
            return Applied::Stale;
        };
        if !self.is_current(ticket)
            || self.levels[level.index()].status != LevelStatus::Loading
            || self.upstream_of(*level) != *upstream
        {
            return Applied::Stale;
        }

        let level = *level;
        let idx = level.index();
        let restored = self.pending[idx].take();
        let selected = match restored {
            Some(ref v) if outcome.candidates.contains(v) => Some(v.clone()),
            _ => outcome.candidates.first().cloned(),
        };
        if selected != restored {
            // The restored downstream values only meant something under the
            // old selection.
            self.pending[idx..].iter_mut().for_each(|p| *p = None);
        }

        let state = &mut self.levels[idx];
        state.candidates = outcome.candidates;
        state.status = match outcome.origin {
            DataOrigin::Live => LevelStatus::Ready,
            DataOrigin::Fallback => LevelStatus::Degraded,
        };
        state.degraded_reason = outcome.reason;
        state.selected = selected;

        if state.selected.is_none() {
            return Applied::Settled(None);
        }
        Applied::Settled(self.advance(level))
    }

    /// Whether a ticket was issued under the current epoch.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Whether a records ticket still matches the resolved tuple.
    pub fn accepts_records(&self, ticket: &FetchTicket) -> bool {
        match &ticket.request {
            FetchRequest::Records(tuple) => {
                self.is_current(ticket) && self.resolved_tuple().as_ref() == Some(tuple)
            }
            FetchRequest::Candidates { .. } => false,
        }
    }

    /// Every level settled with a selection.
    pub fn is_fully_resolved(&self) -> bool {
        self.levels
            .iter()
            .all(|l| l.status.is_settled() && l.selected.is_some())
    }

    /// The complete selection, once fully resolved.
    pub fn resolved_tuple(&self) -> Option<ResolvedTuple> {
        if !self.is_fully_resolved() {
            return None;
        }
        let [symbol, expiry, date, time] = self.levels.clone().map(|l| l.selected.unwrap_or_default());
        Some(ResolvedTuple {
            symbol,
            expiry,
            date,
            time,
        })
    }

    /// Whether any level is showing fallback data.
    pub fn is_degraded(&self) -> bool {
        self.levels.iter().any(LevelState::is_degraded)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn upstream_of(&self, level: Level) -> Vec<String> {
        self.levels[..level.index()]
            .iter()
            .map(|l| l.selected.clone().unwrap_or_default())
            .collect()
    }

    fn invalidate_after(&mut self, level: Level) {
        self.levels[level.index() + 1..]
            .iter_mut()
            .for_each(LevelState::invalidate);
    }

    /// Ticket for whatever follows a settled `level`: the next level's
    /// candidates, or the records once `Time` is selected.
    fn advance(&mut self, level: Level) -> Option<FetchTicket> {
        match level.next() {
            Some(next) => Some(self.begin(next)),
            None => self.resolved_tuple().map(|tuple| FetchTicket {
                epoch: self.epoch,
                request: FetchRequest::Records(tuple),
            }),
        }
    }

    fn begin(&mut self, level: Level) -> FetchTicket {
        self.levels[level.index()].status = LevelStatus::Loading;
        FetchTicket {
            epoch: self.epoch,
            request: FetchRequest::Candidates {
                level,
                upstream: self.upstream_of(level),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    /// Resolve every level with the same live candidates.
    fn resolve_all(chain: &mut ParameterChain, candidates: &[&str]) -> FetchTicket {
        let mut ticket = chain.start();
        loop {
            match chain.apply(&ticket, FetchOutcome::live(strings(candidates))) {
                Applied::Settled(Some(next)) => {
                    if matches!(next.request(), FetchRequest::Records(_)) {
                        return next;
                    }
                    ticket = next;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn start_loads_symbol_first() {
        let mut chain = ParameterChain::new();
        let ticket = chain.start();
        assert_eq!(
            ticket.request(),
            &FetchRequest::Candidates { level: Level::Symbol, upstream: vec![] }
        );
        assert_eq!(chain.level(Level::Symbol).status(), LevelStatus::Loading);
        assert_eq!(chain.level(Level::Expiry).status(), LevelStatus::Idle);
    }

    #[test]
    fn full_resolution_yields_records_ticket() {
        let mut chain = ParameterChain::new();
        let ticket = resolve_all(&mut chain, &["a", "b"]);
        let tuple = chain.resolved_tuple().unwrap();
        assert_eq!(tuple.symbol, "a");
        assert_eq!(tuple.time, "a");
        assert!(chain.accepts_records(&ticket));
    }

    #[test]
    fn select_clears_downstream_before_any_fetch() {
        let mut chain = ParameterChain::new();
        resolve_all(&mut chain, &["a", "b"]);

        let ticket = chain.select(Level::Expiry, "b").unwrap().unwrap();
        assert_eq!(
            ticket.request(),
            &FetchRequest::Candidates { level: Level::Date, upstream: strings(&["a", "b"]) }
        );
        assert_eq!(chain.level(Level::Date).status(), LevelStatus::Loading);
        for level in [Level::Date, Level::Time] {
            assert!(chain.level(level).selected().is_none());
            assert!(chain.level(level).candidates().is_empty());
        }
        assert_eq!(chain.level(Level::Time).status(), LevelStatus::Idle);
        assert!(!chain.is_fully_resolved());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut chain = ParameterChain::new();
        resolve_all(&mut chain, &["a", "b"]);

        let in_flight = chain.select(Level::Expiry, "b").unwrap().unwrap();
        let newer = chain.select(Level::Symbol, "b").unwrap().unwrap();

        assert_eq!(chain.apply(&in_flight, FetchOutcome::live(strings(&["x"]))), Applied::Stale);
        assert!(chain.level(Level::Date).candidates().is_empty());
        assert!(matches!(
            chain.apply(&newer, FetchOutcome::live(strings(&["x"]))),
            Applied::Settled(Some(_))
        ));
    }

    #[test]
    fn applying_twice_is_stale() {
        let mut chain = ParameterChain::new();
        let ticket = chain.start();
        assert!(matches!(
            chain.apply(&ticket, FetchOutcome::live(strings(&["a"]))),
            Applied::Settled(Some(_))
        ));
        assert_eq!(chain.apply(&ticket, FetchOutcome::live(strings(&["z"]))), Applied::Stale);
        assert_eq!(chain.level(Level::Symbol).selected(), Some("a"));
    }

    #[test]
    fn empty_candidates_stop_the_chain() {
        let mut chain = ParameterChain::new();
        let ticket = chain.start();
        assert_eq!(chain.apply(&ticket, FetchOutcome::live(vec![])), Applied::Settled(None));
        assert_eq!(chain.level(Level::Symbol).status(), LevelStatus::Ready);
        assert!(!chain.is_fully_resolved());
    }

    #[test]
    fn selection_must_be_a_candidate() {
        let mut chain = ParameterChain::new();
        resolve_all(&mut chain, &["a", "b"]);
        assert!(matches!(
            chain.select(Level::Date, "zzz"),
            Err(ChainError::InvalidSelection { level: Level::Date, .. })
        ));
        assert_eq!(chain.select(Level::Date, "a").unwrap(), None);
    }

    fn settle(chain: &mut ParameterChain, ticket: &FetchTicket, candidates: &[&str]) -> FetchTicket {
        match chain.apply(ticket, FetchOutcome::live(strings(candidates))) {
            Applied::Settled(Some(next)) => next,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn refresh_restores_selections_still_offered() {
        let mut chain = ParameterChain::new();
        resolve_all(&mut chain, &["a", "b"]);

        let mut ticket = chain.select(Level::Symbol, "b").unwrap().unwrap();
        for _ in 0..3 {
            ticket = settle(&mut chain, &ticket, &["a", "b"]);
        }
        let mut ticket = chain.select(Level::Expiry, "b").unwrap().unwrap();
        for _ in 0..2 {
            ticket = settle(&mut chain, &ticket, &["a", "b"]);
        }
        assert!(matches!(ticket.request(), FetchRequest::Records(_)));

        let ticket = chain.refresh();
        assert_eq!(chain.level(Level::Symbol).status(), LevelStatus::Loading);
        let ticket = settle(&mut chain, &ticket, &["a", "b"]);
        let ticket = settle(&mut chain, &ticket, &["a", "b"]);
        let ticket = settle(&mut chain, &ticket, &["c"]);
        let ticket = settle(&mut chain, &ticket, &["b", "a"]);

        assert_eq!(chain.level(Level::Symbol).selected(), Some("b"));
        assert_eq!(chain.level(Level::Expiry).selected(), Some("b"));
        assert_eq!(chain.level(Level::Date).selected(), Some("c"));
        // Date changed, so the old time is not restored.
        assert_eq!(chain.level(Level::Time).selected(), Some("b"));
        assert!(chain.accepts_records(&ticket));
    }
}
