//! Strike filter — the set of strikes currently selected for display.

use std::collections::BTreeSet;

use crate::constants::STRIKE_MULTIPLES;
use crate::error::{ChainError, Result};
use crate::types::option_chain::StrikeKey;

/// Selected strikes, tracked against the full set of known strikes.
///
/// A row is displayed iff its key is selected. A new filter starts with every
/// known strike selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrikeFilter {
    known: BTreeSet<StrikeKey>,
    selected: BTreeSet<StrikeKey>,
}

impl StrikeFilter {
    /// A filter over `known` with all of them selected.
    pub fn new(known: impl IntoIterator<Item = StrikeKey>) -> Self {
        let known: BTreeSet<StrikeKey> = known.into_iter().collect();
        Self {
            selected: known.clone(),
            known,
        }
    }

    /// Every known strike.
    pub fn known(&self) -> &BTreeSet<StrikeKey> {
        &self.known
    }

    /// The currently selected strikes.
    pub fn selected(&self) -> &BTreeSet<StrikeKey> {
        &self.selected
    }

    pub fn contains(&self, strike: &StrikeKey) -> bool {
        self.selected.contains(strike)
    }

    /// Whether the selection equals the known set.
    pub fn is_all_selected(&self) -> bool {
        self.selected == self.known
    }

    /// Select every known strike again.
    pub fn reset(&mut self) {
        self.selected = self.known.clone();
    }

    /// Toggle between all strikes and none.
    pub fn select_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.reset();
        }
    }

    /// Known strikes divisible by `n`. Non-numeric strikes never qualify.
    pub fn multiples_of(&self, n: u32) -> BTreeSet<StrikeKey> {
        self.known
            .iter()
            .filter(|k| k.is_multiple_of(n))
            .cloned()
            .collect()
    }

    /// Toggle the strikes divisible by `n`, one of [`STRIKE_MULTIPLES`].
    ///
    /// If those strikes are non-empty and all selected they are removed,
    /// otherwise they are added. With no qualifying strikes this is a no-op.
    pub fn select_multiples_of(&mut self, n: u32) -> Result<()> {
        if !STRIKE_MULTIPLES.contains(&n) {
            return Err(ChainError::InvalidArgument(format!(
                "strike multiple must be one of {STRIKE_MULTIPLES:?}, got {n}"
            )));
        }
        let multiples = self.multiples_of(n);
        if !multiples.is_empty() && multiples.is_subset(&self.selected) {
            self.selected.retain(|k| !multiples.contains(k));
        } else {
            self.selected.extend(multiples);
        }
        Ok(())
    }

    /// Flip one known strike in or out of the selection. Unknown strikes are
    /// ignored.
    pub fn toggle(&mut self, strike: &StrikeKey) {
        if !self.known.contains(strike) {
            return;
        }
        if !self.selected.remove(strike) {
            self.selected.insert(strike.clone());
        }
    }
}
