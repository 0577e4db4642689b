//! Cascading selection controller
//!
//! Provides [`CascadeController`], the per-form state of one dependency
//! chain: the full option list of every level, the visible (filtered)
//! subset, and the current selection.
//!
//! # Invariants
//! - A child level only shows options whose parent reference is one of the
//!   parent's selected values; with no parent selection it shows nothing.
//! - Changing a selection clears every descendant selection.
//! - Operations never fail: unknown values simply match no option.

use crate::chain::CascadeChain;
use crate::level::SelectOption;
use crate::selection::Selection;
use coopex_record::{Record, Value};

static NO_SELECTION: Selection = Selection::None;

#[derive(Debug, Clone, Default)]
struct LevelState {
    source: Vec<SelectOption>,
    visible: Vec<SelectOption>,
    selection: Selection,
}

/// Selection state for one [`CascadeChain`]
#[derive(Debug, Clone)]
pub struct CascadeController {
    chain: CascadeChain,
    states: Vec<LevelState>,
}

impl CascadeController {
    /// Create controller with empty lists and no selections
    #[must_use]
    pub fn new(chain: CascadeChain) -> Self {
        let states = vec![LevelState::default(); chain.len()];
        Self { chain, states }
    }

    /// Chain this controller manages
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &CascadeChain {
        &self.chain
    }

    /// Replace the full option list of a level
    ///
    /// Selections are kept; the level's visible list and those of its
    /// descendants are recomputed from the current selections.
    pub fn set_source<I>(&mut self, level: &str, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        let Some(index) = self.resolve(level) else {
            return;
        };
        let options = {
            let level = &self.chain.levels()[index];
            records
                .into_iter()
                .map(|record| level.option_from(&record))
                .collect()
        };
        self.states[index].source = options;
        self.refresh(index);
        for d in self.chain.descendants(index) {
            self.refresh(d);
        }
    }

    /// Choose a single value (an empty value clears the level)
    #[inline]
    pub fn set_value(&mut self, level: &str, value: impl Into<Value>) {
        self.set_selection(level, Selection::from(value.into()));
    }

    /// Change the selection of a level
    ///
    /// Every descendant, nearest first, has its visible list recomputed
    /// from its parent's new selection and its own selection cleared.
    pub fn set_selection(&mut self, level: &str, selection: Selection) {
        let Some(index) = self.resolve(level) else {
            return;
        };
        let selection = selection.normalize(self.chain.levels()[index].mode());
        tracing::debug!(level, selected = selection.values().len(), "selection changed");

        self.states[index].selection = selection;
        for d in self.chain.descendants(index) {
            self.states[d].selection = Selection::None;
            self.refresh(d);
        }
    }

    /// Load the stored values of an existing entity
    ///
    /// Each level reads its `record_field`. Ancestors the record does not
    /// store are recovered from the parent reference of the chosen option,
    /// leaf to root. Visible lists are then rebuilt top-down; nothing is
    /// cleared along the way.
    pub fn initialize_from_record(&mut self, record: &Record) {
        for (state, level) in self.states.iter_mut().zip(self.chain.levels()) {
            state.selection =
                Selection::from(record.value(level.record_field())).normalize(level.mode());
        }

        for index in (0..self.states.len()).rev() {
            let Some(parent) = self.chain.parent_of(index) else {
                continue;
            };
            if !self.states[parent].selection.is_empty() {
                continue;
            }
            let recovered = self.states[index]
                .selection
                .single()
                .and_then(|value| self.states[index].source.iter().find(|o| o.is(value)))
                .and_then(|option| option.parent.clone());
            if let Some(value) = recovered {
                let mode = self.chain.levels()[parent].mode();
                self.states[parent].selection = Selection::One(value).normalize(mode);
            }
        }

        for index in 0..self.states.len() {
            self.refresh(index);
        }
        tracing::debug!(
            chain_len = self.states.len(),
            selected = self.states.iter().filter(|s| !s.selection.is_empty()).count(),
            "initialized from record"
        );
    }

    /// Options currently offered at a level
    #[must_use]
    pub fn visible_options(&self, level: &str) -> &[SelectOption] {
        self.state(level)
            .map(|s| s.visible.as_slice())
            .unwrap_or_default()
    }

    /// Full, unfiltered options of a level
    #[must_use]
    pub fn source_options(&self, level: &str) -> &[SelectOption] {
        self.state(level)
            .map(|s| s.source.as_slice())
            .unwrap_or_default()
    }

    /// Current selection of a level
    #[must_use]
    pub fn selection(&self, level: &str) -> &Selection {
        self.state(level).map_or(&NO_SELECTION, |s| &s.selection)
    }

    /// Visible option matching a single selection
    #[must_use]
    pub fn selected_option(&self, level: &str) -> Option<&SelectOption> {
        let state = self.state(level)?;
        let value = state.selection.single()?;
        state.visible.iter().find(|o| o.is(value))
    }

    /// Check if a level's dropdown should be disabled
    ///
    /// True when the level has a parent with nothing selected.
    #[must_use]
    pub fn is_disabled(&self, level: &str) -> bool {
        self.chain
            .index_of(level)
            .and_then(|i| self.chain.parent_of(i))
            .is_some_and(|p| self.states[p].selection.is_empty())
    }

    /// Single selections keyed by each level's `record_field`
    ///
    /// Empty and multi-valued levels are omitted.
    #[must_use]
    pub fn payload(&self) -> Record {
        self.chain
            .levels()
            .iter()
            .zip(&self.states)
            .filter_map(|(level, state)| {
                state
                    .selection
                    .single()
                    .map(|v| (level.record_field().to_string(), v.clone()))
            })
            .collect()
    }

    /// Clear every selection, keeping the loaded lists
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.selection = Selection::None;
        }
        for index in 0..self.states.len() {
            self.refresh(index);
        }
    }

    fn resolve(&self, level: &str) -> Option<usize> {
        let index = self.chain.index_of(level);
        if index.is_none() {
            tracing::warn!(level, "unknown cascade level");
        }
        index
    }

    fn state(&self, level: &str) -> Option<&LevelState> {
        self.chain.index_of(level).map(|i| &self.states[i])
    }

    /// Recompute the visible list of one level from its parent's selection
    fn refresh(&mut self, index: usize) {
        let visible: Vec<SelectOption> = match self.chain.parent_of(index) {
            None => self.states[index].source.clone(),
            Some(parent) => {
                let selected = &self.states[parent].selection;
                if selected.is_empty() {
                    Vec::new()
                } else {
                    self.states[index]
                        .source
                        .iter()
                        .filter(|o| o.parent.as_ref().is_some_and(|p| selected.contains(p)))
                        .cloned()
                        .collect()
                }
            }
        };
        tracing::trace!(index, visible = visible.len(), "visible options recomputed");
        self.states[index].visible = visible;
    }
}
