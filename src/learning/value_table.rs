//! Tabular action values, keyed by discretized state

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::learning::policy::LearnerAction;
use crate::learning::state_key::StateKey;

/// One state's action values; ordered so tie-breaking is reproducible
pub type ActionValues = BTreeMap<LearnerAction, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    rows: AHashMap<StateKey, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row for `state` seeded with 0.0 for each legal action.
    ///
    /// An existing row is left untouched. Returns whether a row was added.
    pub fn ensure_row(&mut self, state: &StateKey, legal: &[LearnerAction]) -> bool {
        if self.rows.contains_key(state) {
            return false;
        }
        let row = legal.iter().map(|&action| (action, 0.0)).collect();
        self.rows.insert(state.clone(), row);
        true
    }

    pub fn row(&self, state: &StateKey) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.rows.contains_key(state)
    }

    /// Stored value, 0.0 when never visited
    pub fn value(&self, state: &StateKey, action: LearnerAction) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Store a value, adding the action to the row if it is missing
    pub fn set(&mut self, state: &StateKey, action: LearnerAction, value: f64) {
        self.rows
            .entry(state.clone())
            .or_default()
            .insert(action, value);
    }

    /// Highest value in the row; 0.0 for an absent or empty row
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Every action sharing the row's highest value, in action order
    pub fn best_actions(&self, state: &StateKey) -> Vec<LearnerAction> {
        let Some(row) = self.rows.get(state) else {
            return Vec::new();
        };
        let Some(best) = row.values().copied().reduce(f64::max) else {
            return Vec::new();
        };
        row.iter()
            .filter(|(_, &value)| value == best)
            .map(|(&action, _)| action)
            .collect()
    }

    /// Number of states visited
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of (state, action) entries across all rows
    pub fn entry_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::from(s)
    }

    #[test]
    fn test_ensure_row_keeps_existing_values() {
        let mut table = ValueTable::new();
        let state = key("high_high_low_none_none");
        assert!(table.ensure_row(&state, &[LearnerAction::Rest, LearnerAction::SeekPrey]));
        table.set(&state, LearnerAction::Rest, 3.5);

        assert!(!table.ensure_row(&state, &[LearnerAction::Rest, LearnerAction::MoveNorth]));
        assert_eq!(table.value(&state, LearnerAction::Rest), 3.5);
        assert!(!table.row(&state).unwrap().contains_key(&LearnerAction::MoveNorth));
    }

    #[test]
    fn test_set_inserts_missing_action() {
        let mut table = ValueTable::new();
        let state = key("s");
        table.ensure_row(&state, &[LearnerAction::Rest]);
        table.set(&state, LearnerAction::EngageBoss, -1.0);
        assert_eq!(table.row(&state).unwrap().len(), 2);
        assert_eq!(table.entry_count(), 2);
    }

    #[test]
    fn test_best_actions_collects_ties() {
        let mut table = ValueTable::new();
        let state = key("s");
        table.ensure_row(
            &state,
            &[LearnerAction::Rest, LearnerAction::MoveEast, LearnerAction::SeekPrey],
        );
        table.set(&state, LearnerAction::MoveEast, 2.0);
        table.set(&state, LearnerAction::SeekPrey, 2.0);
        assert_eq!(
            table.best_actions(&state),
            vec![LearnerAction::MoveEast, LearnerAction::SeekPrey]
        );
        assert_eq!(table.max_value(&state), 2.0);
    }

    #[test]
    fn test_max_of_unknown_state_is_zero() {
        let table = ValueTable::new();
        assert_eq!(table.max_value(&key("nowhere")), 0.0);
        assert!(table.best_actions(&key("nowhere")).is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut table = ValueTable::new();
        let state = key("low_low_low_none_none");
        table.ensure_row(&state, &[LearnerAction::Rest, LearnerAction::HuntWildlife]);
        table.set(&state, LearnerAction::HuntWildlife, 12.25);

        let json = table.to_json().unwrap();
        assert!(json.contains("hunt_wildlife"));
        let restored = ValueTable::from_json(&json).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ValueTable::from_json("{\"s\": {\"fly\": 1.0}}").is_err());
    }
}
