//! This module defines `MachineDescription`, the immutable definition of a nondeterministic
//! single-tape Turing machine, and the `TransitionTable` it is built around.

use serde::Serialize;
use std::collections::HashMap;

use crate::configuration::Configuration;
use crate::types::Transition;

/// The transition relation: `(state, read symbol)` to an ordered list of transitions.
///
/// Keys with more than one transition are where the machine branches. List order is the
/// order the records were added and is preserved by the engine when it expands a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<char, Vec<Transition>>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `transition` to the list for `(state, read)`.
    pub fn add(&mut self, state: impl Into<String>, read: char, transition: Transition) {
        self.rules
            .entry(state.into())
            .or_default()
            .entry(read)
            .or_default()
            .push(transition);
    }

    /// Returns the transitions for `(state, read)`, if any are defined.
    pub fn get(&self, state: &str, read: char) -> Option<&[Transition]> {
        self.rules
            .get(state)
            .and_then(|symbols| symbols.get(&read))
            .map(Vec::as_slice)
    }

    /// Returns the number of `(state, read)` keys.
    pub fn key_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Returns the total number of transitions across all keys.
    pub fn len(&self) -> usize {
        self.rules
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when no key maps to more than one transition.
    pub fn is_deterministic(&self) -> bool {
        self.rules
            .values()
            .flat_map(HashMap::values)
            .all(|transitions| transitions.len() <= 1)
    }
}

/// A machine description: header data plus the transition table.
///
/// State names are not checked against `states`; a transition may name any state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineDescription {
    /// The name of the machine.
    pub name: String,
    /// The declared states.
    pub states: Vec<String>,
    /// The declared input alphabet. Informational only.
    pub input_alphabet: Vec<String>,
    /// The declared tape alphabet. Informational only.
    pub tape_alphabet: Vec<String>,
    /// The state every simulation starts in.
    pub start_state: String,
    /// Reaching this state on any branch accepts the input.
    pub accept_state: String,
    /// Branches entering this state die.
    pub reject_state: String,
    /// The transition relation.
    pub transitions: TransitionTable,
}

impl MachineDescription {
    /// Creates a machine with an empty transition table and no declared alphabets.
    pub fn new(
        name: impl Into<String>,
        start_state: impl Into<String>,
        accept_state: impl Into<String>,
        reject_state: impl Into<String>,
    ) -> Self {
        let start_state = start_state.into();
        let accept_state = accept_state.into();
        let reject_state = reject_state.into();

        Self {
            name: name.into(),
            states: vec![
                start_state.clone(),
                accept_state.clone(),
                reject_state.clone(),
            ],
            input_alphabet: Vec::new(),
            tape_alphabet: Vec::new(),
            start_state,
            accept_state,
            reject_state,
            transitions: TransitionTable::new(),
        }
    }

    /// Adds a transition, builder style.
    pub fn with_transition(
        mut self,
        state: &str,
        read: char,
        transition: Transition,
    ) -> Self {
        self.transitions.add(state, read, transition);
        self
    }

    /// Returns the transitions applicable in `state` reading `symbol`.
    pub fn transitions(&self, state: &str, symbol: char) -> Option<&[Transition]> {
        self.transitions.get(state, symbol)
    }

    pub fn is_accept(&self, state: &str) -> bool {
        self.accept_state == state
    }

    pub fn is_reject(&self, state: &str) -> bool {
        self.reject_state == state
    }

    /// Returns `true` if `configuration` can still lead somewhere: it accepts, or it is not
    /// rejecting and has at least one applicable transition.
    pub fn is_live(&self, configuration: &Configuration) -> bool {
        let state = configuration.state();
        if self.is_accept(state) {
            return true;
        }

        !self.is_reject(state) && self.transitions(state, configuration.head()).is_some()
    }

    /// Returns the total number of transitions in the table.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` when the machine never branches.
    pub fn is_deterministic(&self) -> bool {
        self.transitions.is_deterministic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn create_branching_machine() -> MachineDescription {
        MachineDescription::new("Branching", "q0", "qA", "qR")
            .with_transition("q0", 'a', Transition::new("q0", 'a', Direction::Right))
            .with_transition("q0", 'a', Transition::new("q1", 'a', Direction::Right))
            .with_transition("q1", '_', Transition::new("qA", '_', Direction::Left))
    }

    #[test]
    fn test_lookup_preserves_record_order() {
        let machine = create_branching_machine();
        let transitions = machine.transitions("q0", 'a').unwrap();

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].next_state, "q0");
        assert_eq!(transitions[1].next_state, "q1");
    }

    #[test]
    fn test_missing_key() {
        let machine = create_branching_machine();

        assert!(machine.transitions("q0", 'b').is_none());
        assert!(machine.transitions("q9", 'a').is_none());
    }

    #[test]
    fn test_counts() {
        let machine = create_branching_machine();

        assert_eq!(machine.transition_count(), 3);
        assert_eq!(machine.transitions.key_count(), 2);
        assert!(!machine.is_deterministic());
    }

    #[test]
    fn test_empty_table_is_deterministic() {
        let machine = MachineDescription::new("Empty", "q0", "qA", "qR");

        assert!(machine.transitions.is_empty());
        assert!(machine.is_deterministic());
    }

    #[test]
    fn test_liveness() {
        let machine = create_branching_machine();

        assert!(machine.is_live(&Configuration::new("", "q0", "a")));
        assert!(machine.is_live(&Configuration::new("", "qA", "")));
        assert!(!machine.is_live(&Configuration::new("", "qR", "a")));
        // No rule for (q0, b): a dead branch.
        assert!(!machine.is_live(&Configuration::new("", "q0", "b")));
    }
}
