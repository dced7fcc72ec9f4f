//! Machine configurations: the tape split around the head together with the current state.
//!
//! A configuration is an immutable value. Applying a transition yields a new configuration,
//! so successors produced from one parent never share tape storage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Direction, Transition, BLANK_SYMBOL};

/// A snapshot of the machine: everything left of the head, the current state, and
/// everything from the head rightwards.
///
/// ```text
///   left     right
/// | a | b | [c] | d |
///            ^ head
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    left: String,
    state: String,
    right: String,
}

impl Configuration {
    pub fn new(left: impl Into<String>, state: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            state: state.into(),
            right: right.into(),
        }
    }

    /// The root configuration: head on the first input symbol, nothing to its left.
    pub fn initial(start_state: &str, input: &str) -> Self {
        Self::new("", start_state, input)
    }

    /// Returns the tape content left of the head.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the tape content from the head rightwards.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// Returns the symbol under the head, or the blank symbol past the explored tape.
    pub fn head(&self) -> char {
        self.right.chars().next().unwrap_or(BLANK_SYMBOL)
    }

    /// Applies `transition` and returns the successor configuration.
    ///
    /// Moving right writes under the head and exposes `_` past the end of the tape. Moving
    /// left keeps only two cells to the right of the head: the cell moved onto and the written
    /// symbol. Off the left end nothing is written, a `_` is put in front of the old right
    /// half and another stands in as the vacated left half.
    pub fn step(&self, transition: &Transition) -> Configuration {
        let (left, right) = match transition.direction {
            Direction::Right => {
                let mut left = String::with_capacity(self.left.len() + 1);
                left.push_str(&self.left);
                left.push(transition.write);

                let rest = self.rest();
                let right = if rest.is_empty() {
                    BLANK_SYMBOL.to_string()
                } else {
                    rest.to_string()
                };

                (left, right)
            }
            Direction::Left => {
                let mut left = self.left.clone();

                match left.pop() {
                    Some(previous) => {
                        let right: String = [previous, transition.write].iter().collect();
                        (left, right)
                    }
                    None => {
                        let mut right = String::with_capacity(self.right.len() + 1);
                        right.push(BLANK_SYMBOL);
                        right.push_str(&self.right);
                        (BLANK_SYMBOL.to_string(), right)
                    }
                }
            }
        };

        Configuration {
            left,
            state: transition.next_state.clone(),
            right,
        }
    }

    /// The right half without the head cell.
    fn rest(&self) -> &str {
        let mut chars = self.right.chars();
        chars.next();
        chars.as_str()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "('{}', '{}', '{}')", self.left, self.state, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right(next: &str, write: char) -> Transition {
        Transition::new(next, write, Direction::Right)
    }

    fn left(next: &str, write: char) -> Transition {
        Transition::new(next, write, Direction::Left)
    }

    #[test]
    fn test_head_symbol() {
        assert_eq!(Configuration::new("", "q0", "abc").head(), 'a');
        assert_eq!(Configuration::new("abc", "q0", "").head(), BLANK_SYMBOL);
    }

    #[test]
    fn test_step_right_within_tape() {
        let config = Configuration::new("ab", "q0", "cd");
        let next = config.step(&right("q1", 'X'));

        assert_eq!(next, Configuration::new("abX", "q1", "d"));
        assert_eq!(next.head(), 'd');
    }

    #[test]
    fn test_step_right_off_end_exposes_blank() {
        let config = Configuration::new("ab", "q0", "c");
        let next = config.step(&right("q1", 'X'));

        assert_eq!(next, Configuration::new("abX", "q1", "_"));
    }

    #[test]
    fn test_step_right_on_empty_tape() {
        let config = Configuration::initial("q0", "");
        let next = config.step(&right("qA", '_'));

        assert_eq!(next, Configuration::new("_", "qA", "_"));
    }

    #[test]
    fn test_step_left_keeps_previous_cell_and_write() {
        let config = Configuration::new("ab", "q0", "cde");
        let next = config.step(&left("q1", 'X'));

        assert_eq!(next, Configuration::new("a", "q1", "bX"));
        assert_eq!(next.head(), 'b');
    }

    #[test]
    fn test_step_left_drops_cells_past_write() {
        let config = Configuration::new("a", "q1", "bc");
        let next = config.step(&left("q2", 'b'));

        assert_eq!(next, Configuration::new("", "q2", "ab"));
    }

    #[test]
    fn test_step_left_off_start_extends_with_blank() {
        let config = Configuration::new("", "q1", "xy");
        let next = config.step(&left("q2", 'Z'));

        assert_eq!(next, Configuration::new("_", "q2", "_xy"));
        assert_eq!(next.head(), BLANK_SYMBOL);
    }

    #[test]
    fn test_step_does_not_touch_parent() {
        let config = Configuration::new("ab", "q0", "cd");
        let _ = config.step(&right("q1", 'X'));
        let _ = config.step(&left("q2", 'Y'));

        assert_eq!(config, Configuration::new("ab", "q0", "cd"));
    }

    #[test]
    fn test_display_as_tuple() {
        let config = Configuration::new("", "q0", "aaa");
        assert_eq!(config.to_string(), "('', 'q0', 'aaa')");
    }
}
