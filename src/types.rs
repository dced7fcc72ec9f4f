//! This module defines the core data structures and types shared by the parser, the
//! simulation engine and the front-ends: transitions, limits, simulation results and errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::configuration::Configuration;
use crate::Rule;

/// The blank symbol, used both in descriptions and on the simulated tape.
pub const BLANK_SYMBOL: char = '_';
/// Default number of levels the engine may retain before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default number of transitions the engine may generate before giving up.
pub const DEFAULT_MAX_TRANSITIONS: usize = 1000;

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// A single transition of the machine: the state to enter, the symbol to write under the
/// head and the direction the head moves afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: String,
    /// The symbol written at the head position.
    pub write: char,
    /// The direction of the head move.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// Resource limits bounding a single simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of levels kept in the configuration tree.
    pub max_depth: usize,
    /// Maximum number of transitions generated across all levels.
    pub max_transitions: usize,
}

impl Limits {
    pub fn new(max_depth: usize, max_transitions: usize) -> Self {
        Self {
            max_depth,
            max_transitions,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_TRANSITIONS)
    }
}

/// The verdict of a bounded breadth-first simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SimulationResult {
    /// Some branch reached the accept state after `depth` transitions. `path` runs from the
    /// initial configuration to the accepting one.
    Accepted {
        depth: usize,
        path: Vec<Configuration>,
    },
    /// No branch accepted: every branch died or rejected, or the transition budget ran out
    /// first. `depth_explored` levels were built.
    Rejected { depth_explored: usize },
    /// Live branches remained when the tree reached `max_depth` levels.
    LimitExceeded {
        depth_reached: usize,
        max_depth: usize,
    },
}

impl SimulationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }

    /// Returns the number of levels the verdict refers to.
    pub fn depth(&self) -> usize {
        match self {
            Self::Accepted { depth, .. } => *depth,
            Self::Rejected { depth_explored } => *depth_explored,
            Self::LimitExceeded { depth_reached, .. } => *depth_reached,
        }
    }

    /// Returns the accepting path, if any.
    pub fn path(&self) -> Option<&[Configuration]> {
        match self {
            Self::Accepted { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { depth, path } => {
                writeln!(f, "String accepted in {depth} transitions")?;
                write!(f, "Path to accept:")?;
                for configuration in path {
                    write!(f, "\n{configuration}")?;
                }
                Ok(())
            }
            Self::Rejected { depth_explored } => {
                write!(f, "String rejected in {depth_explored} transitions")
            }
            Self::LimitExceeded { max_depth, .. } => {
                write!(f, "Execution stopped after reaching max depth of {max_depth}")
            }
        }
    }
}

/// The header records of a machine description, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Name,
    States,
    InputAlphabet,
    TapeAlphabet,
    StartState,
    AcceptState,
    RejectState,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Header::Name => "machine name",
            Header::States => "state list",
            Header::InputAlphabet => "input alphabet",
            Header::TapeAlphabet => "tape alphabet",
            Header::StartState => "start state",
            Header::AcceptState => "accept state",
            Header::RejectState => "reject state",
        };
        f.write_str(name)
    }
}

/// Represents the errors that can occur while building a machine description or looking one up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NtmError {
    /// The description ended before the given header record.
    #[error("Malformed description: missing {0} record")]
    MissingHeader(Header),
    /// A state header record has an empty first field.
    #[error("Malformed description: line {line}: empty {header} record")]
    EmptyHeader { line: usize, header: Header },
    /// A transition record does not have exactly five fields.
    #[error("Malformed description: line {line}: transition record has {found} fields, expected 5")]
    TransitionArity { line: usize, found: usize },
    /// A read or write field is not a single character.
    #[error("Malformed description: line {line}: symbol '{symbol}' must be a single character")]
    InvalidSymbol { line: usize, symbol: String },
    /// A direction field is neither `L` nor `R`.
    #[error("Malformed description: line {line}: unsupported direction '{direction}'")]
    InvalidDirection { line: usize, direction: String },
    /// The record layer could not be parsed at all.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error related to reading description files.
    #[error("File error: {0}")]
    FileError(String),
    /// A bundled machine lookup failed.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl NtmError {
    /// Returns `true` for every error caused by the content of a description.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, NtmError::FileError(_) | NtmError::NotFound(_))
    }
}
