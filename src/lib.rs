//! This crate provides the core logic for a nondeterministic Turing machine tracer.
//! It includes modules for parsing machine descriptions, exploring every computation branch
//! breadth-first within resource limits, and a small catalog of bundled machines.

pub mod configuration;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod simulator;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Configuration` struct from the configuration module.
pub use configuration::Configuration;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the machine description types from the machine module.
pub use machine::{MachineDescription, TransitionTable};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the simulation engine.
pub use simulator::{simulate, ConfigurationTree, Exploration, Node, Simulator};
/// Re-exports the shared types from the types module.
pub use types::{
    Direction, Header, Limits, NtmError, SimulationResult, Transition, BLANK_SYMBOL,
};
