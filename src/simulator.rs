//! The breadth-first simulation engine.
//!
//! A nondeterministic machine is explored level by level: level `n` holds every configuration
//! reachable in exactly `n` steps. Each level is expanded in order, one successor per
//! applicable transition, so the tree is fully deterministic for a given machine and input.
//! The search stops on the first accepting configuration, when every branch has died, or when
//! one of the `Limits` is reached.

use serde::Serialize;

use crate::configuration::Configuration;
use crate::machine::MachineDescription;
use crate::types::{Limits, SimulationResult};

/// A configuration in the tree, linked to the configuration it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub configuration: Configuration,
    /// Index of the parent in the previous level. `None` only for the root.
    pub parent: Option<usize>,
}

/// Every level built during one simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationTree {
    levels: Vec<Vec<Node>>,
}

impl ConfigurationTree {
    /// Returns the number of levels retained.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the nodes of level `n`.
    pub fn level(&self, n: usize) -> Option<&[Node]> {
        self.levels.get(n).map(Vec::as_slice)
    }

    pub fn levels(&self) -> impl Iterator<Item = &[Node]> {
        self.levels.iter().map(Vec::as_slice)
    }

    /// Returns the number of configurations on each level.
    pub fn widths(&self) -> Vec<usize> {
        self.levels.iter().map(Vec::len).collect()
    }

    /// Returns the number of configurations across all levels.
    pub fn configuration_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Returns the chain of configurations from the root down to `levels[level][index]`.
    ///
    /// The chain follows parent links, so it is the actual ancestry of the node even when
    /// several branches hold identical configurations on the same level.
    pub fn path_to(&self, level: usize, index: usize) -> Vec<Configuration> {
        if level >= self.levels.len() {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(level + 1);
        let mut cursor = Some(index);

        for nodes in self.levels[..=level].iter().rev() {
            let Some(node) = cursor.and_then(|i| nodes.get(i)) else {
                break;
            };
            path.push(node.configuration.clone());
            cursor = node.parent;
        }

        path.reverse();
        path
    }

    fn push(&mut self, level: Vec<Node>) {
        self.levels.push(level);
    }

    fn last(&self) -> &[Node] {
        self.levels.last().map(Vec::as_slice).unwrap_or_default()
    }
}

/// The full outcome of one simulation: verdict, retained tree and transition count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exploration {
    pub result: SimulationResult,
    pub tree: ConfigurationTree,
    /// Number of transitions generated, i.e. successor configurations created.
    pub transitions: usize,
}

/// Runs bounded breadth-first simulations of one machine.
///
/// A `Simulator` only borrows the machine and holds no per-run state, so it can be reused
/// for any number of inputs.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    machine: &'a MachineDescription,
    limits: Limits,
}

impl<'a> Simulator<'a> {
    pub fn new(machine: &'a MachineDescription, limits: Limits) -> Self {
        Self { machine, limits }
    }

    pub fn machine(&self) -> &'a MachineDescription {
        self.machine
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Simulates `input` and returns the verdict.
    pub fn simulate(&self, input: &str) -> SimulationResult {
        self.explore(input).result
    }

    /// Simulates `input` and returns the verdict together with the configuration tree.
    ///
    /// Memory grows with the tree: every level is kept until the call returns so that an
    /// accepting path can be read back from it. With wide branching this dominates the cost of
    /// a run, and `max_depth`/`max_transitions` are the only bounds on it.
    pub fn explore(&self, input: &str) -> Exploration {
        let machine = self.machine;
        let Limits {
            max_depth,
            max_transitions,
        } = self.limits;

        let mut tree = ConfigurationTree::default();
        let mut transitions = 0;
        let mut current = vec![Node {
            configuration: Configuration::initial(&machine.start_state, input),
            parent: None,
        }];

        tracing::debug!(
            machine = %machine.name,
            input,
            max_depth,
            max_transitions,
            "Starting simulation"
        );

        let result = loop {
            if current.is_empty() {
                break SimulationResult::Rejected {
                    depth_explored: tree.depth(),
                };
            }

            // The pending level is never inspected once the budget is spent.
            if transitions >= max_transitions {
                tracing::debug!(
                    transitions,
                    max_transitions,
                    pending = current.len(),
                    "Transition budget exhausted"
                );
                break SimulationResult::Rejected {
                    depth_explored: tree.depth(),
                };
            }

            let depth = tree.depth();
            tree.push(current);
            let level = tree.last();

            tracing::debug!(depth, width = level.len(), transitions, "Expanding level");

            if let Some(index) = level
                .iter()
                .position(|node| machine.is_accept(node.configuration.state()))
            {
                break SimulationResult::Accepted {
                    depth,
                    path: tree.path_to(depth, index),
                };
            }

            let next = self.expand(level, &mut transitions);

            if tree.depth() >= max_depth && self.has_live(&next) {
                break SimulationResult::LimitExceeded {
                    depth_reached: tree.depth(),
                    max_depth,
                };
            }

            current = next;
        };

        tracing::info!(
            machine = %machine.name,
            input,
            depth = result.depth(),
            transitions,
            "{}",
            verdict(&result)
        );

        Exploration {
            result,
            tree,
            transitions,
        }
    }

    /// Produces the next level from `level`, preserving parent order and then transition
    /// order. Reject-state and dead configurations contribute nothing.
    fn expand(&self, level: &[Node], transitions: &mut usize) -> Vec<Node> {
        let mut next = Vec::new();

        for (index, node) in level.iter().enumerate() {
            let configuration = &node.configuration;
            let state = configuration.state();

            if self.machine.is_reject(state) {
                continue;
            }

            let Some(options) = self.machine.transitions(state, configuration.head()) else {
                continue;
            };

            for transition in options {
                next.push(Node {
                    configuration: configuration.step(transition),
                    parent: Some(index),
                });
                *transitions += 1;
            }
        }

        next
    }

    fn has_live(&self, level: &[Node]) -> bool {
        level
            .iter()
            .any(|node| self.machine.is_live(&node.configuration))
    }
}

fn verdict(result: &SimulationResult) -> &'static str {
    match result {
        SimulationResult::Accepted { .. } => "Input accepted",
        SimulationResult::Rejected { .. } => "Input rejected",
        SimulationResult::LimitExceeded { .. } => "Exploration truncated",
    }
}

/// Simulates `input` on `machine` within the given limits.
pub fn simulate(
    machine: &MachineDescription,
    input: &str,
    max_depth: usize,
    max_transitions: usize,
) -> SimulationResult {
    Simulator::new(machine, Limits::new(max_depth, max_transitions)).simulate(input)
}
