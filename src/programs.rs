//! Bundled machine descriptions, embedded at compile time and parsed once on first use.

use crate::machine::MachineDescription;
use crate::types::NtmError;

// Default embedded machines
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../machines/aplus.csv"),
    include_str!("../machines/ends-with-b.csv"),
    include_str!("../machines/loop-or-accept.csv"),
    include_str!("../machines/contains-aa.csv"),
];

lazy_static::lazy_static! {
    /// Every bundled description that parsed, paired with its source text.
    pub static ref PROGRAMS: Vec<(MachineDescription, &'static str)> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match crate::parser::parse(text) {
            Ok(machine) => Some((machine, *text)),
            Err(e) => {
                tracing::warn!(%e, "Failed to parse bundled machine");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available machines
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a machine by its index
    pub fn get_program_by_index(index: usize) -> Result<MachineDescription, NtmError> {
        PROGRAMS
            .get(index)
            .map(|(machine, _)| machine.clone())
            .ok_or_else(|| NtmError::NotFound(format!("Machine index {} out of range", index)))
    }

    /// Get a machine by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<MachineDescription, NtmError> {
        PROGRAMS
            .iter()
            .find(|(machine, _)| machine.name.eq_ignore_ascii_case(name))
            .map(|(machine, _)| machine.clone())
            .ok_or_else(|| NtmError::NotFound(format!("Machine '{}' not found", name)))
    }

    /// List all machine names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|(machine, _)| machine.name.clone())
            .collect()
    }

    /// Get information about a machine by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, NtmError> {
        let machine = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: machine.name.clone(),
            start_state: machine.start_state.clone(),
            state_count: machine.states.len(),
            transition_count: machine.transition_count(),
            deterministic: machine.is_deterministic(),
        })
    }

    /// Search for machines by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, (machine, _))| machine.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original text of a machine by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, NtmError> {
        PROGRAMS.get(index).map(|(_, text)| *text).ok_or_else(|| {
            NtmError::NotFound(format!("Machine text index {} out of range", index))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub deterministic: bool,
}
