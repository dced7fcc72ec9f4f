//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from files, directories and strings.

use crate::machine::MachineDescription;
use crate::parser::parse;
use crate::types::NtmError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of machine descriptions.
pub const DESCRIPTION_EXTENSION: &str = "csv";

/// `MachineLoader` is a utility struct for loading machine descriptions.
/// It provides methods to load a description from a file or from string content,
/// and to discover and load all `.csv` descriptions within a directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDescription)` if the file is read and parsed successfully.
    /// * `Err(NtmError::FileError)` if the file cannot be read.
    /// * A malformed-description error if the content is not a valid description.
    pub fn load_machine(path: &Path) -> Result<MachineDescription, NtmError> {
        let content = fs::read_to_string(path).map_err(|e| {
            NtmError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Loading machine description");

        parse(&content)
    }

    /// Loads a single machine description from the provided string content.
    pub fn load_machine_from_string(content: &str) -> Result<MachineDescription, NtmError> {
        parse(content)
    }

    /// Loads every machine description (`.csv` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields its
    /// own `Result`, so one malformed description does not hide the others. Results are
    /// sorted by path.
    pub fn load_machines(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, MachineDescription), NtmError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(NtmError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(NtmError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.sort();

        results.extend(
            paths
                .into_iter()
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .is_some_and(|ext| ext == DESCRIPTION_EXTENSION)
                })
                .map(|path| Self::load_machine(&path).map(|machine| (path, machine))),
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "Valid\nq0,qA,qR\na\na,_\nq0\nqA\nqR\nq0,a,qA,a,R\n";

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_machine() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("valid.csv");
        write_file(&file_path, VALID);

        let machine = MachineLoader::load_machine(&file_path).unwrap();
        assert_eq!(machine.name, "Valid");
        assert_eq!(machine.start_state, "q0");
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn test_load_malformed_machine() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.csv");
        write_file(&file_path, "Broken\nq0\n");

        let error = MachineLoader::load_machine(&file_path).unwrap_err();
        assert!(error.is_malformed());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let error = MachineLoader::load_machine(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(error, NtmError::FileError(_)));
        assert!(!error.is_malformed());
    }

    #[test]
    fn test_load_from_string() {
        let machine = MachineLoader::load_machine_from_string(VALID).unwrap();
        assert_eq!(machine.accept_state, "qA");
    }

    #[test]
    fn test_load_machines_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("a-valid.csv"), VALID);
        write_file(&dir.path().join("b-invalid.csv"), "Invalid\nq0,qA\n");
        write_file(&dir.path().join("ignored.txt"), "This file should be ignored");
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let results = MachineLoader::load_machines(dir.path());

        assert_eq!(results.len(), 2);
        let (path, machine) = results[0].as_ref().unwrap();
        assert!(path.ends_with("a-valid.csv"));
        assert_eq!(machine.name, "Valid");
        assert!(results[1].as_ref().unwrap_err().is_malformed());
    }

    #[test]
    fn test_load_machines_missing_directory() {
        let dir = tempdir().unwrap();

        let results = MachineLoader::load_machines(&dir.path().join("nowhere"));
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(NtmError::FileError(_))));
    }
}
