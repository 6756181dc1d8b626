//! Set operations over line-oriented files.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use utility_cli_core::{
    CommandDefinition, CommandRepository, FlagSchema, OptionValues, RegistryError,
};

use super::{stdin_action, write_line};

pub(super) fn register(repo: &mut CommandRepository) -> Result<(), RegistryError> {
    repo.register(
        CommandDefinition::new("set:difference")
            .category("set")
            .flag(
                FlagSchema::with_value(Some("-a"), Some("--first"), "file")
                    .required()
                    .with_description("File whose lines are kept"),
            )
            .flag(
                FlagSchema::with_value(Some("-b"), Some("--second"), "file")
                    .required()
                    .with_description("File whose lines are removed"),
            )
            .description(
                "Print the lines of the first file that do not appear in the second.\n\
                 Output is deduplicated and sorted.",
            )
            .example("$ utility-cli set:difference -a all.txt -b done.txt")
            .action(stdin_action(difference)),
    )
}

/// Reads the distinct lines of a file.
fn read_set(path: &Path) -> Result<BTreeSet<String>, String> {
    let file =
        File::open(path).map_err(|err| format!("Failed to open '{}': {err}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

pub(super) fn difference(
    values: &OptionValues,
    _input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let first = values
        .value("first")
        .ok_or_else(|| "Missing first file".to_string())?;
    let second = values
        .value("second")
        .ok_or_else(|| "Missing second file".to_string())?;

    let kept = read_set(Path::new(first))?;
    let removed = read_set(Path::new(second))?;
    for line in kept.difference(&removed) {
        write_line(output, line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::commands::test_support::run_with;

    #[test]
    fn test_difference_sorted_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "pear\napple\nfig\napple\nkiwi\n").unwrap();
        fs::write(&second, "fig\nbanana\n").unwrap();

        let values = OptionValues::new()
            .with_value("first", first.to_str().unwrap())
            .with_value("second", second.to_str().unwrap());
        let out = run_with(difference, &values, "").unwrap();
        assert_eq!(out, "apple\nkiwi\npear\n");
    }

    #[test]
    fn test_difference_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "a\n").unwrap();
        let absent = dir.path().join("absent.txt");

        let values = OptionValues::new()
            .with_value("first", present.to_str().unwrap())
            .with_value("second", absent.to_str().unwrap());
        let err = run_with(difference, &values, "").unwrap_err();
        assert!(err.starts_with("Failed to open"));
        assert!(err.contains("absent.txt"));
    }
}
