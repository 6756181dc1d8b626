//! Line filters.

use std::io::{BufRead, Write};

use regex::Regex;
use utility_cli_core::{
    CommandDefinition, CommandRepository, FlagSchema, OptionValues, RegistryError,
};

use super::{compile, for_each_line, parse_column, stdin_action, write_line};

fn pattern_flag(description: &str) -> FlagSchema {
    FlagSchema::with_value(Some("-p"), Some("--pattern"), "pattern")
        .required()
        .with_description(description)
}

fn column_flag() -> FlagSchema {
    FlagSchema::with_value(Some("-c"), Some("--column"), "column")
        .with_description("Only test this tab-separated column (0, 1, 2, ...)")
}

pub(super) fn register(repo: &mut CommandRepository) -> Result<(), RegistryError> {
    repo.register(
        CommandDefinition::new("filter:contains")
            .category("filter")
            .flag(pattern_flag("Substring that selected lines contain"))
            .flag(column_flag())
            .description("Print the lines that contain a substring.")
            .example("$ cat app.log | utility-cli filter:contains -p ERROR")
            .action(stdin_action(filter_contains)),
    )?;

    repo.register(
        CommandDefinition::new("filter:regex")
            .category("filter")
            .flag(pattern_flag("Regular expression that selected lines match"))
            .flag(column_flag())
            .description("Print the lines that match a regular expression.")
            .example("$ cat data.tsv | utility-cli filter:regex -p '^chr[0-9]+$' -c 0")
            .action(stdin_action(filter_regex)),
    )
}

/// Tests either the whole line or one tab-separated column of it.
fn select_lines(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    matches: impl Fn(&str) -> bool,
) -> Result<(), String> {
    let column = values.value("column").map(parse_column).transpose()?;

    for_each_line(input, |line| {
        let subject = match column {
            Some(i) => line.split('\t').nth(i),
            None => Some(line),
        };
        if subject.is_some_and(&matches) {
            write_line(output, line)?;
        }
        Ok(())
    })
}

pub(super) fn filter_contains(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let pattern = values
        .value("pattern")
        .ok_or_else(|| "Missing pattern".to_string())?;
    select_lines(values, input, output, |subject| subject.contains(pattern))
}

pub(super) fn filter_regex(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let pattern = values
        .value("pattern")
        .ok_or_else(|| "Missing pattern".to_string())?;
    let regex: Regex = compile(pattern)?;
    select_lines(values, input, output, |subject| regex.is_match(subject))
}
