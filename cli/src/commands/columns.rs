//! Column selection and field splitting.

use std::io::{BufRead, Write};

use utility_cli_core::{
    CommandDefinition, CommandRepository, FlagSchema, OptionValues, RegistryError,
};

use super::{
    compile, for_each_line, parse_column, parse_column_list, split_fields, stdin_action,
    write_line,
};

const DEFAULT_DELIMITER: &str = r"\s+";

pub(super) fn register(repo: &mut CommandRepository) -> Result<(), RegistryError> {
    repo.register(
        CommandDefinition::new("line:get_columns")
            .category("line")
            .flag(
                FlagSchema::with_value(Some("-c"), Some("--column"), "column")
                    .required()
                    .with_description("Column number (0, 1, 2, ...). Repeat to select several."),
            )
            .flag(
                FlagSchema::with_value(Some("-d"), Some("--delimiter"), "delimiter")
                    .with_description("Delimiter of the columns. (default: \"\\s+\")"),
            )
            .description("Get columns from each line.")
            .example("$ ls -l | utility-cli line:get_columns -c 8 -c 4")
            .action(stdin_action(line_get_columns)),
    )?;

    repo.register(
        CommandDefinition::new("tsv:get_columns")
            .category("tsv")
            .flag(
                FlagSchema::with_value(Some("-c"), Some("--columns"), "columns")
                    .required()
                    .with_description("Comma separated column numbers or ranges (e.g. 0,2-4)"),
            )
            .description("Get columns from each line of tab-separated values.")
            .example("$ cat data.tsv | utility-cli tsv:get_columns -c 0,2-4")
            .action(stdin_action(tsv_get_columns)),
    )?;

    repo.register(
        CommandDefinition::new("tsv:split")
            .category("tsv")
            .flag(
                FlagSchema::with_value(Some("-d"), Some("--delimiter"), "delimiter")
                    .with_description("Delimiter regex of the input fields. (default: \"\\s+\")"),
            )
            .description("Convert delimited lines into tab-separated values.")
            .example("$ cat data.csv | utility-cli tsv:split -d ','")
            .action(stdin_action(tsv_split)),
    )
}

/// Prints the selected whitespace (or regex) delimited columns of each line.
pub(super) fn line_get_columns(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let columns = values
        .values("column")
        .iter()
        .map(|raw| parse_column(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let delimiter = compile(values.value_or("delimiter", DEFAULT_DELIMITER))?;

    for_each_line(input, |line| {
        let fields = split_fields(&delimiter, line);
        let selected = columns
            .iter()
            .map(|&i| {
                fields.get(i).copied().ok_or_else(|| {
                    format!("Column {i} is out of range for line with {} columns", fields.len())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        write_line(output, &selected.join("\t"))
    })
}

/// Prints the selected tab-separated columns that exist on each line.
pub(super) fn tsv_get_columns(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let spec = values
        .value("columns")
        .ok_or_else(|| "Missing column list".to_string())?;
    let ranges = parse_column_list(spec)?;

    for_each_line(input, |line| {
        let fields: Vec<&str> = line.split('\t').collect();
        let selected: Vec<&str> = ranges
            .iter()
            .flat_map(|&(start, end)| {
                let end = end.saturating_add(1).min(fields.len());
                fields.get(start..end).unwrap_or_default()
            })
            .copied()
            .collect();
        write_line(output, &selected.join("\t"))
    })
}

/// Re-joins the fields of each line with tabs.
pub(super) fn tsv_split(
    values: &OptionValues,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), String> {
    let delimiter = compile(values.value_or("delimiter", DEFAULT_DELIMITER))?;
    for_each_line(input, |line| {
        write_line(output, &split_fields(&delimiter, line).join("\t"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::run_with;

    #[test]
    fn test_line_get_columns_default_delimiter() {
        let values = OptionValues::new()
            .with_value("column", "2")
            .with_value("column", "0");
        let out = run_with(line_get_columns, &values, "a b  c\nx\ty z\n").unwrap();
        assert_eq!(out, "c\ta\nz\tx\n");
    }

    #[test]
    fn test_line_get_columns_custom_delimiter() {
        let values = OptionValues::new()
            .with_value("column", "1")
            .with_value("delimiter", ",");
        let out = run_with(line_get_columns, &values, "a,b,c\n").unwrap();
        assert_eq!(out, "b\n");
    }

    #[test]
    fn test_line_get_columns_out_of_range() {
        let values = OptionValues::new().with_value("column", "5");
        let err = run_with(line_get_columns, &values, "a b\n").unwrap_err();
        assert_eq!(err, "Column 5 is out of range for line with 2 columns");
    }

    #[test]
    fn test_line_get_columns_bad_column() {
        let values = OptionValues::new().with_value("column", "one");
        assert!(run_with(line_get_columns, &values, "").is_err());
    }

    #[test]
    fn test_tsv_get_columns_skips_missing() {
        let values = OptionValues::new().with_value("columns", "0,2-3");
        let out = run_with(tsv_get_columns, &values, "a\tb\tc\td\te\nx\ty\n").unwrap();
        assert_eq!(out, "a\tc\td\nx\n");
    }

    #[test]
    fn test_tsv_get_columns_unbounded_range() {
        let values = OptionValues::new().with_value("columns", "3,1-18446744073709551615");
        let out = run_with(tsv_get_columns, &values, "a\tb\tc\td\nx\n").unwrap();
        assert_eq!(out, "d\tb\tc\td\n\n");
    }

    #[test]
    fn test_tsv_get_columns_requires_list() {
        let err = run_with(tsv_get_columns, &OptionValues::new(), "a\n").unwrap_err();
        assert_eq!(err, "Missing column list");
    }

    #[test]
    fn test_tsv_split() {
        let out = run_with(tsv_split, &OptionValues::new(), "a  b c\n").unwrap();
        assert_eq!(out, "a\tb\tc\n");

        let values = OptionValues::new().with_value("delimiter", r",\s*");
        let out = run_with(tsv_split, &values, "1, 2,3\n").unwrap();
        assert_eq!(out, "1\t2\t3\n");
    }

    #[test]
    fn test_tsv_split_invalid_regex() {
        let values = OptionValues::new().with_value("delimiter", "[");
        assert!(run_with(tsv_split, &values, "x\n").is_err());
    }
}
