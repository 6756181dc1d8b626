//! Utility commands registered with the repository.
//!
//! Each command is a plain function over an input reader and an output
//! writer so it can be exercised without touching the process's standard
//! streams. [`stdin_action`] adapts such a function into the action
//! callback the repository dispatches to.

use std::io::{self, BufRead, BufWriter, Write};

use regex::Regex;
use utility_cli_core::{CommandRepository, OptionValues, RegistryError};

mod columns;
mod filter;
mod set;

/// Signature shared by every utility command.
pub type RunFn = fn(&OptionValues, &mut dyn BufRead, &mut dyn Write) -> Result<(), String>;

/// Registers every utility command and its category description.
pub fn register_all(repo: &mut CommandRepository) -> Result<(), RegistryError> {
    columns::register(repo)?;
    filter::register(repo)?;
    set::register(repo)?;

    repo.describe_category("line", "Commands for whitespace or regex delimited lines.");
    repo.describe_category("tsv", "Commands for tab-separated values.");
    repo.describe_category("filter", "Commands that select lines from standard input.");
    repo.describe_category("set", "Commands that treat each line of a file as a set element.");
    Ok(())
}

/// Wraps a command so it reads stdin and writes stdout.
///
/// A failing command prints `error: <message>` and exits with status 1.
fn stdin_action(run: RunFn) -> impl Fn(&OptionValues) + 'static {
    move |values: &OptionValues| {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = BufWriter::new(io::stdout().lock());

        let result = run(values, &mut input, &mut output)
            .and_then(|()| output.flush().map_err(write_error));
        if let Err(err) = result {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn read_error(err: io::Error) -> String {
    format!("Failed to read input: {err}")
}

fn write_error(err: io::Error) -> String {
    format!("Failed to write output: {err}")
}

/// Applies `f` to every input line until it fails or input ends.
fn for_each_line(
    input: &mut dyn BufRead,
    mut f: impl FnMut(&str) -> Result<(), String>,
) -> Result<(), String> {
    for line in input.lines() {
        let line = line.map_err(read_error)?;
        f(&line)?;
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|err| format!("Invalid regular expression '{pattern}': {err}"))
}

fn parse_column(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid column number: '{raw}'"))
}

/// Parses a column list such as `0,2-4` into inclusive ranges
/// `[(0, 0), (2, 4)]`.
///
/// Order and repeats are preserved; an inverted range is an error. Ranges
/// stay unexpanded so an end like `usize::MAX` costs nothing.
fn parse_column_list(spec: &str) -> Result<Vec<(usize, usize)>, String> {
    let mut ranges = Vec::new();
    for part in spec.split(',') {
        match part.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_column(start)?, parse_column(end)?);
                if start > end {
                    return Err(format!("Invalid column range: '{part}'"));
                }
                ranges.push((start, end));
            }
            None => {
                let column = parse_column(part)?;
                ranges.push((column, column));
            }
        }
    }
    Ok(ranges)
}

/// Splits `line` on `delimiter`, dropping trailing empty fields.
fn split_fields<'a>(delimiter: &Regex, line: &'a str) -> Vec<&'a str> {
    let mut fields: Vec<&str> = delimiter.split(line).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn write_line(output: &mut dyn Write, line: &str) -> Result<(), String> {
    writeln!(output, "{line}").map_err(write_error)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use utility_cli_core::OptionValues;

    use super::RunFn;

    /// Runs a command over `input` and returns what it wrote.
    pub fn run_with(run: RunFn, values: &OptionValues, input: &str) -> Result<String, String> {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        run(values, &mut reader, &mut output)?;
        Ok(String::from_utf8(output).expect("commands write UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_list() {
        assert_eq!(parse_column_list("0,2-4").unwrap(), vec![(0, 0), (2, 4)]);
        assert_eq!(parse_column_list("3,1,3").unwrap(), vec![(3, 3), (1, 1), (3, 3)]);
        assert_eq!(parse_column_list(" 1 - 2 ").unwrap(), vec![(1, 2)]);
    }

    #[test]
    fn test_parse_column_list_huge_range() {
        let max = usize::MAX;
        assert_eq!(parse_column_list(&format!("0-{max}")).unwrap(), vec![(0, max)]);
    }

    #[test]
    fn test_parse_column_list_errors() {
        assert_eq!(
            parse_column_list("1,x").unwrap_err(),
            "Invalid column number: 'x'"
        );
        assert_eq!(
            parse_column_list("4-2").unwrap_err(),
            "Invalid column range: '4-2'"
        );
        assert!(parse_column_list("").is_err());
    }

    #[test]
    fn test_split_fields_drops_trailing_empties() {
        let tab = Regex::new("\t").unwrap();
        assert_eq!(split_fields(&tab, "a\tb\t\t"), vec!["a", "b"]);
        assert_eq!(split_fields(&tab, "\ta"), vec!["", "a"]);

        let ws = Regex::new(r"\s+").unwrap();
        assert_eq!(split_fields(&ws, "x  y z "), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_compile_reports_pattern() {
        let err = compile("(").unwrap_err();
        assert!(err.starts_with("Invalid regular expression '('"));
    }

    #[test]
    fn test_register_all() {
        let mut repo = CommandRepository::new();
        register_all(&mut repo).unwrap();
        for name in [
            "line:get_columns",
            "tsv:get_columns",
            "tsv:split",
            "filter:contains",
            "filter:regex",
            "set:difference",
        ] {
            assert!(repo.has_command(name), "{name} should be registered");
            assert!(repo.get(name).unwrap().has_action());
        }
    }
}
