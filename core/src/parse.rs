//! Argument parsing against an option schema.
//!
//! The argument tail of one invocation is parsed with [`clap`]: an
//! [`OptionSchema`] is translated into a throwaway `clap::Command` without
//! clap's own help/version handling, and the resulting matches are converted
//! into [`OptionValues`], a plain map that actions can query by any spelling.

use std::collections::{BTreeMap, HashSet};

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use crate::OptionSchema;

/// Literal tokens that request help regardless of the schema.
pub const HELP_TOKENS: [&str; 2] = ["-h", "--help"];

const POSITIONAL_ID: &str = "::args";

/// Schema violations found while parsing an argument tail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// One or more required flags were not supplied.
    #[error("Missing required option: {0}")]
    MissingRequired(String),
    /// A flag that the schema does not define.
    #[error("Unrecognized option: {0}")]
    UnknownOption(String),
    /// A value flag appeared without its value.
    #[error("Missing argument for option: {0}")]
    MissingValue(String),
    /// A switch was given a value (e.g. `--quiet=yes`).
    #[error("Option does not take a value: {0}")]
    UnexpectedValue(String),
    /// Any other violation, carrying the parser's reason.
    #[error("{0}")]
    Invalid(String),
}

/// Parsed flag values and leftover positional arguments.
///
/// Values are stored under each flag's canonical name and can be looked up
/// by any of its spellings, with or without dashes.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let schema = OptionSchema::new()
///     .with_flag(FlagSchema::with_value(Some("-c"), Some("--column"), "column"));
/// let args: Vec<String> = vec!["-c".into(), "1".into(), "--column".into(), "3".into()];
///
/// let values = parse_args(&schema, &args).unwrap();
/// assert_eq!(values.values("c"), ["1", "3"]);
/// assert_eq!(values.value("--column"), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: BTreeMap<String, Vec<String>>,
    aliases: BTreeMap<String, String>,
    args: Vec<String>,
}

impl OptionValues {
    /// Creates an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a switch as present.
    pub fn with_flag(mut self, name: &str) -> Self {
        self.values.entry(name.to_string()).or_default();
        self
    }

    /// Appends a value for a flag.
    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Returns true when the flag was supplied.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(self.resolve(name))
    }

    /// Returns the first value supplied for the flag.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Returns the first value supplied for the flag, or `default`.
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// Returns every value supplied for the flag, in command-line order.
    pub fn values(&self, name: &str) -> &[String] {
        self.values
            .get(self.resolve(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the positional arguments in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Iterates over the canonical names of the supplied flags.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.args.is_empty()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let bare = name.trim_start_matches('-');
        self.aliases.get(bare).map(String::as_str).unwrap_or(bare)
    }
}

/// Returns true when the tail contains a literal `-h` or `--help` token.
///
/// # Examples
///
/// ```
/// use utility_cli_core::contains_help_flag;
///
/// assert!(contains_help_flag(&["--source".into(), "x".into(), "-h".into()]));
/// assert!(!contains_help_flag(&["--helpful".into()]));
/// ```
pub fn contains_help_flag(args: &[String]) -> bool {
    args.iter().any(|arg| HELP_TOKENS.contains(&arg.as_str()))
}

/// Parses an argument tail against `schema`.
///
/// Value flags may repeat and collect every value; switches may repeat.
/// Tokens that are not flags are collected as positional arguments.
///
/// # Errors
///
/// Returns a [`ParseError`] when a required flag is missing, a flag is not
/// defined by the schema, or a value is missing or unexpected.
pub fn parse_args(schema: &OptionSchema, args: &[String]) -> Result<OptionValues, ParseError> {
    let command = build_command(schema);
    let matches = command
        .try_get_matches_from(args)
        .map_err(to_parse_error)?;
    Ok(collect_values(schema, &matches))
}

fn build_command(schema: &OptionSchema) -> Command {
    let mut command = Command::new("command")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(POSITIONAL_ID)
                .num_args(0..)
                .action(ArgAction::Append)
                .value_name("ARGS"),
        );

    let mut ids: HashSet<&str> = HashSet::new();
    let mut spellings: HashSet<&str> = HashSet::new();
    for flag in schema {
        let id = flag.canonical_name();
        if flag.spellings().any(|s| spellings.contains(s)) {
            tracing::debug!(flag = id, "Skipping flag with a spelling already in use");
            continue;
        }
        if !ids.insert(id) {
            tracing::debug!(flag = id, "Skipping flag with a name already in use");
            continue;
        }
        spellings.extend(flag.spellings());

        let mut arg = Arg::new(id.to_string()).required(flag.required);
        if let Some(short) = flag.short_char() {
            arg = arg.short(short);
        }
        if let Some(long) = flag.long_name() {
            arg = arg.long(long.to_string());
        }
        arg = if flag.takes_value {
            arg.num_args(1)
                .action(ArgAction::Append)
                .value_name(flag.value_name().to_string())
                .allow_negative_numbers(true)
        } else {
            arg.action(ArgAction::Count)
        };
        command = command.arg(arg);
    }
    command
}

fn collect_values(schema: &OptionSchema, matches: &ArgMatches) -> OptionValues {
    let mut values = OptionValues::new();

    for flag in schema {
        let id = flag.canonical_name();
        for spelling in flag.spellings() {
            values
                .aliases
                .entry(spelling.trim_start_matches('-').to_string())
                .or_insert_with(|| id.to_string());
        }

        // Flags skipped by build_command are unknown to clap and yield Err here.
        if flag.takes_value {
            if let Ok(Some(supplied)) = matches.try_get_many::<String>(id) {
                values
                    .values
                    .insert(id.to_string(), supplied.cloned().collect());
            }
        } else if let Ok(Some(count)) = matches.try_get_one::<u8>(id) {
            if *count > 0 {
                values.values.insert(id.to_string(), Vec::new());
            }
        }
    }

    if let Some(positional) = matches.get_many::<String>(POSITIONAL_ID) {
        values.args = positional.cloned().collect();
    }

    values
}

fn to_parse_error(err: clap::Error) -> ParseError {
    let arg = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        Some(ContextValue::Strings(v)) => Some(v.join(", ")),
        _ => None,
    };

    match (err.kind(), arg) {
        (ErrorKind::MissingRequiredArgument, Some(arg)) => ParseError::MissingRequired(arg),
        (ErrorKind::UnknownArgument, Some(arg)) => ParseError::UnknownOption(arg),
        (ErrorKind::InvalidValue, Some(arg)) => ParseError::MissingValue(arg),
        (ErrorKind::TooManyValues, Some(arg)) => ParseError::UnexpectedValue(arg),
        _ => {
            let rendered = err.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            ParseError::Invalid(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::FlagSchema;

    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn columns_schema() -> OptionSchema {
        OptionSchema::new()
            .with_flag(
                FlagSchema::with_value(Some("-c"), Some("--column"), "column")
                    .required()
                    .with_description("Column number (0, 1, 2, ...)"),
            )
            .with_flag(FlagSchema::with_value(
                Some("-d"),
                Some("--delimiter"),
                "delimiter",
            ))
            .with_flag(FlagSchema::boolean(Some("-q"), Some("--quiet")))
    }

    #[test]
    fn test_parse_values_and_switches() {
        let values =
            parse_args(&columns_schema(), &argv(&["-c", "2", "--quiet", "-d", ","])).unwrap();

        assert_eq!(values.value("column"), Some("2"));
        assert_eq!(values.value("d"), Some(","));
        assert!(values.has("-q"));
        assert!(values.has("quiet"));
        assert!(values.args().is_empty());
    }

    #[test]
    fn test_parse_long_equals_form() {
        let values = parse_args(&columns_schema(), &argv(&["--column=4"])).unwrap();
        assert_eq!(values.values("--column"), ["4"]);
    }

    #[test]
    fn test_absent_flags() {
        let values = parse_args(&columns_schema(), &argv(&["-c", "0"])).unwrap();
        assert!(!values.has("quiet"));
        assert_eq!(values.value("delimiter"), None);
        assert_eq!(values.value_or("delimiter", "\\s+"), "\\s+");
        assert!(values.values("delimiter").is_empty());
    }

    #[test]
    fn test_repeated_switch_is_accepted() {
        let values = parse_args(&columns_schema(), &argv(&["-c", "0", "-q", "-q"])).unwrap();
        assert!(values.has("quiet"));
    }

    #[test]
    fn test_positional_arguments_are_kept() {
        let values =
            parse_args(&columns_schema(), &argv(&["-c", "1", "--", "ls", "-l"])).unwrap();
        assert_eq!(values.args(), ["ls", "-l"]);
    }

    #[test]
    fn test_negative_number_value() {
        let values = parse_args(&columns_schema(), &argv(&["-c", "-1"])).unwrap();
        assert_eq!(values.value("c"), Some("-1"));
    }

    #[test]
    fn test_missing_required_flag() {
        let err = parse_args(&columns_schema(), &argv(&["-q"])).unwrap_err();
        match err {
            ParseError::MissingRequired(arg) => assert!(arg.contains("--column")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse_args(&columns_schema(), &argv(&["-c", "1", "--bogus"])).unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption(ref arg) if arg == "--bogus"));
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn test_missing_value() {
        let err = parse_args(&columns_schema(), &argv(&["--column"])).unwrap_err();
        assert!(!matches!(err, ParseError::UnknownOption(_)));
        assert!(err.to_string().contains("--column"));
    }

    #[test]
    fn test_empty_schema_collects_positionals_only() {
        let values = parse_args(&OptionSchema::new(), &argv(&["a", "b"])).unwrap();
        assert_eq!(values.args(), ["a", "b"]);
        assert!(values.names().next().is_none());
    }

    #[test]
    fn test_duplicate_spellings_do_not_panic() {
        let schema = OptionSchema::new()
            .with_flag(FlagSchema::boolean(Some("-v"), Some("--verbose")))
            .with_flag(FlagSchema::boolean(Some("-v"), Some("--version")));

        let values = parse_args(&schema, &argv(&["-v"])).unwrap();
        assert!(values.has("verbose"));
        assert!(!values.has("version"));
    }

    #[test]
    fn test_same_canonical_name_keeps_first_flag() {
        let schema = OptionSchema::new()
            .with_flag(FlagSchema::boolean(Some("-v"), None))
            .with_flag(FlagSchema::with_value(None, Some("--v"), "level"));

        let values = parse_args(&schema, &argv(&["-v"])).unwrap();
        assert!(values.has("-v"));
        assert!(values.value("v").is_none());

        let err = parse_args(&schema, &argv(&["--v", "2"])).unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption(ref arg) if arg == "--v"));
    }

    #[test]
    fn test_contains_help_flag_only_matches_literals() {
        assert!(contains_help_flag(&argv(&["-h"])));
        assert!(contains_help_flag(&argv(&["-c", "1", "--help"])));
        assert!(!contains_help_flag(&argv(&["-hv", "--help=yes"])));
        assert!(!contains_help_flag(&[]));
    }

    #[test]
    fn test_option_values_builder() {
        let values = OptionValues::new()
            .with_flag("gpu")
            .with_value("interval", "5")
            .with_arg("sleep");

        assert!(values.has("--gpu"));
        assert_eq!(values.value("interval"), Some("5"));
        assert_eq!(values.args(), ["sleep"]);
        assert!(!values.is_empty());
    }
}
