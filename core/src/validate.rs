//! Option schema validation.
//!
//! Validates structural invariants of option schemas, catching errors such
//! as duplicate spellings and malformed flag forms at registration time
//! instead of on the first invocation that trips over them.
//!
//! # Examples
//!
//! ```
//! use utility_cli_core::*;
//!
//! let schema = OptionSchema::new()
//!     .with_flag(FlagSchema::boolean(Some("-v"), Some("--verbose")));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: short flag missing leading dash
//! let bad = OptionSchema::new()
//!     .with_flag(FlagSchema::boolean(Some("v"), Some("--verbose")));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::OptionSchema;

/// Schema validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Short flag is not a single dash followed by one character.
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag does not start with `--` or is too short.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// A flag has neither short nor long form.
    #[error("flag must define short or long form")]
    MissingFlagName,
    /// Two flags in the same schema claim the same spelling.
    #[error("duplicate flag spelling in schema: {0}")]
    DuplicateFlag(String),
    /// Two flags resolve to the same canonical name, e.g. `-v` and `--v`.
    #[error("duplicate flag name in schema: {0}")]
    DuplicateName(String),
}

/// Validates a command name and its option schema.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let errors = validate_command(" ", &OptionSchema::new());
/// assert_eq!(errors, vec![ValidationError::EmptyCommandName]);
/// ```
pub fn validate_command(name: &str, schema: &OptionSchema) -> Vec<ValidationError> {
    if name.trim().is_empty() {
        return vec![ValidationError::EmptyCommandName];
    }
    validate_schema(schema)
}

/// Validates an option schema.
///
/// Checks for flags without a name, malformed short or long forms, and
/// spellings or canonical names claimed by more than one flag. Stops at the
/// first problem.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let schema = OptionSchema::new()
///     .with_flag(FlagSchema::boolean(Some("-s"), Some("--silent")))
///     .with_flag(FlagSchema::with_value(Some("-s"), Some("--source"), "source"));
/// let errors = validate_schema(&schema);
/// assert_eq!(errors, vec![ValidationError::DuplicateFlag("-s".into())]);
/// ```
pub fn validate_schema(schema: &OptionSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut names = HashSet::new();

    for flag in schema {
        if flag.short.is_none() && flag.long.is_none() {
            errors.push(ValidationError::MissingFlagName);
            return errors;
        }

        if let Some(short) = &flag.short {
            if flag.short_char().is_none() {
                errors.push(ValidationError::InvalidShortFlag(short.clone()));
                return errors;
            }
            if !seen.insert(short.clone()) {
                errors.push(ValidationError::DuplicateFlag(short.clone()));
                return errors;
            }
        }

        if let Some(long) = &flag.long {
            let well_formed = long
                .strip_prefix("--")
                .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('-'));
            if !well_formed || long.chars().any(char::is_whitespace) {
                errors.push(ValidationError::InvalidLongFlag(long.clone()));
                return errors;
            }
            if !seen.insert(long.clone()) {
                errors.push(ValidationError::DuplicateFlag(long.clone()));
                return errors;
            }
        }

        let name = flag.canonical_name();
        if !names.insert(name) {
            errors.push(ValidationError::DuplicateName(name.to_string()));
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::FlagSchema;

    use super::*;

    #[test]
    fn test_validate_rejects_bad_short_flag() {
        let schema = OptionSchema::new().with_flag(FlagSchema::with_value(
            Some("-col"),
            Some("--column"),
            "column",
        ));

        let errors = validate_schema(&schema);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidShortFlag("-col".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_bad_long_flag() {
        for bad in ["-column", "--", "---column", "--two words"] {
            let schema = OptionSchema::new().with_flag(FlagSchema::boolean(None, Some(bad)));
            assert_eq!(
                validate_schema(&schema),
                vec![ValidationError::InvalidLongFlag(bad.to_string())],
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_nameless_flag() {
        let schema = OptionSchema::new().with_flag(FlagSchema::boolean(None, None));
        assert_eq!(validate_schema(&schema), vec![ValidationError::MissingFlagName]);
    }

    #[test]
    fn test_validate_rejects_duplicate_long() {
        let schema = OptionSchema::new()
            .with_flag(FlagSchema::boolean(Some("-a"), Some("--all")))
            .with_flag(FlagSchema::boolean(None, Some("--all")));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateFlag("--all".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_short_and_long_with_same_name() {
        let schema = OptionSchema::new()
            .with_flag(FlagSchema::boolean(Some("-v"), None))
            .with_flag(FlagSchema::with_value(None, Some("--v"), "level"));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateName("v".to_string())]
        );
    }

    #[test]
    fn test_validate_accepts_valid_schema() {
        let schema = OptionSchema::new()
            .with_flag(FlagSchema::boolean(Some("-v"), Some("--verbose")))
            .with_flag(FlagSchema::with_value(None, Some("--base-dir"), "dir"))
            .with_flag(FlagSchema::with_value(Some("-1"), None, "first"));

        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn test_validate_command_checks_name_first() {
        let schema = OptionSchema::new().with_flag(FlagSchema::boolean(None, None));
        assert_eq!(
            validate_command("", &schema),
            vec![ValidationError::EmptyCommandName]
        );
        assert_eq!(
            validate_command("deploy", &schema),
            vec![ValidationError::MissingFlagName]
        );
    }
}
