//! Option schema merging with configurable precedence.
//!
//! Every command is parsed against its own flags plus the universal flags
//! (such as `-h/--help`). [`merge_schemas`] combines two schemas so that no
//! spelling is claimed twice, using a [`MergeStrategy`] to decide which side
//! keeps a contested spelling.
//!
//! # Example
//!
//! ```
//! use utility_cli_core::*;
//!
//! let command = OptionSchema::new()
//!     .with_flag(FlagSchema::with_value(Some("-s"), Some("--source"), "source"));
//! let universal = OptionSchema::new()
//!     .with_flag(FlagSchema::boolean(Some("-h"), Some("--help")));
//!
//! let merged = merge_schemas(&command, &universal, MergeStrategy::PreferBase);
//! assert_eq!(merged.len(), 2);
//! ```

use crate::{FlagSchema, OptionSchema};

/// Schema merge behavior.
///
/// Controls which side keeps a flag when both schemas claim the same short
/// or long spelling. A losing flag is dropped as a whole, even when only one
/// of its spellings collides.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let base = OptionSchema::new()
///     .with_flag(FlagSchema::with_value(Some("-h"), Some("--host"), "host"));
/// let overlay = OptionSchema::new()
///     .with_flag(FlagSchema::boolean(Some("-h"), Some("--help")));
///
/// let m1 = merge_schemas(&base, &overlay, MergeStrategy::PreferBase);
/// assert!(m1.find("--host").is_some());
/// assert!(m1.find("--help").is_none());
///
/// let m2 = merge_schemas(&base, &overlay, MergeStrategy::PreferOverlay);
/// assert!(m2.find("--help").is_some());
/// assert!(m2.find("--host").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep base flags when spellings collide.
    PreferBase,
    /// Keep overlay flags when spellings collide.
    PreferOverlay,
}

/// Merges two option schemas into one schema.
///
/// The winning side's flags come first in declaration order, followed by
/// the other side's non-conflicting flags.
pub fn merge_schemas(
    base: &OptionSchema,
    overlay: &OptionSchema,
    strategy: MergeStrategy,
) -> OptionSchema {
    let (winner, loser) = match strategy {
        MergeStrategy::PreferBase => (base, overlay),
        MergeStrategy::PreferOverlay => (overlay, base),
    };

    let mut merged = winner.clone();
    for flag in loser {
        if !merged.conflicts_with(flag) {
            merged.push(flag.clone());
        }
    }
    merged
}

/// Merges a command schema with the universal schema.
///
/// Command-defined flags take precedence; a universal flag is added only if
/// none of its spellings already exists in the command schema.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let command = OptionSchema::new()
///     .with_flag(FlagSchema::boolean(Some("-h"), Some("--human")));
/// let universal = OptionSchema::new()
///     .with_flag(FlagSchema::boolean(Some("-h"), Some("--help")));
///
/// let merged = merge_with_universal(&command, &universal);
/// assert_eq!(merged.len(), 1);
/// assert!(merged.find("--human").is_some());
/// ```
pub fn merge_with_universal(command: &OptionSchema, universal: &OptionSchema) -> OptionSchema {
    merge_schemas(command, universal, MergeStrategy::PreferBase)
}

/// Returns the universal flags that the command schema shadows.
pub fn shadowed_flags<'a>(
    command: &OptionSchema,
    universal: &'a OptionSchema,
) -> Vec<&'a FlagSchema> {
    universal
        .iter()
        .filter(|flag| command.conflicts_with(flag))
        .collect()
}
