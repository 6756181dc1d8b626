//! Command registry and help rendering for multi-command CLIs.
//!
//! This crate provides the pieces behind a "docker-style" command line, where
//! one binary exposes many named subcommands:
//!
//! - [`FlagSchema`] / [`OptionSchema`]: the flags a command accepts.
//! - [`CommandRepository`]: registers [`CommandDefinition`]s, resolves the
//!   invoked command, merges its flags with the universal ones (such as
//!   `-h/--help`) and dispatches to its action.
//! - [`HelpLayout`] / [`HelpRenderer`]: configurable, ordered help sections
//!   with a process-wide default and per-command overrides.
//! - [`HelpConfig`]: the same help settings loaded from YAML or JSON.
//!
//! Validation ([`validate_schema`]) rejects malformed or duplicate flag
//! spellings at registration time. Merging ([`merge_schemas`]) combines two
//! schemas using a configurable [`MergeStrategy`].
//!
//! # Example
//!
//! ```
//! use utility_cli_core::*;
//!
//! let mut repo = CommandRepository::new();
//! repo.register(
//!     CommandDefinition::new("tsv:split")
//!         .category("tsv")
//!         .flag(
//!             FlagSchema::with_value(Some("-d"), Some("--delimiter"), "delimiter")
//!                 .with_description("Field delimiter regex"),
//!         )
//!         .description("Split lines into tab-separated fields."),
//! )
//! .unwrap();
//!
//! let argv: Vec<String> = vec!["tsv:split".into(), "-d".into(), ",".into()];
//! match repo.parse(&argv) {
//!     Invocation::Parsed { values, .. } => assert_eq!(values.value("delimiter"), Some(",")),
//!     other => panic!("unexpected {other:?}"),
//! }
//!
//! let help = repo.render_command_help("tsv:split");
//! assert!(help.contains("usage: tsv:split [-d <delimiter>] [-h]"));
//! ```

mod config;
mod error;
mod layout;
mod merge;
mod parse;
mod registry;
mod render;
mod types;
mod validate;

pub use config::HelpConfig;
pub use error::{ConfigError, RegistryError};
pub use layout::{
    DEFAULT_DESC_PADDING, DEFAULT_LEFT_PADDING, DEFAULT_WIDTH, HelpLayout, HelpSection,
    default_sections,
};
pub use merge::{MergeStrategy, merge_schemas, merge_with_universal, shadowed_flags};
pub use parse::{HELP_TOKENS, OptionValues, ParseError, contains_help_flag, parse_args};
pub use registry::{
    Action, CommandDefinition, CommandRepository, DEFAULT_CATEGORY, DuplicatePolicy,
    HELP_DESCRIPTION, Invocation,
};
pub use render::HelpRenderer;
pub use types::*;
pub use validate::{ValidationError, validate_command, validate_schema};
