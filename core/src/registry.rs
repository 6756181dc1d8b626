//! Command registration, resolution and dispatch.
//!
//! A [`CommandRepository`] owns every registered [`CommandDefinition`] along
//! with the universal flags, the process-wide help layout and per-command
//! layout overrides. A hosting program registers its commands once, hands
//! the raw arguments to [`CommandRepository::parse`], and branches on the
//! returned [`Invocation`].
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use utility_cli_core::*;
//!
//! let ran = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&ran);
//!
//! let mut repo = CommandRepository::new();
//! repo.register(
//!     CommandDefinition::new("deploy")
//!         .category("ops")
//!         .flag(FlagSchema::with_value(Some("-s"), Some("--source"), "source").required())
//!         .description("Deploy the application.")
//!         .action(move |values| flag.set(values.value("source") == Some("dist"))),
//! )
//! .unwrap();
//!
//! let argv: Vec<String> = ["deploy", "-s", "dist"].iter().map(|s| s.to_string()).collect();
//! match repo.parse(&argv) {
//!     Invocation::Parsed { command, values } => {
//!         assert!(repo.dispatch(&command, &values));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(ran.get());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::error::RegistryError;
use crate::merge::{merge_with_universal, shadowed_flags};
use crate::parse::{OptionValues, ParseError, contains_help_flag, parse_args};
use crate::render::HelpRenderer;
use crate::validate::validate_command;
use crate::{FlagSchema, HelpLayout, OptionSchema};

/// Category assigned to commands registered without one.
///
/// It is listed after every named category.
pub const DEFAULT_CATEGORY: &str = "other";

/// Description of the universal help flag.
pub const HELP_DESCRIPTION: &str = "Print help message";

const NAME_COLUMN: usize = 16;

/// Callback run when a command is dispatched.
pub type Action = Box<dyn Fn(&OptionValues)>;

/// Everything the repository knows about one command.
///
/// # Examples
///
/// ```
/// use utility_cli_core::*;
///
/// let def = CommandDefinition::new("tsv:split")
///     .category("tsv")
///     .flag(FlagSchema::with_value(Some("-d"), Some("--delimiter"), "delimiter"))
///     .description("Split lines into tab-separated fields.")
///     .example("$ cat data.txt | utility-cli tsv:split -d ','");
///
/// assert_eq!(def.name(), "tsv:split");
/// assert_eq!(def.category_name(), "tsv");
/// assert_eq!(def.schema_ref().len(), 1);
/// ```
pub struct CommandDefinition {
    name: String,
    category: Option<String>,
    schema: OptionSchema,
    description: Option<String>,
    examples: Vec<String>,
    action: Option<Action>,
}

impl CommandDefinition {
    /// Starts a definition with an empty schema and no action.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            schema: OptionSchema::new(),
            description: None,
            examples: Vec::new(),
            action: None,
        }
    }

    /// Sets the group the command is listed under.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Replaces the option schema.
    pub fn schema(mut self, schema: OptionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Adds one flag to the option schema.
    pub fn flag(mut self, flag: FlagSchema) -> Self {
        self.schema.push(flag);
        self
    }

    /// Sets the description. Its first line is the command list summary.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Appends one example line to the help output.
    pub fn example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    /// Sets the callback [`CommandRepository::dispatch`] invokes.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&OptionValues) + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Returns the name the command is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category, or [`DEFAULT_CATEGORY`] when none was set.
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// Returns the command's own schema, without universal options.
    pub fn schema_ref(&self) -> &OptionSchema {
        &self.schema
    }

    /// Returns the description, if one was set.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the examples in the order they were added.
    pub fn examples_list(&self) -> &[String] {
        &self.examples
    }

    /// Returns true when an action callback is attached.
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// First line of the description, used by the command list.
    fn summary(&self) -> &str {
        self.description
            .as_deref()
            .and_then(|d| d.trim().lines().next())
            .unwrap_or("")
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("schema", &self.schema)
            .field("description", &self.description)
            .field("examples", &self.examples)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later registration replaces the earlier one.
    #[default]
    Overwrite,
    /// The later registration fails with [`RegistryError::DuplicateCommand`].
    Reject,
}

/// Outcome of parsing one argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// No arguments at all.
    Empty,
    /// `-h` or `--help` appeared in the command's tail. No values are parsed.
    HelpRequested { command: String },
    /// The tail satisfied the command's merged schema.
    Parsed { command: String, values: OptionValues },
    /// The tail violated the command's merged schema.
    Failed { command: String, error: ParseError },
}

impl Invocation {
    /// Returns the resolved command name, if any token was given.
    pub fn command(&self) -> Option<&str> {
        match self {
            Invocation::Empty => None,
            Invocation::HelpRequested { command }
            | Invocation::Parsed { command, .. }
            | Invocation::Failed { command, .. } => Some(command),
        }
    }

    pub fn is_help_requested(&self) -> bool {
        matches!(self, Invocation::HelpRequested { .. })
    }
}

/// Registry of named commands.
///
/// The repository is an ordinary value: build one per program (or per test)
/// and finish registration before the first call to
/// [`parse`](Self::parse).
pub struct CommandRepository {
    commands: BTreeMap<String, CommandDefinition>,
    universal: OptionSchema,
    default_layout: Option<HelpLayout>,
    command_layouts: HashMap<String, HelpLayout>,
    category_descriptions: BTreeMap<String, String>,
    duplicate_policy: DuplicatePolicy,
}

impl Default for CommandRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRepository")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("universal", &self.universal)
            .field("duplicate_policy", &self.duplicate_policy)
            .finish_non_exhaustive()
    }
}

impl CommandRepository {
    /// Creates an empty repository whose only universal flag is `-h/--help`.
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
            universal: OptionSchema::new().with_flag(
                FlagSchema::boolean(Some("-h"), Some("--help")).with_description(HELP_DESCRIPTION),
            ),
            default_layout: None,
            command_layouts: HashMap::new(),
            category_descriptions: BTreeMap::new(),
            duplicate_policy: DuplicatePolicy::Overwrite,
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Registers a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSchema`] when the name is blank or the
    /// schema is malformed, and [`RegistryError::DuplicateCommand`] when the
    /// name exists and the policy is [`DuplicatePolicy::Reject`]. A failed
    /// registration leaves the repository unchanged.
    pub fn register(&mut self, definition: CommandDefinition) -> Result<(), RegistryError> {
        if let Some(source) = validate_command(&definition.name, &definition.schema)
            .into_iter()
            .next()
        {
            return Err(RegistryError::InvalidSchema {
                command: definition.name,
                source,
            });
        }

        if self.commands.contains_key(&definition.name) {
            if self.duplicate_policy == DuplicatePolicy::Reject {
                return Err(RegistryError::DuplicateCommand(definition.name));
            }
            debug!(command = %definition.name, "Replacing existing command registration");
        }

        for flag in shadowed_flags(&definition.schema, &self.universal) {
            debug!(
                command = %definition.name,
                flag = flag.canonical_name(),
                "Command flag shadows a universal flag"
            );
        }

        info!(
            command = %definition.name,
            category = definition.category_name(),
            flags = definition.schema.len(),
            "Registered command"
        );
        self.commands.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Replaces the process-wide help layout; `None` restores the built-in
    /// default.
    pub fn configure_default_help_layout(&mut self, layout: Option<HelpLayout>) {
        self.default_layout = layout;
    }

    /// Sets or clears the help layout override for one command.
    ///
    /// The command does not need to be registered yet.
    pub fn configure_command_help_layout(&mut self, name: &str, layout: Option<HelpLayout>) {
        match layout {
            Some(layout) => {
                self.command_layouts.insert(name.to_string(), layout);
            }
            None => {
                self.command_layouts.remove(name);
            }
        }
    }

    /// Adds a flag that every command accepts.
    pub fn add_universal_option(&mut self, flag: FlagSchema) {
        debug!(flag = flag.canonical_name(), "Added universal option");
        self.universal.push(flag);
    }

    /// Attaches a description paragraph to a category in the command list.
    pub fn describe_category(&mut self, category: &str, text: &str) {
        self.category_descriptions
            .insert(category.to_string(), text.to_string());
    }

    pub fn universal_options(&self) -> &OptionSchema {
        &self.universal
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    /// Iterates over registered command names in alphabetical order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Returns the command schema merged with the universal flags, or the
    /// universal flags alone for an unknown name.
    pub fn merged_schema(&self, name: &str) -> OptionSchema {
        match self.commands.get(name) {
            Some(def) => merge_with_universal(&def.schema, &self.universal),
            None => self.universal.clone(),
        }
    }

    /// Parses a full argument vector; the first token names the command.
    ///
    /// A literal `-h` or `--help` anywhere in the tail wins over every
    /// schema rule, so help is available even when required flags are
    /// missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::*;
    ///
    /// let mut repo = CommandRepository::new();
    /// repo.register(
    ///     CommandDefinition::new("x")
    ///         .flag(FlagSchema::with_value(Some("-s"), None, "source").required()),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(repo.parse(&[]), Invocation::Empty);
    /// let argv = vec!["x".to_string(), "-h".to_string()];
    /// assert_eq!(
    ///     repo.parse(&argv),
    ///     Invocation::HelpRequested { command: "x".into() }
    /// );
    /// ```
    pub fn parse(&self, argv: &[String]) -> Invocation {
        let Some((command, tail)) = argv.split_first() else {
            debug!("No command given");
            return Invocation::Empty;
        };
        let command = command.clone();

        if contains_help_flag(tail) {
            debug!(command = %command, "Help requested");
            return Invocation::HelpRequested { command };
        }

        let schema = self.merged_schema(&command);
        match parse_args(&schema, tail) {
            Ok(values) => {
                let flags: Vec<&str> = values.names().collect();
                debug!(command = %command, ?flags, "Parsed arguments");
                Invocation::Parsed { command, values }
            }
            Err(error) => {
                debug!(command = %command, error = %error, "Parsing failed");
                Invocation::Failed { command, error }
            }
        }
    }

    /// Runs the command's action with `values`.
    ///
    /// Returns `false` when the command is unknown or has no action.
    pub fn dispatch(&self, name: &str, values: &OptionValues) -> bool {
        let Some(action) = self.commands.get(name).and_then(|def| def.action.as_ref()) else {
            debug!(command = name, "No action to dispatch");
            return false;
        };
        debug!(command = name, "Dispatching command");
        action(values);
        true
    }

    /// Returns the layout used to render help for `name`.
    ///
    /// The built-in default is overridden by the process-wide layout, then by
    /// the command's own layout. Description and examples not set by either
    /// layout come from the registered command.
    pub fn effective_help_layout(&self, name: &str) -> HelpLayout {
        let mut layout = HelpLayout::new();
        if let Some(default) = &self.default_layout {
            layout = layout.merged_with(default);
        }
        if let Some(own) = self.command_layouts.get(name) {
            layout = layout.merged_with(own);
        }

        if let Some(def) = self.commands.get(name) {
            if layout.description.is_none() {
                layout.description = def.description.clone();
            }
            if layout.examples.is_none() && !def.examples.is_empty() {
                layout.examples = Some(def.examples.clone());
            }
        }
        layout
    }

    /// Renders help text for one command.
    ///
    /// An unregistered name renders with an empty schema.
    pub fn render_command_help(&self, name: &str) -> String {
        let layout = self.effective_help_layout(name);
        let schema = if self.has_command(name) {
            self.merged_schema(name)
        } else {
            OptionSchema::new()
        };
        HelpRenderer::new(&layout).render(name, &schema)
    }

    /// Groups command names by category.
    ///
    /// Named categories come first in alphabetical order, followed by
    /// [`DEFAULT_CATEGORY`] if any command uses it. Names within a group are
    /// sorted.
    pub fn commands_by_category(&self) -> Vec<(String, Vec<String>)> {
        let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for def in self.commands.values() {
            groups
                .entry(def.category_name())
                .or_default()
                .push(def.name.clone());
        }

        let default = groups.remove(DEFAULT_CATEGORY);
        let mut ordered: Vec<(String, Vec<String>)> = groups
            .into_iter()
            .map(|(category, names)| (category.to_string(), names))
            .collect();
        if let Some(names) = default {
            ordered.push((DEFAULT_CATEGORY.to_string(), names));
        }
        ordered
    }

    /// Renders the categorized command list shown when no command is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::*;
    ///
    /// let mut repo = CommandRepository::new();
    /// repo.register(CommandDefinition::new("b").category("alpha")).unwrap();
    /// repo.register(CommandDefinition::new("a").description("Plain command.")).unwrap();
    ///
    /// let text = repo.render_command_list("usage: app <command>");
    /// let alpha = text.find("## alpha").unwrap();
    /// let other = text.find("## Other Commands").unwrap();
    /// assert!(alpha < other);
    /// assert!(text.contains("a               Plain command.\n"));
    /// ```
    pub fn render_command_list(&self, usage_line: &str) -> String {
        let mut out = format!("## Usage\n\n{usage_line}\n\n");

        let groups = self.commands_by_category();
        let has_named = groups.iter().any(|(c, _)| c != DEFAULT_CATEGORY);

        for (category, names) in &groups {
            let heading = if category != DEFAULT_CATEGORY {
                category.as_str()
            } else if has_named {
                "Other Commands"
            } else {
                "Commands"
            };
            out.push_str(&format!("## {heading}\n\n"));

            if let Some(text) = self.category_descriptions.get(category) {
                out.push_str(text.trim_end());
                out.push_str("\n\n");
            }

            for name in names {
                let summary = self.commands.get(name).map(|d| d.summary()).unwrap_or("");
                let pad = name_column(name) - name.width();
                let line = format!("{name}{}{summary}", " ".repeat(pad));
                out.push_str(line.trim_end());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

/// Width of the name column in terminal cells: 16, or the next multiple of
/// four that leaves at least one space after longer names.
fn name_column(name: &str) -> usize {
    let len = name.width();
    if len < NAME_COLUMN {
        NAME_COLUMN
    } else {
        (len + 4) / 4 * 4
    }
}
