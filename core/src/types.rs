//! Option schema type definitions.
//!
//! This module defines the data model used to describe which flags a command
//! accepts. The types are plain values that derive [`serde`] traits so they
//! can be declared in configuration files as well as in code.

use serde::{Deserialize, Serialize};

/// Placeholder shown in usage text when a value flag has no explicit name.
pub const DEFAULT_VALUE_NAME: &str = "arg";

/// Schema for a single command-line flag.
///
/// A flag has an optional short form (e.g., `-s`) and/or long form
/// (e.g., `--source`), and either acts as a switch or takes one value per
/// occurrence.
///
/// Use the constructor methods [`boolean`](FlagSchema::boolean) and
/// [`with_value`](FlagSchema::with_value) to create flags, then chain
/// builder methods like [`with_description`](FlagSchema::with_description).
///
/// # Examples
///
/// ```
/// use utility_cli_core::FlagSchema;
///
/// // Switch
/// let verbose = FlagSchema::boolean(Some("-v"), Some("--verbose"))
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.canonical_name(), "verbose");
/// assert!(!verbose.takes_value);
///
/// // Flag that takes a value
/// let source = FlagSchema::with_value(Some("-s"), Some("--source"), "source").required();
/// assert!(source.takes_value);
/// assert!(source.required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSchema {
    /// Short form (e.g., "-s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long form (e.g., "--source")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Whether each occurrence consumes a value
    #[serde(default)]
    pub takes_value: bool,
    /// Placeholder for the value in usage and options text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    /// Whether parsing fails when the flag is absent
    #[serde(default)]
    pub required: bool,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlagSchema {
    /// Creates a switch (no value).
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::FlagSchema;
    ///
    /// let flag = FlagSchema::boolean(Some("-h"), Some("--help"));
    /// assert!(!flag.takes_value);
    /// assert!(flag.matches("-h"));
    /// assert!(flag.matches("--help"));
    /// ```
    pub fn boolean(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value: false,
            value_name: None,
            required: false,
            description: None,
        }
    }

    /// Creates a flag that takes a value, shown as `<value_name>` in help.
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::FlagSchema;
    ///
    /// let flag = FlagSchema::with_value(Some("-c"), Some("--column"), "column");
    /// assert!(flag.takes_value);
    /// assert_eq!(flag.value_name(), "column");
    /// ```
    pub fn with_value(short: Option<&str>, long: Option<&str>, value_name: &str) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value: true,
            value_name: Some(value_name.to_string()),
            required: false,
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks the flag as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the canonical name without dashes (long form preferred).
    ///
    /// Parsed values are stored under this name.
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::FlagSchema;
    ///
    /// let flag = FlagSchema::boolean(Some("-v"), Some("--verbose"));
    /// assert_eq!(flag.canonical_name(), "verbose");
    ///
    /// let short_only = FlagSchema::boolean(Some("-v"), None);
    /// assert_eq!(short_only.canonical_name(), "v");
    /// ```
    pub fn canonical_name(&self) -> &str {
        self.long
            .as_deref()
            .map(|l| l.trim_start_matches('-'))
            .or(self.short.as_deref().map(|s| s.trim_start_matches('-')))
            .unwrap_or("unknown")
    }

    /// Returns the sort key used by help output: the short spelling if
    /// present, else the long one, both without dashes.
    pub fn sort_key(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .map(|s| s.trim_start_matches('-'))
            .unwrap_or("")
    }

    /// Returns the value placeholder, falling back to [`DEFAULT_VALUE_NAME`].
    pub fn value_name(&self) -> &str {
        self.value_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_VALUE_NAME)
    }

    /// Returns the short form as a single character, if it is one.
    pub fn short_char(&self) -> Option<char> {
        let rest = self.short.as_deref()?.strip_prefix('-')?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' => Some(c),
            _ => None,
        }
    }

    /// Returns the long form without its leading dashes.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref().and_then(|l| l.strip_prefix("--"))
    }

    /// Iterates over the spellings this flag defines.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }

    /// Checks if this flag matches a given string (short or long form).
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::FlagSchema;
    ///
    /// let flag = FlagSchema::boolean(Some("-v"), Some("--verbose"));
    /// assert!(flag.matches("-v"));
    /// assert!(flag.matches("--verbose"));
    /// assert!(!flag.matches("-x"));
    /// ```
    pub fn matches(&self, s: &str) -> bool {
        self.short.as_deref() == Some(s) || self.long.as_deref() == Some(s)
    }

    /// Returns true when the two flags share any spelling.
    pub fn overlaps(&self, other: &FlagSchema) -> bool {
        self.spellings().any(|s| other.matches(s))
    }
}

/// The set of flags accepted by one command.
///
/// Flags keep their declaration order; help output sorts them separately.
///
/// # Examples
///
/// ```
/// use utility_cli_core::{FlagSchema, OptionSchema};
///
/// let schema = OptionSchema::new()
///     .with_flag(FlagSchema::with_value(Some("-s"), Some("--source"), "source"))
///     .with_flag(FlagSchema::boolean(Some("-q"), Some("--quiet")));
///
/// assert_eq!(schema.len(), 2);
/// assert!(schema.find("--quiet").is_some());
/// assert!(schema.find("-x").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSchema {
    flags: Vec<FlagSchema>,
}

impl OptionSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag.
    pub fn with_flag(mut self, flag: FlagSchema) -> Self {
        self.flags.push(flag);
        self
    }

    /// Adds a flag in place.
    pub fn push(&mut self, flag: FlagSchema) {
        self.flags.push(flag);
    }

    /// Finds a flag by short or long form.
    pub fn find(&self, spelling: &str) -> Option<&FlagSchema> {
        self.flags.iter().find(|f| f.matches(spelling))
    }

    /// Returns true when any flag already claims one of `flag`'s spellings
    /// or its canonical name.
    pub fn conflicts_with(&self, flag: &FlagSchema) -> bool {
        self.flags
            .iter()
            .any(|f| f.overlaps(flag) || f.canonical_name() == flag.canonical_name())
    }

    /// Iterates over the flags in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlagSchema> {
        self.flags.iter()
    }

    /// Returns the flags sorted the way help output lists them.
    pub fn sorted(&self) -> Vec<&FlagSchema> {
        let mut flags: Vec<&FlagSchema> = self.flags.iter().collect();
        flags.sort_by_key(|f| f.sort_key().to_lowercase());
        flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<FlagSchema> for OptionSchema {
    fn from_iter<I: IntoIterator<Item = FlagSchema>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OptionSchema {
    type Item = &'a FlagSchema;
    type IntoIter = std::slice::Iter<'a, FlagSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
