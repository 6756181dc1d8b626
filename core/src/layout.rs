//! Help layout configuration.
//!
//! A [`HelpLayout`] decides which help sections are rendered, in which
//! order, and with which widths and headings. Layouts are immutable values
//! built fluently and combined with [`HelpLayout::merged_with`]: the
//! registry starts from the process-wide default and lets a per-command
//! layout override only the fields it sets.

use serde::{Deserialize, Serialize};

/// Default total line width of rendered help.
pub const DEFAULT_WIDTH: usize = 100;
/// Default indentation of option rows.
pub const DEFAULT_LEFT_PADDING: usize = 4;
/// Default gap between an option's spelling and its description.
pub const DEFAULT_DESC_PADDING: usize = 2;

pub const DEFAULT_USAGE_HEADING: &str = "Usage";
pub const DEFAULT_DESCRIPTION_HEADING: &str = "Description";
pub const DEFAULT_OPTIONS_HEADING: &str = "Options";
pub const DEFAULT_EXAMPLES_HEADING: &str = "Examples";

/// One renderable block of command help.
///
/// Built-in kinds take an optional heading that overrides the layout-wide
/// heading for that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HelpSection {
    /// Invocation syntax derived from the option schema.
    Usage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
    },
    /// The command description paragraph.
    Description {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
    },
    /// Every flag of the merged schema.
    Options {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
    },
    /// The stored example invocations.
    Examples {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
    },
    /// Arbitrary text under a caller-chosen heading.
    Custom {
        heading: String,
        #[serde(default)]
        lines: Vec<String>,
    },
}

impl HelpSection {
    pub fn usage() -> Self {
        Self::Usage { heading: None }
    }

    pub fn description() -> Self {
        Self::Description { heading: None }
    }

    pub fn options() -> Self {
        Self::Options { heading: None }
    }

    pub fn examples() -> Self {
        Self::Examples { heading: None }
    }

    /// Creates a custom section. Lines may contain embedded newlines.
    pub fn custom<I, S>(heading: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Custom {
            heading: heading.to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered help sections plus formatting parameters.
///
/// Every field is optional so that a layout can describe just the parts it
/// wants to change. `sections: None` means "use the default ordering"
/// (usage, description, options, examples), while an explicitly empty list
/// renders nothing at all.
///
/// # Examples
///
/// ```
/// use utility_cli_core::{HelpLayout, HelpSection};
///
/// let base = HelpLayout::new().width(80).left_padding(2);
/// let command = HelpLayout::new()
///     .width(120)
///     .add_usage_section("Synopsis")
///     .add_custom_section("Notes", ["Reads stdin."]);
///
/// let effective = base.merged_with(&command);
/// assert_eq!(effective.effective_width(), 120);
/// assert_eq!(effective.effective_left_padding(), 2);
/// assert_eq!(effective.effective_sections().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelpLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<HelpSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_padding: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_padding: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples_heading: Option<String>,
    /// Description text; overrides the one stored with the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Example lines; override the ones stored with the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl HelpLayout {
    /// Creates a layout that sets nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, value: usize) -> Self {
        self.width = Some(value);
        self
    }

    pub fn left_padding(mut self, value: usize) -> Self {
        self.left_padding = Some(value);
        self
    }

    pub fn desc_padding(mut self, value: usize) -> Self {
        self.desc_padding = Some(value);
        self
    }

    pub fn usage_heading(mut self, heading: &str) -> Self {
        self.usage_heading = Some(heading.to_string());
        self
    }

    pub fn description_heading(mut self, heading: &str) -> Self {
        self.description_heading = Some(heading.to_string());
        self
    }

    pub fn options_heading(mut self, heading: &str) -> Self {
        self.options_heading = Some(heading.to_string());
        self
    }

    pub fn examples_heading(mut self, heading: &str) -> Self {
        self.examples_heading = Some(heading.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn examples<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a section, switching the layout to an explicit ordering.
    pub fn add_section(mut self, section: HelpSection) -> Self {
        self.sections.get_or_insert_with(Vec::new).push(section);
        self
    }

    pub fn add_usage_section(self, heading: &str) -> Self {
        self.add_section(HelpSection::Usage {
            heading: Some(heading.to_string()),
        })
    }

    pub fn add_description_section(self, heading: &str) -> Self {
        self.add_section(HelpSection::Description {
            heading: Some(heading.to_string()),
        })
    }

    pub fn add_options_section(self, heading: &str) -> Self {
        self.add_section(HelpSection::Options {
            heading: Some(heading.to_string()),
        })
    }

    pub fn add_examples_section(self, heading: &str) -> Self {
        self.add_section(HelpSection::Examples {
            heading: Some(heading.to_string()),
        })
    }

    pub fn add_custom_section<I, S>(self, heading: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_section(HelpSection::custom(heading, lines))
    }

    /// Replaces any sections with an explicitly empty list.
    ///
    /// A layout in this state renders no output.
    pub fn clear_sections(mut self) -> Self {
        self.sections = Some(Vec::new());
        self
    }

    /// Returns true when a non-empty section list has been configured.
    pub fn has_sections(&self) -> bool {
        self.sections.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Returns a copy of `self` with every field `other` sets applied on top.
    ///
    /// A non-empty section list in `other` replaces the whole list; it is
    /// never appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use utility_cli_core::{HelpLayout, HelpSection};
    ///
    /// let base = HelpLayout::new()
    ///     .add_section(HelpSection::usage())
    ///     .add_section(HelpSection::options());
    /// let other = HelpLayout::new().add_section(HelpSection::examples());
    ///
    /// let merged = base.merged_with(&other);
    /// assert_eq!(merged.effective_sections(), vec![HelpSection::examples()]);
    /// ```
    pub fn merged_with(&self, other: &HelpLayout) -> HelpLayout {
        let mut merged = self.clone();
        if other.has_sections() {
            merged.sections = other.sections.clone();
        }
        overwrite(&mut merged.width, &other.width);
        overwrite(&mut merged.left_padding, &other.left_padding);
        overwrite(&mut merged.desc_padding, &other.desc_padding);
        overwrite(&mut merged.usage_heading, &other.usage_heading);
        overwrite(&mut merged.description_heading, &other.description_heading);
        overwrite(&mut merged.options_heading, &other.options_heading);
        overwrite(&mut merged.examples_heading, &other.examples_heading);
        overwrite(&mut merged.description, &other.description);
        overwrite(&mut merged.examples, &other.examples);
        merged
    }

    /// Returns the sections to render, applying the default ordering when
    /// none were configured.
    pub fn effective_sections(&self) -> Vec<HelpSection> {
        match &self.sections {
            Some(sections) => sections.clone(),
            None => default_sections(),
        }
    }

    pub fn effective_width(&self) -> usize {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn effective_left_padding(&self) -> usize {
        self.left_padding.unwrap_or(DEFAULT_LEFT_PADDING)
    }

    pub fn effective_desc_padding(&self) -> usize {
        self.desc_padding.unwrap_or(DEFAULT_DESC_PADDING)
    }
}

/// The ordering used when a layout configures no sections.
pub fn default_sections() -> Vec<HelpSection> {
    vec![
        HelpSection::usage(),
        HelpSection::description(),
        HelpSection::options(),
        HelpSection::examples(),
    ]
}

fn overwrite<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}
