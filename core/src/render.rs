//! Help text rendering.
//!
//! [`HelpRenderer`] turns a [`HelpLayout`] and a command's option schema
//! into plain text. Rendering is deterministic and never fails: missing
//! descriptions, empty schemas and blank command names simply omit the
//! sections that would show them.
//!
//! # Example
//!
//! ```
//! use utility_cli_core::*;
//!
//! let schema = OptionSchema::new()
//!     .with_flag(FlagSchema::with_value(Some("-s"), Some("--source"), "source")
//!         .with_description("Source directory"));
//! let layout = HelpLayout::new().description("Deploy the application.");
//!
//! let text = HelpRenderer::new(&layout).render("deploy", &schema);
//! assert!(text.contains("usage: deploy [-s <source>]"));
//! assert!(text.contains("    -s,--source <source>  Source directory"));
//! ```

use unicode_width::UnicodeWidthStr;

use crate::layout::{
    DEFAULT_DESCRIPTION_HEADING, DEFAULT_EXAMPLES_HEADING, DEFAULT_OPTIONS_HEADING,
    DEFAULT_USAGE_HEADING,
};
use crate::{FlagSchema, HelpLayout, HelpSection, OptionSchema};

const USAGE_PREFIX: &str = "usage: ";
const BLOCK_INDENT: &str = "  ";

/// Renders command help according to a layout.
#[derive(Debug, Clone, Copy)]
pub struct HelpRenderer<'a> {
    layout: &'a HelpLayout,
}

impl<'a> HelpRenderer<'a> {
    pub fn new(layout: &'a HelpLayout) -> Self {
        Self { layout }
    }

    /// Renders every configured section for `command` in layout order.
    pub fn render(&self, command: &str, schema: &OptionSchema) -> String {
        let mut lines = Vec::new();
        for section in self.layout.effective_sections() {
            let block = self.render_section(&section, command, schema);
            if let Some(block) = block {
                lines.extend(block);
                lines.push(String::new());
            }
        }

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn render_section(
        &self,
        section: &HelpSection,
        command: &str,
        schema: &OptionSchema,
    ) -> Option<Vec<String>> {
        match section {
            HelpSection::Usage { heading } => {
                if command.trim().is_empty() {
                    return None;
                }
                let heading =
                    self.heading(heading, &self.layout.usage_heading, DEFAULT_USAGE_HEADING);
                let mut block = vec![format!("{heading}:")];
                block.extend(
                    self.usage_lines(command, schema)
                        .into_iter()
                        .map(|line| format!("{BLOCK_INDENT}{line}")),
                );
                Some(block)
            }
            HelpSection::Description { heading } => {
                let text = self.layout.description.as_deref()?.trim();
                if text.is_empty() {
                    return None;
                }
                let heading = self.heading(
                    heading,
                    &self.layout.description_heading,
                    DEFAULT_DESCRIPTION_HEADING,
                );
                let mut block = vec![format!("{heading}:")];
                block.extend(self.description_lines(text));
                Some(block)
            }
            HelpSection::Options { heading } => {
                if schema.is_empty() {
                    return None;
                }
                let heading =
                    self.heading(heading, &self.layout.options_heading, DEFAULT_OPTIONS_HEADING);
                let mut block = vec![format!("{heading}:")];
                block.extend(self.option_lines(schema));
                Some(block)
            }
            HelpSection::Examples { heading } => {
                let examples = self.layout.examples.as_deref().unwrap_or_default();
                if examples.is_empty() {
                    return None;
                }
                let heading =
                    self.heading(heading, &self.layout.examples_heading, DEFAULT_EXAMPLES_HEADING);
                let mut block = vec![format!("{heading}:")];
                block.extend(examples.iter().map(|e| format!("{BLOCK_INDENT}{e}")));
                Some(block)
            }
            HelpSection::Custom { heading, lines } => {
                let mut block = vec![format!("{heading}:")];
                for line in lines.iter().flat_map(|l| l.lines()) {
                    if line.is_empty() {
                        block.push(String::new());
                    } else {
                        block.push(format!("{BLOCK_INDENT}{line}"));
                    }
                }
                Some(block)
            }
        }
    }

    fn heading<'h>(
        &self,
        section: &'h Option<String>,
        layout: &'h Option<String>,
        default: &'h str,
    ) -> &'h str {
        section
            .as_deref()
            .or(layout.as_deref())
            .unwrap_or(default)
    }

    /// `usage: cmd [-h] -c <column>`, wrapped with continuation lines
    /// aligned after the command name.
    fn usage_lines(&self, command: &str, schema: &OptionSchema) -> Vec<String> {
        let lead = format!("{USAGE_PREFIX}{command}");
        let items: Vec<String> = schema.sorted().into_iter().map(usage_item).collect();
        if items.is_empty() {
            return vec![lead];
        }

        let width = self.layout.effective_width();
        let indent = clamp_indent(lead.width() + 1, width);
        let avail = width.saturating_sub(indent);
        let filled = fill(items.iter().map(String::as_str), avail, avail);

        filled
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    format!("{lead} {line}")
                } else {
                    format!("{}{line}", " ".repeat(indent))
                }
            })
            .collect()
    }

    /// Lines that fit the width are kept verbatim. Longer lines wrap and
    /// repeat their leading indent on every continuation line.
    fn description_lines(&self, text: &str) -> Vec<String> {
        let width = self.layout.effective_width();
        let mut out = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = if i == 0 {
                format!("{BLOCK_INDENT}{}", raw.trim_end())
            } else {
                raw.trim_end().to_string()
            };
            if line.is_empty() || line.width() <= width {
                out.push(line);
                continue;
            }

            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            let avail = width.saturating_sub(indent.width());
            out.extend(
                fill(body.split_whitespace(), avail, avail)
                    .into_iter()
                    .map(|piece| format!("{indent}{piece}")),
            );
        }
        out
    }

    fn option_lines(&self, schema: &OptionSchema) -> Vec<String> {
        let left = " ".repeat(self.layout.effective_left_padding());
        let desc_pad = self.layout.effective_desc_padding();
        let width = self.layout.effective_width();

        let rows: Vec<(String, &FlagSchema)> = schema
            .sorted()
            .into_iter()
            .map(|flag| (format!("{left}{}", option_spelling(flag)), flag))
            .collect();
        let max = rows.iter().map(|(row, _)| row.width()).max().unwrap_or(0);
        let tab = clamp_indent(max + desc_pad, width);

        let mut out = Vec::new();
        for (row, flag) in rows {
            let desc = flag.description.as_deref().map(str::trim).unwrap_or("");
            if desc.is_empty() {
                out.push(row);
                continue;
            }

            let padded = format!("{row}{}", " ".repeat(max - row.width() + desc_pad));
            let avail = width.saturating_sub(tab);
            let mut first = true;
            for line in desc.lines() {
                for piece in fill(line.split_whitespace(), avail, avail) {
                    if first {
                        out.push(format!("{padded}{piece}"));
                        first = false;
                    } else {
                        out.push(format!("{}{piece}", " ".repeat(tab)));
                    }
                }
            }
            if first {
                out.push(row);
            }
        }
        out
    }
}

/// `[-s <source>]` for optional flags, `-c <column>` for required ones.
fn usage_item(flag: &FlagSchema) -> String {
    let mut item = match (&flag.short, &flag.long) {
        (Some(short), _) => short.clone(),
        (None, Some(long)) => long.clone(),
        (None, None) => String::new(),
    };
    if flag.takes_value {
        item.push_str(&format!(" <{}>", flag.value_name()));
    }
    if flag.required {
        item
    } else {
        format!("[{item}]")
    }
}

/// `-s,--source <source>`, or `   --source <source>` for long-only flags.
fn option_spelling(flag: &FlagSchema) -> String {
    let mut spelling = match (&flag.short, &flag.long) {
        (Some(short), Some(long)) => format!("{short},{long}"),
        (Some(short), None) => short.clone(),
        (None, Some(long)) => format!("   {long}"),
        (None, None) => String::new(),
    };
    if flag.takes_value {
        spelling.push_str(&format!(" <{}>", flag.value_name()));
    }
    spelling
}

fn clamp_indent(indent: usize, width: usize) -> usize {
    if indent >= width { 1 } else { indent }
}

/// Greedily packs space-separated items into lines.
///
/// The first line holds at most `first` columns and later lines `rest`.
/// An item wider than the available space gets a line of its own.
fn fill<'s>(items: impl IntoIterator<Item = &'s str>, first: usize, rest: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for item in items {
        let limit = if lines.is_empty() { first } else { rest };
        if current.is_empty() {
            current.push_str(item);
        } else if current.width() + 1 + item.width() <= limit {
            current.push(' ');
            current.push_str(item);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(item);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OptionSchema {
        OptionSchema::new()
            .with_flag(
                FlagSchema::with_value(Some("-s"), Some("--source"), "source")
                    .with_description("Source directory"),
            )
            .with_flag(
                FlagSchema::boolean(Some("-h"), Some("--help"))
                    .with_description("Print help message"),
            )
            .with_flag(
                FlagSchema::with_value(Some("-c"), Some("--column"), "column")
                    .required()
                    .with_description("Column index"),
            )
            .with_flag(FlagSchema::boolean(None, Some("--dry-run")).with_description("Do nothing"))
    }

    #[test]
    fn test_default_layout_renders_all_sections_in_order() {
        let layout = HelpLayout::new()
            .description("Deploy the application.")
            .examples(["$ app deploy -c 1"]);
        let text = HelpRenderer::new(&layout).render("deploy", &schema());

        let usage = text.find("Usage:").unwrap();
        let desc = text.find("Description:").unwrap();
        let options = text.find("Options:").unwrap();
        let examples = text.find("Examples:").unwrap();
        assert!(usage < desc && desc < options && options < examples);
        assert!(text.contains("  Deploy the application.\n"));
        assert!(text.contains("  $ app deploy -c 1\n"));
    }

    #[test]
    fn test_usage_line_sorted_and_bracketed() {
        let layout = HelpLayout::new();
        let text = HelpRenderer::new(&layout).render("deploy", &schema());
        assert!(text.contains("  usage: deploy -c <column> [--dry-run] [-h] [-s <source>]\n"));
    }

    #[test]
    fn test_option_rows_are_aligned() {
        let layout = HelpLayout::new();
        let text = HelpRenderer::new(&layout).render("deploy", &schema());
        let expected = "\
Options:
    -c,--column <column>  Column index
       --dry-run          Do nothing
    -h,--help             Print help message
    -s,--source <source>  Source directory
";
        assert!(text.contains(expected), "got:\n{text}");
    }

    #[test]
    fn test_sections_are_separated_by_blank_lines() {
        let layout = HelpLayout::new()
            .clear_sections()
            .add_custom_section("Notes", ["first", "second\nthird"])
            .add_section(HelpSection::usage());
        let text = HelpRenderer::new(&layout).render("x", &OptionSchema::new());
        assert_eq!(text, "Notes:\n  first\n  second\n  third\n\nUsage:\n  usage: x\n\n");
    }

    #[test]
    fn test_description_keeps_indentation_and_spacing() {
        let desc = "Deploy a site.\n\n### Example\n\n    $ tool deploy  --source ./docs\n";
        let layout = HelpLayout::new().description(desc);
        let text = HelpRenderer::new(&layout).render("deploy", &OptionSchema::new());
        assert!(text.contains(desc.trim()), "got:\n{text}");
        assert!(text.contains("Description:\n  Deploy a site.\n\n### Example\n"));
    }

    #[test]
    fn test_long_description_line_wraps_with_its_indent() {
        let layout = HelpLayout::new()
            .width(30)
            .description("Intro.\n    aaa bbb ccc ddd eee fff ggg hhh");
        let text = HelpRenderer::new(&layout).render(" ", &OptionSchema::new());
        assert_eq!(
            text,
            "Description:\n  Intro.\n    aaa bbb ccc ddd eee fff\n    ggg hhh\n\n"
        );
    }

    #[test]
    fn test_empty_section_list_renders_nothing() {
        let layout = HelpLayout::new().clear_sections();
        assert_eq!(HelpRenderer::new(&layout).render("deploy", &schema()), "");
    }

    #[test]
    fn test_blank_command_and_empty_schema_omit_sections() {
        let layout = HelpLayout::new();
        assert_eq!(HelpRenderer::new(&layout).render(" ", &OptionSchema::new()), "");
    }

    #[test]
    fn test_heading_overrides() {
        let layout = HelpLayout::new()
            .options_heading("Flags")
            .add_usage_section("Synopsis")
            .add_section(HelpSection::options());
        let text = HelpRenderer::new(&layout).render("deploy", &schema());
        assert!(text.starts_with("Synopsis:\n"));
        assert!(text.contains("\nFlags:\n"));
    }

    #[test]
    fn test_long_description_wraps_to_column() {
        let flag = FlagSchema::boolean(Some("-v"), None)
            .with_description("one two three four five six seven eight");
        let layout = HelpLayout::new().width(24).left_padding(2);
        let text = HelpRenderer::new(&layout)
            .render("x", &OptionSchema::new().with_flag(flag));
        let expected = "\
Options:
  -v  one two three four
      five six seven
      eight
";
        assert!(text.contains(expected), "got:\n{text}");
    }

    #[test]
    fn test_usage_wraps_after_command_name() {
        let layout = HelpLayout::new().width(30);
        let text = HelpRenderer::new(&layout).render("deploy", &schema());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  usage: deploy -c <column>");
        assert!(lines[2].starts_with("                [--dry-run]"));
    }

    #[test]
    fn test_wide_characters_measured_by_display_width() {
        let lines = fill(["漢字漢字", "ab"], 10, 10);
        assert_eq!(lines, vec!["漢字漢字", "ab"]);
        let lines = fill(["漢字", "ab"], 10, 10);
        assert_eq!(lines, vec!["漢字 ab"]);
    }
}
