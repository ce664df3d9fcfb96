//! Splits one line of a tree diagram into its nesting depth and entry name.
//!
//! Depth is inferred from the width of the connector prefix: the two branch
//! connectors are widened to fixed three-column fillers and the resulting
//! length is divided by four. Diagrams indented with anything other than four
//! columns per level (tabs, two-space indents) only get an approximate depth.

use super::error::ParseError;
use super::sanitizer::sanitize_name;

/// Columns per nesting level.
pub const INDENT_WIDTH: usize = 4;

const TEE_CONNECTOR: &str = "├──";
const CORNER_CONNECTOR: &str = "└──";
const TEE_FILLER: &str = "│  ";
const CORNER_FILLER: &str = "   ";

/// One raw line of input with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> InputLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Whitespace-only lines are skipped without any event.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A line that was successfully classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub depth: usize,
    /// The name as written, trailing whitespace removed, directory marker kept.
    pub raw_name: String,
    /// Decided from the raw name, never from the sanitized one.
    pub is_directory: bool,
    /// Never empty.
    pub sanitized_name: String,
}

fn is_prefix_char(c: char) -> bool {
    matches!(c, '│' | '├' | '└' | '─') || c.is_whitespace()
}

/// Box-drawing glyphs the prefix does not understand, e.g. `┣` or `╰`.
fn is_foreign_glyph(c: char) -> bool {
    ('\u{2500}'..='\u{257F}').contains(&c) && !is_prefix_char(c)
}

/// Splits a line into its connector prefix and the remaining name part.
///
/// Returns `None` when the name part starts with an unknown box-drawing glyph
/// or contains control characters, i.e. the prefix cannot be cleanly separated.
pub fn split_prefix(text: &str) -> Option<(&str, &str)> {
    let split_at = text
        .char_indices()
        .find(|(_, c)| !is_prefix_char(*c))
        .map_or(text.len(), |(idx, _)| idx);
    let (prefix, rest) = text.split_at(split_at);

    let has_control = rest.chars().any(|c| c.is_control() && !c.is_whitespace());
    if rest.starts_with(is_foreign_glyph) || has_control {
        return None;
    }
    Some((prefix, rest))
}

/// Nesting depth of a connector prefix.
pub fn depth_of(prefix: &str) -> usize {
    let normalized = prefix
        .replace(TEE_CONNECTOR, TEE_FILLER)
        .replace(CORNER_CONNECTOR, CORNER_FILLER);
    normalized.chars().count() / INDENT_WIDTH
}

/// Classifies a non-blank line.
///
/// Fails with [`ParseError::Unparseable`] when the prefix cannot be split from
/// the name, and with [`ParseError::EmptyName`] when sanitization leaves
/// nothing to create.
pub fn classify_line(line: &InputLine<'_>) -> Result<ParsedEntry, ParseError> {
    let (prefix, rest) = split_prefix(line.text).ok_or_else(|| ParseError::Unparseable {
        line: line.number,
        content: line.text.to_string(),
    })?;

    let depth = depth_of(prefix);
    let raw_name = rest.trim_end();

    let (is_directory, name_to_clean) = match raw_name.strip_suffix('/') {
        Some(stripped) => (true, stripped),
        None => (false, raw_name),
    };

    let sanitized_name = sanitize_name(name_to_clean);
    if sanitized_name.is_empty() {
        return Err(ParseError::EmptyName { line: line.number });
    }

    Ok(ParsedEntry {
        depth,
        raw_name: raw_name.to_string(),
        is_directory,
        sanitized_name,
    })
}
