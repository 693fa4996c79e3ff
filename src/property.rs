//! # Property Lists
//!
//! Ordered `name=value` lists attached to containers, devices, endpoints, links and annotations.
//! Entries keep the order they were discovered in; nothing is sorted.
//!
//! Inline form:
//!
//! ```text
//! [ host="10.0.0.2", port=1883 ]
//! ```
//!
//! Block form at indent 0:
//!
//! ```text
//! [
//!   host="10.0.0.2",
//!   port=1883
//! ]
//! ```

use crate::TypedValue;
use crate::render::{NEWLINE, pad};

/// Delimiters of a bracketed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brackets {
    /// `[` ... `]`, used for configuration properties.
    Square,
    /// `{` ... `}`, used for the link and annotation block of a variable.
    Curly,
}

impl Brackets {
    fn open(self) -> char {
        match self {
            Brackets::Square => '[',
            Brackets::Curly => '{',
        }
    }

    fn close(self) -> char {
        match self {
            Brackets::Square => ']',
            Brackets::Curly => '}',
        }
    }
}

/// Lays out already rendered entries as a bracketed list.
///
/// In block form each entry sits on its own line at `indent + 2` and the closing bracket at
/// `indent`. An empty slice renders as an empty string.
pub fn render_list(entries: &[String], brackets: Brackets, indent: usize, single_line: bool) -> String {
    if entries.is_empty() {
        return String::new();
    }
    if single_line {
        return format!(
            "{} {} {}",
            brackets.open(),
            entries.join(", "),
            brackets.close()
        );
    }
    let inner = pad(indent + 2);
    let separator = format!(",{}{}", NEWLINE, inner);
    format!(
        "{}{}{}{}{}{}{}",
        brackets.open(),
        NEWLINE,
        inner,
        entries.join(&separator),
        NEWLINE,
        pad(indent),
        brackets.close()
    )
}

/// An ordered list of named typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList {
    entries: Vec<TypedValue>,
}

impl PropertyList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping insertion order.
    pub fn push(&mut self, value: TypedValue) {
        self.entries.push(value);
    }

    /// True if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.entries.iter()
    }

    /// Renders the list in square brackets, or an empty string when there are no entries.
    pub fn render(&self, indent: usize, single_line: bool) -> String {
        let entries: Vec<String> = self.entries.iter().map(TypedValue::render_assignment).collect();
        render_list(&entries, Brackets::Square, indent, single_line)
    }
}

impl FromIterator<TypedValue> for PropertyList {
    fn from_iter<I: IntoIterator<Item = TypedValue>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
