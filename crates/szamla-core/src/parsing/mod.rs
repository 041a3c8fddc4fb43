pub mod amounts;
pub mod multialarm;
pub mod patterns;
pub mod vodafone;
pub mod volvo;

use serde::{Deserialize, Serialize};

/// A source line or row that a parser looked at and dropped.
///
/// Dropping stays silent in the row output; this is only a report of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_text: String,
    pub reason: String,
}

impl SkippedLine {
    pub fn new(line_text: impl Into<String>, reason: impl Into<String>) -> Self {
        SkippedLine {
            line_text: line_text.into(),
            reason: reason.into(),
        }
    }
}

/// Rows extracted by a layout parser plus what it skipped on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRows<T> {
    pub rows: Vec<T>,
    pub skipped_lines: Vec<SkippedLine>,
}

impl<T> Default for ParsedRows<T> {
    fn default() -> Self {
        ParsedRows {
            rows: Vec::new(),
            skipped_lines: Vec::new(),
        }
    }
}

impl<T> ParsedRows<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Field arity of a right-to-left split.
///
/// Lines are split from the right on single spaces into at most
/// `expected_fields` parts. When `optional_field_index` is set, a line that
/// yields one part fewer gets an empty field inserted at that index instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPolicy {
    pub expected_fields: usize,
    pub optional_field_index: Option<usize>,
}

impl SplitPolicy {
    pub const fn exact(expected_fields: usize) -> Self {
        SplitPolicy {
            expected_fields,
            optional_field_index: None,
        }
    }

    pub const fn with_optional(expected_fields: usize, optional_field_index: usize) -> Self {
        SplitPolicy {
            expected_fields,
            optional_field_index: Some(optional_field_index),
        }
    }

    /// Split `line` according to this policy.
    ///
    /// Returns None when the line has too few separators for the arity, or
    /// when the optional index lies outside the field count.
    pub fn split(&self, line: &str) -> Option<Vec<String>> {
        match self.optional_field_index {
            None => {
                let parts = rsplit_fields(line, self.expected_fields);
                (parts.len() == self.expected_fields).then_some(parts)
            }
            Some(idx) => {
                let present = self.expected_fields.checked_sub(1)?;
                if present == 0 || idx > present {
                    return None;
                }
                let mut parts = rsplit_fields(line, present);
                if parts.len() != present {
                    return None;
                }
                parts.insert(idx, String::new());
                Some(parts)
            }
        }
    }
}

/// Split from the right on single spaces into at most `max_parts` parts,
/// keeping the left remainder intact. Parts come back in line order.
///
/// Consecutive spaces yield empty parts, the same as a plain `rsplitn`.
pub fn rsplit_fields(line: &str, max_parts: usize) -> Vec<String> {
    let mut parts: Vec<String> = line
        .rsplitn(max_parts.max(1), ' ')
        .map(str::to_string)
        .collect();
    parts.reverse();
    parts
}
