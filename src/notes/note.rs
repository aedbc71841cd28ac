use serde::{Deserialize, Serialize};

/// A single release note: its text as individual lines plus the category path
/// it was filed under, outermost category first.
///
/// Lines never contain embedded newlines - both constructors split any `\n`
/// they encounter, so a multi-line note is always a sequence of flat lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNote {
    lines: Vec<String>,
    categories: Vec<String>,
}

impl ReleaseNote {
    /// Create a note from a text block, splitting it into lines on `\n`.
    pub fn new(text: impl Into<String>, categories: Vec<String>) -> Self {
        ReleaseNote {
            lines: split_lines(&[text.into()]),
            categories,
        }
    }

    /// Create a note from already-split lines. Embedded newlines within a
    /// single entry are still normalized into separate lines.
    pub fn from_lines(lines: Vec<String>, categories: Vec<String>) -> Self {
        ReleaseNote {
            lines: split_lines(&lines),
            categories,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

fn split_lines(raw: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    for entry in raw {
        for line in entry.split('\n') {
            result.push(line.to_string());
        }
    }
    result
}
