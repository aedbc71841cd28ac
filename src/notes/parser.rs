use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::notes::category::CategoryTree;
use crate::notes::note::ReleaseNote;

/// Token that switches a release-note marker into multi-line mode.
const MULTI_LINE_MARKER: &str = "|";

/// The marker convention recognized in commit messages.
///
/// Both conventions share the same grammar and differ only in the header
/// prefix and the multi-line terminator. [`MarkerSyntax::Chevron`] is the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSyntax {
    /// `>> release note:` headers, multi-line bodies terminated by `<<<`.
    #[default]
    Chevron,
    /// `-- release note:` headers, multi-line bodies terminated by `---`.
    Dashed,
}

impl MarkerSyntax {
    /// Header pattern, case-insensitive with flexible internal whitespace,
    /// anchored at the start of a trimmed line.
    fn header_pattern(&self) -> &'static str {
        match self {
            MarkerSyntax::Chevron => r"(?i)^>>\s*release\s+note\s*:",
            MarkerSyntax::Dashed => r"(?i)^--\s*release\s+note\s*:",
        }
    }

    fn terminator(&self) -> &'static str {
        match self {
            MarkerSyntax::Chevron => "<<<",
            MarkerSyntax::Dashed => "---",
        }
    }
}

/// Everything one parse run produces: the recognized notes plus the category
/// tree their paths were resolved against.
///
/// The notes carry the tree's canonical formatted paths, so tree and notes
/// always agree on exact category strings.
#[derive(Debug, Clone, Default)]
pub struct ParsedNotes {
    pub notes: Vec<ReleaseNote>,
    pub categories: CategoryTree,
}

/// Scans raw commit messages for release-note markers.
///
/// One parser instance processes a whole batch of messages against a single
/// shared category tree, so identical category paths across different commits
/// collapse onto the same nodes regardless of raw casing or spacing.
pub struct CommitMessageParser {
    syntax: MarkerSyntax,
    header: Regex,
    category: Regex,
}

impl CommitMessageParser {
    pub fn new() -> Self {
        CommitMessageParser::with_syntax(MarkerSyntax::default())
    }

    pub fn with_syntax(syntax: MarkerSyntax) -> Self {
        CommitMessageParser {
            syntax,
            header: Regex::new(syntax.header_pattern()).unwrap(),
            category: Regex::new(r"^\[([^\]]+)\]").unwrap(),
        }
    }

    pub fn syntax(&self) -> MarkerSyntax {
        self.syntax
    }

    /// Parse a batch of commit messages into notes and their category tree.
    ///
    /// Sibling categories come back sorted alphabetically at every level,
    /// which fixes the final Markdown section order.
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub fn parse(&self, messages: &[String]) -> ParsedNotes {
        let mut result = ParsedNotes::default();

        for message in messages {
            self.parse_message(message, &mut result);
        }

        result.categories.sort_by_title();

        debug!(notes = result.notes.len(), "commit message scan complete");
        result
    }

    fn parse_message(&self, message: &str, result: &mut ParsedNotes) {
        let lines: Vec<&str> = message.split('\n').map(str::trim).collect();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            i += 1;

            let header = match self.header.find(line) {
                Some(header) => header,
                None => continue,
            };
            let mut rest = line[header.end()..].trim();

            // Leading bracketed segments form the category path. Extraction
            // stops at the first non-matching remainder, so an unclosed
            // bracket simply becomes body text.
            let mut raw_categories: Vec<String> = Vec::new();
            while let Some(caps) = self.category.captures(rest) {
                match (caps.get(0), caps.get(1)) {
                    (Some(whole), Some(name)) => {
                        raw_categories.push(name.as_str().trim().to_string());
                        rest = rest[whole.end()..].trim_start();
                    }
                    _ => break,
                }
            }

            let body_lines: Vec<String> = if rest == MULTI_LINE_MARKER {
                // Consume lines until the terminator or the end of the
                // message. A missing terminator is accepted, which covers
                // notes at the very end of the last message.
                let mut buffer = Vec::new();
                while i < lines.len() {
                    let next = lines[i];
                    i += 1;
                    if next == self.syntax.terminator() {
                        break;
                    }
                    buffer.push(next.to_string());
                }
                buffer
            } else {
                vec![rest.to_string()]
            };

            // Notes with an empty body are discarded entirely; their
            // categories must not leak into the tree.
            if body_lines.join("\n").trim().is_empty() {
                continue;
            }

            let raw_refs: Vec<&str> = raw_categories.iter().map(String::as_str).collect();
            let categories = match result.categories.resolve_or_create(&raw_refs) {
                Some(id) => result.categories.path_titles(id),
                None => Vec::new(),
            };

            result
                .notes
                .push(ReleaseNote::from_lines(body_lines, categories));
        }
    }
}

impl Default for CommitMessageParser {
    fn default() -> Self {
        CommitMessageParser::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(messages: &[&str]) -> ParsedNotes {
        let messages: Vec<String> = messages.iter().map(|m| m.to_string()).collect();
        CommitMessageParser::new().parse(&messages)
    }

    fn root_titles(parsed: &ParsedNotes) -> Vec<String> {
        parsed
            .categories
            .roots()
            .iter()
            .map(|&id| parsed.categories.node(id).title().to_string())
            .collect()
    }

    fn child_titles(parsed: &ParsedNotes, path: &[&str]) -> Vec<String> {
        let id = parsed.categories.find(path).unwrap();
        parsed
            .categories
            .node(id)
            .children()
            .iter()
            .map(|&child| parsed.categories.node(child).title().to_string())
            .collect()
    }

    #[test]
    fn test_parse_empty_messages() {
        let parsed = parse(&[]);
        assert!(parsed.notes.is_empty());
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_parse_message_without_release_note() {
        let parsed = parse(&["this is just some commit message"]);
        assert!(parsed.notes.is_empty());
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let parsed = parse(&["release notes must start at the line start >> release note: foo"]);
        assert!(parsed.notes.is_empty());
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_indented_marker_is_recognized() {
        let parsed = parse(&["subject\n\n    >> release note: Indented note"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new("Indented note", vec![])]
        );
    }

    #[test]
    fn test_header_is_case_insensitive_with_flexible_whitespace() {
        let parsed = parse(&[">> Release  Note : Some note"]);
        assert_eq!(parsed.notes, [ReleaseNote::new("Some note", vec![])]);
    }

    #[test]
    fn test_single_line_note_without_category() {
        let parsed = parse(&["subject\n\n>> release note: Note without category"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new("Note without category", vec![])]
        );
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_single_line_note_with_single_category() {
        let parsed = parse(&["subject\n\n>> release note: [a] Categorized note"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new("Categorized note", vec!["A".to_string()])]
        );
        assert_eq!(root_titles(&parsed), ["A"]);
    }

    #[test]
    fn test_single_line_note_with_nested_category() {
        let parsed = parse(&["subject\n\n>> release note: [a][b] Nested note"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new(
                "Nested note",
                vec!["A".to_string(), "B".to_string()]
            )]
        );
        assert_eq!(root_titles(&parsed), ["A"]);
        assert_eq!(child_titles(&parsed, &["a"]), ["B"]);
    }

    #[test]
    fn test_space_between_category_brackets() {
        let parsed = parse(&[">> release note: [a] [b] Text"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new(
                "Text",
                vec!["A".to_string(), "B".to_string()]
            )]
        );
    }

    #[test]
    fn test_unclosed_bracket_becomes_body_text() {
        let parsed = parse(&[">> release note: [a] [broken text"]);
        assert_eq!(
            parsed.notes,
            [ReleaseNote::new("[broken text", vec!["A".to_string()])]
        );
        assert_eq!(root_titles(&parsed), ["A"]);
    }

    #[test]
    fn test_note_stores_canonical_formatted_path() {
        let parsed = parse(&[
            ">> release note: [known issues] First",
            ">> release note: [KNOWN   ISSUES] Second",
        ]);

        assert_eq!(parsed.notes[0].categories(), ["Known Issues"]);
        assert_eq!(parsed.notes[1].categories(), ["KNOWN ISSUES"]);
        assert_eq!(root_titles(&parsed), ["KNOWN ISSUES", "Known Issues"]);
    }

    #[test]
    fn test_same_path_across_messages_resolves_to_one_node() {
        let parsed = parse(&[
            ">> release note: [a][b] First",
            "other subject\n>> release note: [a][b] Second",
        ]);

        assert_eq!(root_titles(&parsed), ["A"]);
        assert_eq!(child_titles(&parsed, &["a"]), ["B"]);
        assert_eq!(parsed.notes.len(), 2);
    }

    #[test]
    fn test_categories_are_sorted_alphabetically_at_every_level() {
        let parsed = parse(&[
            "subject\n\n>> release note: [b][a] First\nnoise\n>> release note: [a][b] Second\n>> release note: [a][a] Third",
        ]);

        assert_eq!(
            parsed.notes,
            [
                ReleaseNote::new("First", vec!["B".to_string(), "A".to_string()]),
                ReleaseNote::new("Second", vec!["A".to_string(), "B".to_string()]),
                ReleaseNote::new("Third", vec!["A".to_string(), "A".to_string()]),
            ]
        );
        assert_eq!(root_titles(&parsed), ["A", "B"]);
        assert_eq!(child_titles(&parsed, &["a"]), ["A", "B"]);
        assert_eq!(child_titles(&parsed, &["b"]), ["A"]);
    }

    #[test]
    fn test_multi_line_note() {
        let parsed = parse(&[
            "subject\n\n>> release note: |\nLine 1\n\nLine 3\n<<<\nsome more noise",
        ]);

        assert_eq!(
            parsed.notes,
            [ReleaseNote::from_lines(
                vec!["Line 1".to_string(), "".to_string(), "Line 3".to_string()],
                vec![]
            )]
        );
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_multi_line_note_with_nested_category() {
        let parsed = parse(&[
            "subject\n\n>> release note: [a][b] |\nLine 1\n\nLine 3\n<<<",
        ]);

        assert_eq!(
            parsed.notes,
            [ReleaseNote::from_lines(
                vec!["Line 1".to_string(), "".to_string(), "Line 3".to_string()],
                vec!["A".to_string(), "B".to_string()]
            )]
        );
        assert_eq!(root_titles(&parsed), ["A"]);
        assert_eq!(child_titles(&parsed, &["a"]), ["B"]);
    }

    #[test]
    fn test_multi_line_note_without_terminator_at_end_of_input() {
        let parsed = parse(&[
            ">> release note: |\nLine 1\n<<<\nnoise\n>> release note: |\nLine 4\nLine 5",
        ]);

        assert_eq!(
            parsed.notes,
            [
                ReleaseNote::from_lines(vec!["Line 1".to_string()], vec![]),
                ReleaseNote::from_lines(vec!["Line 4".to_string(), "Line 5".to_string()], vec![]),
            ]
        );
    }

    #[test]
    fn test_marker_inside_multi_line_body_is_body_text() {
        let parsed = parse(&[
            ">> release note: |\nLine 1\n>> release note: not a new note\n<<<",
        ]);

        assert_eq!(
            parsed.notes,
            [ReleaseNote::from_lines(
                vec![
                    "Line 1".to_string(),
                    ">> release note: not a new note".to_string()
                ],
                vec![]
            )]
        );
    }

    #[test]
    fn test_empty_body_is_discarded() {
        let parsed = parse(&[">> release note: [C]"]);
        assert!(parsed.notes.is_empty());
        // No category side effects from a discarded note.
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_empty_multi_line_body_is_discarded() {
        let parsed = parse(&[">> release note: [C] |\n\n\n<<<"]);
        assert!(parsed.notes.is_empty());
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_bare_marker_is_discarded() {
        let parsed = parse(&[">> release note:   "]);
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_dashed_syntax() {
        let messages = vec![
            "subject\n\n-- release note: [a] Single\n-- release note: |\nLine 1\nLine 2\n---\nnoise".to_string(),
        ];
        let parsed = CommitMessageParser::with_syntax(MarkerSyntax::Dashed).parse(&messages);

        assert_eq!(
            parsed.notes,
            [
                ReleaseNote::new("Single", vec!["A".to_string()]),
                ReleaseNote::from_lines(
                    vec!["Line 1".to_string(), "Line 2".to_string()],
                    vec![]
                ),
            ]
        );
    }

    #[test]
    fn test_chevron_parser_ignores_dashed_markers() {
        let parsed = parse(&["-- release note: Dashed note"]);
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_marker_syntax_serde_round_trip() {
        let json = serde_json::to_string(&MarkerSyntax::Dashed).unwrap();
        assert_eq!(json, "\"dashed\"");
        let back: MarkerSyntax = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MarkerSyntax::Dashed);
        assert_eq!(MarkerSyntax::default(), MarkerSyntax::Chevron);
    }
}
