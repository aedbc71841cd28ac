//! Release note collection - a pure text pipeline from commit messages to Markdown.
//!
//! Raw commit messages go into [`CommitMessageParser::parse`], which yields the
//! recognized [`ReleaseNote`]s together with the deduplicated [`CategoryTree`]
//! built from their category paths. [`write_markdown`] renders that pair into
//! the final changelog document.

pub mod category;
pub mod note;
pub mod parser;
pub mod writer;

pub use category::{format_title, CategoryId, CategoryNode, CategoryTree};
pub use note::ReleaseNote;
pub use parser::{CommitMessageParser, MarkerSyntax, ParsedNotes};
pub use writer::write_markdown;
