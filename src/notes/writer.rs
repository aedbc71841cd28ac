use tracing::debug;

use crate::notes::category::{CategoryId, CategoryTree};
use crate::notes::note::ReleaseNote;

/// Render release notes grouped by their category tree into a Markdown
/// document.
///
/// Root categories become `## ` sections separated by blank lines; nested
/// categories become bold bullet lines with their notes indented one level
/// further. A note belongs to the node whose full path equals its formatted
/// category path exactly.
pub fn write_markdown(notes: &[ReleaseNote], categories: &CategoryTree) -> String {
    let mut lines: Vec<String> = Vec::new();

    for &root in categories.roots() {
        write_category(notes, categories, root, 0, &mut lines);
        lines.push(String::new());
    }

    let output = lines.join("\n");
    debug!(output_len = output.len(), "markdown rendered");
    output
}

fn write_category(
    notes: &[ReleaseNote],
    tree: &CategoryTree,
    id: CategoryId,
    depth: usize,
    out: &mut Vec<String>,
) {
    let node = tree.node(id);

    if depth == 0 {
        out.push(format!("## {}", node.title()));
        out.push(String::new());
    } else {
        let mut title = node.title().to_string();
        if !title.ends_with(':') {
            title.push(':');
        }
        out.push(format!("{}* **{}**", " ".repeat((depth - 1) * 4), title));
    }

    let indent = " ".repeat(depth * 4);
    for note in tree.contained_notes(id, notes) {
        for (i, line) in note.lines().iter().enumerate() {
            if i == 0 {
                out.push(format!("{}* {}", indent, line));
            } else {
                // Continuation lines keep the bullet's text column, so
                // multi-line content such as fenced code blocks stays intact.
                out.push(format!("{}  {}", indent, line));
            }
        }
    }

    for &child in node.children() {
        write_category(notes, tree, child, depth + 1, out);
    }
}
