use serde::{Deserialize, Serialize};

use crate::notes::note::ReleaseNote;

/// Handle to a node inside a [`CategoryTree`].
///
/// The tree owns all nodes in one arena; parent back-references are handles
/// instead of owning pointers, so walking up for path reconstruction never
/// creates a reference cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryId(usize);

/// One level of the category hierarchy with its display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    title: String,
    parent: Option<CategoryId>,
    children: Vec<CategoryId>,
}

impl CategoryNode {
    /// The display-formatted title of this category.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<CategoryId> {
        self.parent
    }

    /// Direct sub-categories, in sibling order.
    pub fn children(&self) -> &[CategoryId] {
        &self.children
    }
}

/// The deduplicated hierarchy of all category paths.
///
/// Sibling titles are unique at every level; the resolve-or-create discipline
/// of the construction API guarantees it. Sibling order is first-seen order
/// until [`CategoryTree::sort_by_title`] rearranges it alphabetically.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
    roots: Vec<CategoryId>,
}

impl CategoryTree {
    pub fn new() -> Self {
        CategoryTree::default()
    }

    /// Build a tree from a batch of title paths (outermost first).
    ///
    /// Each path walks or creates nodes level by level; segments are
    /// title-formatted, and a segment matching an existing sibling reuses
    /// that node.
    pub fn from_titles(paths: &[&[&str]]) -> Self {
        let mut tree = CategoryTree::new();
        for path in paths {
            tree.resolve_or_create(path);
        }
        tree
    }

    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node(&self, id: CategoryId) -> &CategoryNode {
        &self.nodes[id.0]
    }

    /// Exact-path lookup. Returns `None` if any segment is absent, or for an
    /// empty path. Segments are title-formatted before comparison.
    pub fn find(&self, path: &[&str]) -> Option<CategoryId> {
        let mut current = None;
        for segment in path {
            current = Some(self.find_child(current, &format_title(segment))?);
        }
        current
    }

    /// Walk the given path, creating any missing nodes, and return the handle
    /// of the deepest one. Returns `None` only for an empty path.
    ///
    /// New nodes are appended at the end of their sibling list, so pre-existing
    /// sibling order is never disturbed.
    pub fn resolve_or_create(&mut self, path: &[&str]) -> Option<CategoryId> {
        let mut current = None;
        for segment in path {
            let title = format_title(segment);
            let id = match self.find_child(current, &title) {
                Some(id) => id,
                None => self.push_node(title, current),
            };
            current = Some(id);
        }
        current
    }

    /// Full title path of a node, root-first, reconstructed via the parent
    /// back-references.
    pub fn path_titles(&self, id: CategoryId) -> Vec<String> {
        let mut titles = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let node = &self.nodes[c.0];
            titles.push(node.title.clone());
            current = node.parent;
        }
        titles.reverse();
        titles
    }

    /// The notes whose title-formatted category path equals this node's full
    /// path exactly. No prefix or subtree matching - callers recurse over
    /// children for subtree behavior.
    pub fn contained_notes<'a>(
        &self,
        id: CategoryId,
        notes: &'a [ReleaseNote],
    ) -> Vec<&'a ReleaseNote> {
        let titles = self.path_titles(id);
        notes
            .iter()
            .filter(|note| {
                note.categories().len() == titles.len()
                    && note
                        .categories()
                        .iter()
                        .map(|raw| format_title(raw))
                        .eq(titles.iter().cloned())
            })
            .collect()
    }

    /// Merge another tree into this one.
    ///
    /// Nodes whose title matches an existing sibling are merged recursively;
    /// new nodes are appended (with their whole subtree) at the end of the
    /// sibling list at the level they were new. Pre-existing siblings keep
    /// their order.
    pub fn merge(&mut self, other: &CategoryTree) {
        let other_roots = other.roots.clone();
        self.merge_level(None, other, &other_roots);
    }

    /// Sort sibling lists alphabetically by title, at the root level and
    /// within every node.
    pub fn sort_by_title(&mut self) {
        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|a, b| self.nodes[a.0].title.cmp(&self.nodes[b.0].title));
        self.roots = roots;

        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| self.nodes[a.0].title.cmp(&self.nodes[b.0].title));
            self.nodes[i].children = children;
        }
    }

    fn merge_level(&mut self, parent: Option<CategoryId>, other: &CategoryTree, ids: &[CategoryId]) {
        for &other_id in ids {
            let other_node = other.node(other_id);
            let target = match self.find_child(parent, other_node.title()) {
                Some(id) => id,
                None => self.push_node(other_node.title().to_string(), parent),
            };
            self.merge_level(Some(target), other, other_node.children());
        }
    }

    /// Find the unique sibling with the given (already formatted) title.
    ///
    /// Panics on a duplicate sibling title: that is an internal-consistency
    /// violation the construction API makes unreachable.
    fn find_child(&self, parent: Option<CategoryId>, title: &str) -> Option<CategoryId> {
        let siblings = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        };

        let mut found = None;
        for &id in siblings {
            if self.nodes[id.0].title == title {
                assert!(found.is_none(), "Found duplicated category '{}'.", title);
                found = Some(id);
            }
        }
        found
    }

    fn push_node(&mut self, title: String, parent: Option<CategoryId>) -> CategoryId {
        let id = CategoryId(self.nodes.len());
        self.nodes.push(CategoryNode {
            title,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }
}

/// Format a raw category title for display.
///
/// Capitalizes the first letter of every word without lowering the rest
/// (`"FOO"` stays `"FOO"`, `"fOo"` becomes `"FOo"`). Words are determined in
/// three passes - whitespace runs, then `-`, then `_` - each rejoining with
/// its own delimiter, so `"foo-bar baz"` becomes `"Foo-Bar Baz"`. Whitespace
/// runs collapse to a single space; repeated `-`/`_` are preserved. The
/// function is idempotent.
pub fn format_title(raw: &str) -> String {
    let result = raw
        .trim()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    let result = capitalize_split(&result, '-');
    capitalize_split(&result, '_')
}

fn capitalize_split(title: &str, delimiter: char) -> String {
    title
        .trim()
        .split(delimiter)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
