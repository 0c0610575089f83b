//! Plain-text Tree Renderer
//!
//! Draws a CallTree with box-drawing guides, one item per line.

use crate::domain::view_tree::{CallTree, ItemId};
use std::io::Result;

pub struct TreeRenderer;

impl TreeRenderer {
    /// Write the rendered tree to `path`.
    pub fn export(tree: &CallTree, path: &str) -> Result<()> {
        let mut content = Self::render(tree, None);
        content.push('\n');
        std::fs::write(path, content)
    }

    /// Render every root and its descendants. The `current` item, if any, is
    /// prefixed with `>`.
    pub fn render(tree: &CallTree, current: Option<ItemId>) -> String {
        let mut lines = Vec::new();
        for root in tree.roots() {
            Self::render_item(tree, *root, "", None, current, &mut lines);
        }
        lines.join("\n")
    }

    fn render_item(
        tree: &CallTree,
        id: ItemId,
        prefix: &str,
        is_last: Option<bool>,
        current: Option<ItemId>,
        lines: &mut Vec<String>,
    ) {
        let Some(item) = tree.item(id) else {
            return;
        };
        let marker = if current == Some(id) { "> " } else { "  " };
        let guide = match is_last {
            None => "",
            Some(true) => "└─ ",
            Some(false) => "├─ ",
        };
        let description = item
            .description
            .as_ref()
            .map(|d| format!("  ({})", d))
            .unwrap_or_default();
        lines.push(format!("{}{}{}{}{}", marker, prefix, guide, item.label, description));

        let child_prefix = match is_last {
            None => prefix.to_string(),
            Some(true) => format!("{}   ", prefix),
            Some(false) => format!("{}│  ", prefix),
        };
        let children = tree.children(id);
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            Self::render_item(tree, *child, &child_prefix, Some(last), current, lines);
        }
    }
}
