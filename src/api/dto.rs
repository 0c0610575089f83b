use serde::{Deserialize, Serialize};
use crate::domain::view_tree::{CallTree, Collapsible, Direction, ItemId, TreeMode};

/// Serializable snapshot of a CallTree. Items are listed in arena order and
/// refer to each other by index.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TreeDto {
    pub mode: String,
    pub roots: Vec<usize>,
    pub items: Vec<ItemDto>,
    pub steps: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ItemDto {
    pub index: usize,
    pub label: String,
    pub description: Option<String>,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub collapsible: String,
    pub section_root: bool,
    pub direction: Option<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

fn indices(ids: &[ItemId]) -> Vec<usize> {
    ids.iter().map(|id| id.index()).collect()
}

impl TreeDto {
    pub fn from_tree(tree: &CallTree, steps: &[ItemId]) -> Self {
        let mode = match tree.mode() {
            TreeMode::Empty => "empty",
            TreeMode::Callers => "callers",
            TreeMode::Callees => "callees",
            TreeMode::Trace => "trace",
        };

        let items = tree
            .ids()
            .filter_map(|id| tree.item(id).map(|item| (id, item)))
            .map(|(id, item)| ItemDto {
                index: id.index(),
                label: item.label.clone(),
                description: item.description.clone(),
                file: item.location.as_ref().map(|l| l.file.clone()),
                line: item.location.as_ref().map(|l| l.line),
                collapsible: match item.collapsible {
                    Collapsible::None => "none",
                    Collapsible::Collapsed => "collapsed",
                    Collapsible::Expanded => "expanded",
                }
                .to_string(),
                section_root: item.is_section_root,
                direction: item.direction.map(|d| {
                    match d {
                        Direction::Callers => "callers",
                        Direction::Callees => "callees",
                    }
                    .to_string()
                }),
                parent: tree.parent(id).map(ItemId::index),
                children: indices(tree.children(id)),
            })
            .collect();

        TreeDto {
            mode: mode.to_string(),
            roots: indices(tree.roots()),
            items,
            steps: indices(steps),
        }
    }
}
