//! Trace Sequencer
//!
//! Linearizes a [`CallTree`] into the ordered steps used for playback.
//! Each root is walked in pre-order; section roots are skipped except the
//! callees root, which is the first step of a callees listing.

use crate::domain::symbol::Location;
use crate::domain::view_tree::{CallTree, ItemId, TreeMode, ViewItem};

/// One playback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub item: ItemId,
    pub label: String,
    pub location: Option<Location>,
}

/// Ordered, finite, 0-indexed list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label.as_str()).collect()
    }

    /// Index of the step backed by `item`, if it is steppable.
    pub fn position_of(&self, item: ItemId) -> Option<usize> {
        self.steps.iter().position(|s| s.item == item)
    }
}

/// Flatten `tree` into playback order.
pub fn linearize(tree: &CallTree) -> StepSequence {
    let mode = tree.mode();
    let steps = tree
        .roots()
        .iter()
        .flat_map(|root| tree.walk(*root))
        .filter_map(|id| tree.item(id).map(|item| (id, item)))
        .filter(|(_, item)| is_step(mode, item))
        .map(|(id, item)| Step {
            item: id,
            label: item.label.clone(),
            location: item.location.clone(),
        })
        .collect();
    StepSequence::new(steps)
}

fn is_step(mode: TreeMode, item: &ViewItem) -> bool {
    match mode {
        TreeMode::Empty => false,
        TreeMode::Callees => true,
        TreeMode::Callers | TreeMode::Trace => !item.is_section_root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::symbol::{
        CalleeResult, CallerResult, ExecutionContext, Symbol, TraceResult, TreeNode,
    };

    fn sym(name: &str) -> Symbol {
        Symbol {
            id: 1,
            name: name.to_string(),
            qualified_name: name.to_string(),
            file: "m.py".to_string(),
            line: 1,
            ..Default::default()
        }
    }

    fn node(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file: "todo.py".to_string(),
            line: 1,
            children,
            ..Default::default()
        }
    }

    #[test]
    fn test_callers_exclude_root() {
        let mut tree = CallTree::new();
        tree.build_from_callers(&CallerResult {
            symbol: sym("t"),
            callers: vec![sym("a"), sym("b"), sym("c")],
        });
        let seq = linearize(&tree);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.labels(), vec!["a", "b", "c"]);
        assert_eq!(seq.position_of(tree.roots()[0]), None);
    }

    #[test]
    fn test_callees_include_root_first() {
        let mut tree = CallTree::new();
        tree.build_from_callees(&CalleeResult {
            symbol: sym("t"),
            callees: vec![sym("a"), sym("b")],
        });
        let seq = linearize(&tree);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap().item, tree.roots()[0]);
        assert_eq!(seq.labels(), vec!["t → callees", "a", "b"]);
    }

    #[test]
    fn test_create_todo_trace_order() {
        let mut validate = node("validate_request", vec![]);
        validate.context = ExecutionContext {
            is_conditional: true,
            condition: Some("request.body".to_string()),
            ..Default::default()
        };
        let result = TraceResult {
            start: "app.create_todo".to_string(),
            callers: Some(node("create_todo", vec![node("handle_request", vec![])])),
            callees: Some(node(
                "create_todo",
                vec![validate, node("TodoService.create", vec![])],
            )),
        };
        let mut tree = CallTree::new();
        tree.build_from_trace(&result);
        let seq = linearize(&tree);

        assert_eq!(
            seq.labels(),
            vec![
                "handle_request",
                "▶ create_todo ◀",
                "validate_request [if request.body]",
                "TodoService.create",
            ]
        );
    }

    #[test]
    fn test_trace_length_is_subtrees_plus_one() {
        let callers = node("f", vec![node("a", vec![node("b", vec![])]), node("c", vec![])]);
        let callees = node("f", vec![node("d", vec![node("e", vec![node("g", vec![])])])]);
        let expected = (callers.len() - 1) + 1 + (callees.len() - 1);
        let result = TraceResult {
            start: "f".to_string(),
            callers: Some(callers),
            callees: Some(callees),
        };
        let mut tree = CallTree::new();
        tree.build_from_trace(&result);
        let seq = linearize(&tree);

        assert_eq!(seq.len(), expected);
        assert_eq!(seq.labels(), vec!["a", "b", "c", "▶ f ◀", "d", "e", "g"]);
    }

    #[test]
    fn test_empty_tree_has_no_steps() {
        let tree = CallTree::new();
        let seq = linearize(&tree);
        assert!(seq.is_empty());
        assert_eq!(seq.last_index(), None);
    }
}
