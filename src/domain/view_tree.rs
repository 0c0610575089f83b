//! View Tree
//!
//! Turns a callers, callees or trace query result into a navigable tree of
//! [`ViewItem`]s. Items live in an arena owned by [`CallTree`]; children and
//! parents are stored as index lists next to it. Every build starts a new
//! generation, so ids handed out by an earlier build no longer resolve.

use crate::domain::context::annotate;
use crate::domain::symbol::{CalleeResult, CallerResult, Location, Symbol, TraceResult, TreeNode};
use serde::Serialize;
use tracing::debug;

/// Handle to an item of one particular build of a [`CallTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId {
    generation: u32,
    index: usize,
}

impl ItemId {
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Which side of the traced symbol an item sits on. Used for orientation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Callers,
    Callees,
}

/// Expand/collapse affordance of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapsible {
    None,
    Collapsed,
    Expanded,
}

/// Which query the tree currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeMode {
    Empty,
    Callers,
    Callees,
    Trace,
}

/// A displayable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewItem {
    pub label: String,
    /// Secondary text, usually `file:line`.
    pub description: Option<String>,
    pub collapsible: Collapsible,
    pub symbol: Option<Symbol>,
    pub location: Option<Location>,
    pub is_section_root: bool,
    /// `None` for the selected item of a trace.
    pub direction: Option<Direction>,
}

impl ViewItem {
    fn section(label: impl Into<String>, symbol: Option<Symbol>, direction: Direction) -> Self {
        let location = symbol.as_ref().map(Symbol::location);
        Self {
            label: label.into(),
            description: location.as_ref().map(Location::to_string),
            collapsible: Collapsible::Expanded,
            symbol,
            location,
            is_section_root: true,
            direction: Some(direction),
        }
    }

    fn call(symbol: &Symbol, direction: Direction) -> Self {
        let location = symbol.jump_location();
        Self {
            label: symbol.name.clone(),
            description: Some(location.to_string()),
            collapsible: Collapsible::None,
            symbol: Some(symbol.clone()),
            location: Some(location),
            is_section_root: false,
            direction: Some(direction),
        }
    }

    fn trace_node(node: &TreeNode, direction: Direction) -> Self {
        let location = node.location();
        Self {
            label: format!("{}{}", node.name, annotate(&node.context)),
            description: Some(location.to_string()),
            collapsible: if node.is_leaf() {
                Collapsible::None
            } else {
                Collapsible::Expanded
            },
            symbol: Some(node.to_symbol()),
            location: Some(location),
            is_section_root: false,
            direction: Some(direction),
        }
    }
}

/// Arena-backed tree of view items built from one query result.
pub struct CallTree {
    generation: u32,
    mode: TreeMode,
    items: Vec<ViewItem>,
    roots: Vec<ItemId>,
    children: Vec<Vec<ItemId>>,
    parents: Vec<Option<ItemId>>,
    listeners: Vec<Box<dyn FnMut()>>,
}

impl Default for CallTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTree")
            .field("generation", &self.generation)
            .field("mode", &self.mode)
            .field("items", &self.items.len())
            .field("roots", &self.roots)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CallTree {
    pub fn new() -> Self {
        Self {
            generation: 0,
            mode: TreeMode::Empty,
            items: Vec::new(),
            roots: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a callback fired after every rebuild. Consumers re-read the tree.
    pub fn on_changed(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Show who calls `result.symbol`. Only the callers are playback steps.
    pub fn build_from_callers(&mut self, result: &CallerResult) {
        self.reset(TreeMode::Callers);
        let root = self.push(
            ViewItem::section(
                format!("{} ← callers", result.symbol.name),
                Some(result.symbol.clone()),
                Direction::Callers,
            ),
            None,
        );
        for caller in &result.callers {
            self.push(ViewItem::call(caller, Direction::Callers), Some(root));
        }
        self.finish();
    }

    /// Show what `result.symbol` calls. The root itself is the first playback step.
    pub fn build_from_callees(&mut self, result: &CalleeResult) {
        self.reset(TreeMode::Callees);
        let root = self.push(
            ViewItem::section(
                format!("{} → callees", result.symbol.name),
                Some(result.symbol.clone()),
                Direction::Callees,
            ),
            None,
        );
        for callee in &result.callees {
            self.push(ViewItem::call(callee, Direction::Callees), Some(root));
        }
        self.finish();
    }

    /// Show a bidirectional trace: "Callers" section, the selected symbol, "Callees" section.
    pub fn build_from_trace(&mut self, result: &TraceResult) {
        self.reset(TreeMode::Trace);

        if let Some(callers) = result.callers.as_ref().filter(|t| !t.is_leaf()) {
            let section = self.push(ViewItem::section("Callers", None, Direction::Callers), None);
            self.expand(section, callers, Direction::Callers);
        }

        let location = result.start_location();
        self.push(
            ViewItem {
                label: format!("▶ {} ◀", result.short_name()),
                description: location.as_ref().map(Location::to_string),
                collapsible: Collapsible::None,
                symbol: None,
                location,
                is_section_root: false,
                direction: None,
            },
            None,
        );

        if let Some(callees) = result.callees.as_ref().filter(|t| !t.is_leaf()) {
            let section = self.push(ViewItem::section("Callees", None, Direction::Callees), None);
            self.expand(section, callees, Direction::Callees);
        }

        self.finish();
    }

    /// Drop every item and notify listeners.
    pub fn clear(&mut self) {
        self.reset(TreeMode::Empty);
        self.finish();
    }

    pub fn mode(&self) -> TreeMode {
        self.mode
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn item(&self, id: ItemId) -> Option<&ViewItem> {
        self.slot(id).map(|i| &self.items[i])
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        match self.slot(id) {
            Some(i) => &self.children[i],
            None => &[],
        }
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.slot(id).and_then(|i| self.parents[i])
    }

    /// Parents of `id`, nearest first. Hosts reveal these before selecting `id`.
    pub fn ancestors(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            out.push(p);
            cursor = self.parent(p);
        }
        out
    }

    /// Every live id, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        let generation = self.generation;
        (0..self.items.len()).map(move |index| ItemId { generation, index })
    }

    /// Pre-order walk starting at `id`, `id` included.
    pub fn walk(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        if self.slot(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    fn slot(&self, id: ItemId) -> Option<usize> {
        (id.generation == self.generation && id.index < self.items.len()).then_some(id.index)
    }

    fn reset(&mut self, mode: TreeMode) {
        self.generation = self.generation.wrapping_add(1);
        self.mode = mode;
        self.items.clear();
        self.roots.clear();
        self.children.clear();
        self.parents.clear();
    }

    fn push(&mut self, item: ViewItem, parent: Option<ItemId>) -> ItemId {
        let id = ItemId {
            generation: self.generation,
            index: self.items.len(),
        };
        self.items.push(item);
        self.children.push(Vec::new());
        self.parents.push(parent);
        match parent {
            Some(p) => self.children[p.index].push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn expand(&mut self, parent: ItemId, node: &TreeNode, direction: Direction) {
        for child in &node.children {
            let id = self.push(ViewItem::trace_node(child, direction), Some(parent));
            self.expand(id, child, direction);
        }
    }

    fn finish(&mut self) {
        debug!(
            mode = ?self.mode,
            generation = self.generation,
            items = self.items.len(),
            roots = self.roots.len(),
            "call tree rebuilt"
        );
        for listener in self.listeners.iter_mut() {
            listener();
        }
    }
}
