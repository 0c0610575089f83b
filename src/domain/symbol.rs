// Query result shapes returned by the call-graph engine.
// These are plain values; nothing here computes graph structure.

use serde::{Deserialize, Serialize};

/// Kind of a callable unit as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    #[default]
    Function,
    Method,
    Class,
    #[serde(other)]
    Other,
}

/// A file position a host can jump to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A callable unit (function, method, class).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Symbol {
    /// Engine id, 0 when synthesized locally.
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qualified_name: String,
    #[serde(rename = "type", default)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub file: String,
    /// 1-based definition line.
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub end_line: Option<usize>,
    /// Line of the call site, when the symbol was reached through a call edge.
    #[serde(default)]
    pub call_line: Option<usize>,
}

impl Symbol {
    /// Definition location.
    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line)
    }

    /// Call-site location if known, otherwise the definition.
    pub fn jump_location(&self) -> Location {
        Location::new(self.file.clone(), self.call_line.unwrap_or(self.line))
    }
}

/// Execution context of a call edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub is_loop: bool,
    #[serde(default)]
    pub is_try_block: bool,
}

/// A node of a nested trace tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qualified_name: String,
    #[serde(rename = "type", default)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub depth: usize,
    #[serde(flatten)]
    pub context: ExecutionContext,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line)
    }

    /// A `Symbol` standing in for this node. Trace nodes carry no engine id.
    pub fn to_symbol(&self) -> Symbol {
        Symbol {
            id: 0,
            name: self.name.clone(),
            qualified_name: self.qualified_name.clone(),
            kind: self.kind,
            file: self.file.clone(),
            line: self.line,
            end_line: None,
            call_line: None,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order walk over this subtree, starting with `self`.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Response to get-callers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallerResult {
    pub symbol: Symbol,
    #[serde(default)]
    pub callers: Vec<Symbol>,
}

/// Response to get-callees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalleeResult {
    pub symbol: Symbol,
    #[serde(default)]
    pub callees: Vec<Symbol>,
}

/// Response to trace: both directions around one symbol.
///
/// The root of each tree is the traced symbol; its children are the first
/// level of callers or callees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceResult {
    /// Qualified name of the traced symbol.
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub callers: Option<TreeNode>,
    #[serde(default)]
    pub callees: Option<TreeNode>,
}

impl TraceResult {
    /// Last dotted segment of `start`.
    pub fn short_name(&self) -> &str {
        self.start.rsplit('.').next().unwrap_or(&self.start)
    }

    /// Where the traced symbol itself is defined, taken from either tree root.
    pub fn start_location(&self) -> Option<Location> {
        self.callees
            .as_ref()
            .or(self.callers.as_ref())
            .map(TreeNode::location)
    }

    pub fn has_callers(&self) -> bool {
        self.callers.as_ref().is_some_and(|t| !t.is_leaf())
    }

    pub fn has_callees(&self) -> bool {
        self.callees.as_ref().is_some_and(|t| !t.is_leaf())
    }
}
