//! Markup tree: slotmap arena with parent/child links and read-only walks.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Element, NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The parsed markup tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so lookups are O(1) and child order is preserved.
#[derive(Debug, Default)]
pub struct Dom {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached node. Attach it with [`Dom::append`] or make it the
    /// root with [`Dom::set_root`].
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if let Some(old_parent) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&c| c != child);
            }
        }
        self.parent.insert(child, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.push(child);
        }
    }

    /// Insert `data` as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.insert(data);
        self.append(parent, id);
        id
    }

    /// The root element, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// The element at `id`, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(NodeData::as_element)
    }

    /// Direct children that are elements.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Whether any direct child is a non-empty text run.
    pub fn has_direct_text(&self, id: NodeId) -> bool {
        self.children(id).iter().any(|&c| {
            self.get(c)
                .and_then(NodeData::as_text)
                .is_some_and(|t| !t.trim().is_empty())
        })
    }

    /// Depth-first pre-order walk starting at (and including) `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// All text runs below `id` in document order, whitespace-collapsed and
    /// with empty runs dropped.
    pub fn texts(&self, id: NodeId) -> Vec<String> {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.get(n).and_then(NodeData::as_text))
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Like [`Dom::texts`] but without repeats, keeping first occurrences.
    pub fn unique_texts(&self, id: NodeId) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.texts(id)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
