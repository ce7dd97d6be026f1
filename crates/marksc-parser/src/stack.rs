use crate::error::ParserError;
use marksc_base::node::{Attribute, Node, NodeId, Tree, Variant};

/// The path from the document root to the node currently receiving input.
///
/// The bottom of the stack is the document, the top is the innermost open node. Closing a node
/// moves it into the tree as the last child of the node below it, so the tree is assembled as the
/// parser pushes and pops.
#[derive(Debug)]
pub struct NodeStack {
    tree: Tree,
    open: Vec<NodeId>,
    max_depth: usize,
}

impl NodeStack {
    /// Creates a stack holding the document root of a fresh tree.
    pub fn new(max_depth: usize) -> Self {
        let mut tree = Tree::new();
        let root = tree.root();
        tree[root]
            .attrib
            .insert("depth".to_string(), Attribute::from(0usize));

        Self {
            tree,
            open: vec![root],
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Hands over the finished tree.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Adds `node` to the tree and opens it. Its `depth` attribute is the number of nodes open
    /// below it.
    pub fn push(&mut self, mut node: Node) -> Result<NodeId, ParserError> {
        if self.open.len() >= self.max_depth {
            return Err(ParserError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        node.attrib
            .insert("depth".to_string(), Attribute::from(self.open.len()));
        let id = self.tree.insert(node);
        self.open.push(id);
        Ok(id)
    }

    pub fn top(&self) -> Result<NodeId, ParserError> {
        self.open.last().copied().ok_or(ParserError::StackUnderflow)
    }

    pub fn top_node(&self) -> Result<&Node, ParserError> {
        let top = self.top()?;
        Ok(&self.tree[top])
    }

    pub fn top_node_mut(&mut self) -> Result<&mut Node, ParserError> {
        let top = self.top()?;
        Ok(&mut self.tree[top])
    }

    /// True if any open node matches `variants`.
    pub fn contains_any(&self, variants: &[Variant]) -> bool {
        self.open.iter().any(|id| self.tree[*id].matches(variants))
    }

    /// The open node closest to the top that matches `variants`.
    pub fn innermost(&self, variants: &[Variant]) -> Option<NodeId> {
        self.open
            .iter()
            .rev()
            .find(|id| self.tree[**id].matches(variants))
            .copied()
    }

    /// The nodes [`NodeStack::pop_until`] would close for `variants`, innermost last.
    pub fn open_above(&self, variants: &[Variant]) -> impl Iterator<Item = &Node> + '_ {
        let start = self
            .open
            .iter()
            .rposition(|id| self.tree[*id].matches(variants))
            .map(|index| index + 1)
            .unwrap_or(self.open.len());

        self.open[start..].iter().map(|id| &self.tree[*id])
    }

    /// Closes the top node, attaching it as the last child of the node below. The document root
    /// is closed without being attached anywhere.
    pub fn pop(&mut self) -> Result<NodeId, ParserError> {
        let closed = self.open.pop().ok_or(ParserError::StackUnderflow)?;
        if let Some(parent) = self.open.last() {
            self.tree.append_child(*parent, &[closed]);
        }
        Ok(closed)
    }

    /// Closes nodes until the top matches `variants`. Does nothing if no open node matches.
    pub fn pop_until(&mut self, variants: &[Variant]) -> Result<(), ParserError> {
        if !self.contains_any(variants) {
            return Ok(());
        }

        while !self.top_node()?.matches(variants) {
            self.pop()?;
        }
        Ok(())
    }
}
