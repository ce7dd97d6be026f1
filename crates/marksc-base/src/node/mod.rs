pub mod dump;
pub mod forest;
mod serialize;
pub mod visitor;

pub use forest::{Forest, ResultNode};

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// The fixed set of element kinds a MarkSC page is made of.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Root of the parsed page. There is exactly one per tree.
    Document,
    Section,
    /// A group of paragraphs, pictures, code snippets, alerts, lists and so forth. Blocks are
    /// separated by a line holding a single `%`.
    Block,
    /// A chunk of text, possibly holding spans and inline formulas.
    Paragraph,
    /// A code snippet. Its only child is a [`Variant::String`] holding the code.
    Code,
    #[serde(rename = "RawHTML")]
    RawHtml,
    String,
    /// An alert box. The `level` attribute is the number of `!` used.
    Alert,
    ListContainer,
    ListItem,
    Boxed,
    /// A picture. The `path` attribute holds the image location, the child paragraph the caption.
    Image,
    TypewriterSpan,
    FormulaSpan,
    SectionTitle,
    Formula,
    BoldfaceSpan,
    ItalicSpan,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Document => "Document",
            Variant::Section => "Section",
            Variant::Block => "Block",
            Variant::Paragraph => "Paragraph",
            Variant::Code => "Code",
            Variant::RawHtml => "RawHTML",
            Variant::String => "String",
            Variant::Alert => "Alert",
            Variant::ListContainer => "ListContainer",
            Variant::ListItem => "ListItem",
            Variant::Boxed => "Boxed",
            Variant::Image => "Image",
            Variant::TypewriterSpan => "TypewriterSpan",
            Variant::FormulaSpan => "FormulaSpan",
            Variant::SectionTitle => "SectionTitle",
            Variant::Formula => "Formula",
            Variant::BoldfaceSpan => "BoldfaceSpan",
            Variant::ItalicSpan => "ItalicSpan",
        }
    }

    /// Leaves whose payload lives in [`Node::content`].
    pub fn is_text(&self) -> bool {
        matches!(self, Variant::String | Variant::RawHtml)
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(untagged)]
pub enum Attribute {
    Int(i64),
    String(String),
}

impl Attribute {
    pub fn as_int(&self) -> Option<i64> {
        if let Attribute::Int(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Attribute::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Int(n) => write!(f, "{n}"),
            Attribute::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Attribute::Int(value)
    }
}

impl From<usize> for Attribute {
    fn from(value: usize) -> Self {
        Attribute::Int(value as i64)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::String(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::String(value)
    }
}

/// Position of a node inside its [`Tree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub variant: Variant,
    /// Variant specific data: `depth` for every node, `level` for alerts and `path` for images.
    pub attrib: LinkedHashMap<String, Attribute>,
    /// Text payload of [`Variant::String`] and [`Variant::RawHtml`] leaves.
    pub content: Option<String>,
    /// Free for renderers to annotate nodes with. The parser never writes it.
    pub extra: LinkedHashMap<String, Value>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            attrib: LinkedHashMap::new(),
            content: None,
            extra: LinkedHashMap::new(),
            children: vec![],
            parent: None,
        }
    }

    pub fn new_with_attributes<K: Into<String>, B: IntoIterator<Item = (K, Attribute)>>(
        variant: Variant,
        attributes: B,
    ) -> Self {
        let mut node = Self::new(variant);
        node.attrib
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v)));
        node
    }

    pub fn new_string<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(Variant::String)
        }
    }

    pub fn new_raw_html<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(Variant::RawHtml)
        }
    }

    pub fn alert(level: usize) -> Self {
        Self::new_with_attributes(Variant::Alert, [("level", Attribute::from(level))])
    }

    pub fn image<S: Into<String>>(path: S) -> Self {
        Self::new_with_attributes(Variant::Image, [("path", Attribute::String(path.into()))])
    }

    /// True if the node's variant is one of `variants`.
    pub fn matches(&self, variants: &[Variant]) -> bool {
        variants.contains(&self.variant)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> Option<usize> {
        self.attrib
            .get("depth")
            .and_then(Attribute::as_int)
            .map(|d| d as usize)
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Arena holding every node of one parsed page.
///
/// The arena owns the nodes; a node is owned by its parent in the sense that its id appears in
/// exactly one child list. Links are only changed through [`Tree::append_child`] and
/// [`Tree::detach`], which update both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    /// Creates a tree holding only the [`Variant::Document`] root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Variant::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a detached node to the arena. A [`Variant::Document`] added here can never be attached,
    /// so the root stays the only document of the tree.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.children.clear();
        node.parent = None;

        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Appends `children`, in order, as the last children of `parent`. A child that already has a
    /// parent is detached from it first.
    ///
    /// Documents and ancestors of `parent` (`parent` included) are skipped, so the result is
    /// always a tree under the single root.
    pub fn append_child(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            if self.nodes[child.0].variant == Variant::Document || self.is_ancestor(child, parent) {
                continue;
            }
            self.detach(child);
            self.nodes[child.0].parent = Some(parent);
            self.nodes[parent.0].children.push(child);
        }
    }

    /// True if `ancestor` is `id` or lies on the parent chain of `id`.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node.0].parent;
        }
        false
    }

    /// Removes `child` from its parent's child list. Returns the former parent.
    pub fn detach(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes[child.0].parent.take()?;
        self.nodes[parent.0].children.retain(|c| *c != child);
        Some(parent)
    }

    /// Pre-order traversal of the subtree rooted at `id`: a node is visited before its
    /// children, children left to right.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            pending: vec![id],
        }
    }

    /// Depth-first search for the first node, in pre-order, whose variant is in `variants`.
    pub fn find_any(&self, id: NodeId, variants: &[Variant]) -> Option<NodeId> {
        self.descendants(id).find(|d| self[*d].matches(variants))
    }

    /// Concatenated text of every string leaf below `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|d| self[d].content())
            .collect()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    pending: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        self.pending
            .extend(self.tree[id].children.iter().rev().copied());
        Some(id)
    }
}
