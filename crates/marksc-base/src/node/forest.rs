use crate::node::{Node, NodeId, Tree, Variant};

/// Trees connecting the nodes selected by [`Tree::filter`]. The structure of the original tree
/// is preserved: a selected node appears below its closest selected ancestor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest<'a> {
    pub trees: Vec<ResultNode<'a>>,
}

/// A node of a [`Forest`], pointing back at the original node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultNode<'a> {
    pub id: NodeId,
    pub node: &'a Node,
    pub children: Vec<ResultNode<'a>>,
}

impl<'a> ResultNode<'a> {
    fn new(id: NodeId, node: &'a Node) -> Self {
        Self {
            id,
            node,
            children: vec![],
        }
    }
}

impl Forest<'_> {
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Number of result nodes over all trees.
    pub fn count(&self) -> usize {
        fn count(nodes: &[ResultNode<'_>]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.trees)
    }
}

impl Tree {
    /// Returns the forest of nodes below (and including) `id` whose variant is in `variants`.
    ///
    /// Matches in disjoint branches become independent roots, while a match below another match
    /// becomes its child, however many unmatched nodes separate the two.
    pub fn filter(&self, id: NodeId, variants: &[Variant]) -> Forest<'_> {
        Forest {
            trees: filter_node(self, id, variants),
        }
    }
}

fn filter_node<'a>(tree: &'a Tree, id: NodeId, variants: &[Variant]) -> Vec<ResultNode<'a>> {
    let node = &tree[id];
    let found: Vec<ResultNode<'a>> = node
        .children()
        .iter()
        .flat_map(|child| filter_node(tree, *child, variants))
        .collect();

    if node.matches(variants) {
        let mut result = ResultNode::new(id, node);
        result.children = found;
        vec![result]
    } else {
        found
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Node, NodeId, Tree, Variant};

    fn ids(nodes: &[super::ResultNode<'_>]) -> Vec<NodeId> {
        nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn nested_matches_stay_nested() {
        // Document
        //   Section (a)
        //     Block
        //       Section (b)
        //         Block
        //           Section (c)
        //   Section (d)
        let mut tree = Tree::new();
        let a = tree.insert(Node::new(Variant::Section));
        let block_a = tree.insert(Node::new(Variant::Block));
        let b = tree.insert(Node::new(Variant::Section));
        let block_b = tree.insert(Node::new(Variant::Block));
        let c = tree.insert(Node::new(Variant::Section));
        let d = tree.insert(Node::new(Variant::Section));

        tree.append_child(block_b, &[c]);
        tree.append_child(b, &[block_b]);
        tree.append_child(block_a, &[b]);
        tree.append_child(a, &[block_a]);
        let root = tree.root();
        tree.append_child(root, &[a, d]);

        let forest = tree.filter(root, &[Variant::Section]);

        assert_eq!(ids(&forest.trees), vec![a, d]);
        assert_eq!(ids(&forest.trees[0].children), vec![b]);
        assert_eq!(ids(&forest.trees[0].children[0].children), vec![c]);
        assert!(forest.trees[1].children.is_empty());
        assert_eq!(forest.count(), 4);
        assert_eq!(forest.trees[0].node.variant, Variant::Section);
    }

    #[test]
    fn matching_root_gathers_everything() {
        let mut tree = Tree::new();
        let block = tree.insert(Node::new(Variant::Block));
        let p1 = tree.insert(Node::new(Variant::Paragraph));
        let p2 = tree.insert(Node::new(Variant::Paragraph));
        tree.append_child(block, &[p1, p2]);
        let root = tree.root();
        tree.append_child(root, &[block]);

        let forest = tree.filter(root, &[Variant::Document, Variant::Paragraph]);
        assert_eq!(ids(&forest.trees), vec![root]);
        assert_eq!(ids(&forest.trees[0].children), vec![p1, p2]);
    }

    #[test]
    fn no_match_is_empty() {
        let tree = Tree::new();
        let forest = tree.filter(tree.root(), &[Variant::Image]);
        assert!(forest.is_empty());
        assert_eq!(forest.count(), 0);
    }
}
