use crate::node::{Node, NodeId, Tree};
use anyhow::Result;

/// Visitor over a parsed [`Tree`]. Default implementations walk the whole tree, so implementors
/// only override the methods they need.
pub trait NodeVisitor {
    fn walk_tree(&mut self, tree: &Tree) -> Result<()> {
        self.visit_node(tree, tree.root())
    }

    fn walk_node(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
        let node = &tree[id];
        match node.content() {
            Some(content) if node.variant.is_text() => self.visit_text(node, content),
            _ => self.visit_element(tree, id),
        }
    }

    fn walk_children(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
        tree[id]
            .children()
            .iter()
            .try_for_each(|child| self.visit_node(tree, *child))
    }

    fn visit_node(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
        self.walk_node(tree, id)
    }

    fn visit_element(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
        self.walk_children(tree, id)
    }

    fn visit_text(&mut self, _node: &Node, _content: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::NodeVisitor;
    use crate::node::{Node, NodeId, Tree, Variant};
    use anyhow::{anyhow, Result};

    #[derive(Default)]
    struct Outline {
        lines: Vec<String>,
        depth: usize,
    }

    impl NodeVisitor for Outline {
        fn visit_element(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
            self.lines
                .push(format!("{}{}", " ".repeat(self.depth), tree[id].variant));
            self.depth += 1;
            self.walk_children(tree, id)?;
            self.depth -= 1;
            Ok(())
        }

        fn visit_text(&mut self, _node: &Node, content: &str) -> Result<()> {
            self.lines
                .push(format!("{}{content:?}", " ".repeat(self.depth)));
            Ok(())
        }
    }

    struct NoImages;

    impl NodeVisitor for NoImages {
        fn visit_element(&mut self, tree: &Tree, id: NodeId) -> Result<()> {
            if tree[id].variant == Variant::Image {
                return Err(anyhow!("images are not supported"));
            }
            self.walk_children(tree, id)
        }
    }

    fn sample() -> Tree {
        let mut tree = Tree::new();
        let block = tree.insert(Node::new(Variant::Block));
        let paragraph = tree.insert(Node::new(Variant::Paragraph));
        let bold = tree.insert(Node::new(Variant::BoldfaceSpan));
        let text = tree.insert(Node::new_string("bold"));
        let image = tree.insert(Node::image("a.png"));
        tree.append_child(bold, &[text]);
        tree.append_child(paragraph, &[bold]);
        tree.append_child(block, &[paragraph, image]);
        let root = tree.root();
        tree.append_child(root, &[block]);
        tree
    }

    #[test]
    fn walks_in_document_order() {
        let tree = sample();
        let mut outline = Outline::default();
        outline.walk_tree(&tree).unwrap();

        assert_eq!(
            outline.lines,
            vec![
                "Document",
                " Block",
                "  Paragraph",
                "   BoldfaceSpan",
                "    \"bold\"",
                "  Image",
            ]
        );
    }

    #[test]
    fn errors_stop_the_walk() {
        let tree = sample();
        let err = NoImages.walk_tree(&tree).unwrap_err();
        assert_eq!(err.to_string(), "images are not supported");
    }
}
