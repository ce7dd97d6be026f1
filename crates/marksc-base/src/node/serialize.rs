use crate::node::{NodeId, Tree};
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

/// Serializes as the nested document, starting at the root.
impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeSer {
            tree: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

struct NodeSer<'a> {
    tree: &'a Tree,
    id: NodeId,
}

struct ChildrenSer<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl Serialize for NodeSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = &self.tree[self.id];
        let mut state = serializer.serialize_struct("Node", 5)?;
        state.serialize_field("variant", &node.variant)?;
        state.serialize_field("attrib", &node.attrib)?;
        if let Some(content) = &node.content {
            state.serialize_field("content", content)?;
        } else {
            state.skip_field("content")?;
        }
        state.serialize_field("extra", &node.extra)?;
        state.serialize_field(
            "children",
            &ChildrenSer {
                tree: self.tree,
                id: self.id,
            },
        )?;
        state.end()
    }
}

impl Serialize for ChildrenSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.tree[self.id].children();
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&NodeSer {
                tree: self.tree,
                id: *child,
            })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Attribute, Node, Tree, Variant};
    use serde_json::json;

    #[test]
    fn serializes_nested_document() {
        let mut tree = Tree::new();
        let alert = tree.insert(Node::alert(2));
        let paragraph = tree.insert(Node::new_with_attributes(
            Variant::Paragraph,
            [("depth", Attribute::Int(2))],
        ));
        let string = tree.insert(Node::new_string("careful"));
        tree.append_child(paragraph, &[string]);
        tree.append_child(alert, &[paragraph]);
        let root = tree.root();
        tree.append_child(root, &[alert]);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({
                "variant": "Document",
                "attrib": {},
                "extra": {},
                "children": [{
                    "variant": "Alert",
                    "attrib": {"level": 2},
                    "extra": {},
                    "children": [{
                        "variant": "Paragraph",
                        "attrib": {"depth": 2},
                        "extra": {},
                        "children": [{
                            "variant": "String",
                            "attrib": {},
                            "content": "careful",
                            "extra": {},
                            "children": []
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn raw_html_keeps_its_name() {
        let mut tree = Tree::new();
        let raw = tree.insert(Node::new_raw_html("<div/>"));
        let root = tree.root();
        tree.append_child(root, &[raw]);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["children"][0]["variant"], json!("RawHTML"));
        assert_eq!(value["children"][0]["content"], json!("<div/>"));
    }
}
