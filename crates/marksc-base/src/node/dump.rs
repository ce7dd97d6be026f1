use crate::node::{NodeId, Tree};
use std::fmt::{Display, Write};

impl Tree {
    /// ASCII rendering of the whole tree, one line per node.
    pub fn dump(&self) -> String {
        self.dump_from(self.root())
    }

    /// ASCII rendering of the subtree rooted at `id`.
    ///
    /// Each line shows the variant, the node id, the attributes and the extra map. Interior nodes
    /// are marked with `+--*`, leaves with `+---`.
    pub fn dump_from(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, "");
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, prefix: &str) {
        let node = &self[id];

        if !prefix.is_empty() {
            out.push_str(&prefix[..prefix.len() - 3]);
            out.push_str(if node.children().is_empty() {
                "  +--- "
            } else {
                "  +--* "
            });
        }

        let _ = writeln!(
            out,
            "{} [{}] {} {}",
            node.variant,
            id,
            map_string(node.attrib.iter()),
            map_string(node.extra.iter()),
        );

        let count = node.children().len();
        for (index, child) in node.children().iter().enumerate() {
            let branch = if index + 1 == count { "   " } else { "  |" };
            self.write_node(out, *child, &format!("{prefix}{branch}"));
        }
    }
}

fn map_string<'a, V: Display + 'a>(entries: impl Iterator<Item = (&'a String, &'a V)>) -> String {
    let inner: Vec<String> = entries.map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", inner.join(", "))
}
