//! MarkSC turns pages written in a small line-oriented markup language into a document tree.
//!
//! ```no_run
//! let tree = marksc::load_document("lecture.msc")?;
//! print!("{}", tree.dump());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The tree model lives in `marksc-base` and the parser in `marksc-parser`. This crate re-exports
//! both and adds helpers for callers working with files.

use anyhow::Context;
use std::fs;
use std::path::Path;

pub use marksc_base::node::visitor::NodeVisitor;
pub use marksc_base::node::{Attribute, Forest, Node, NodeId, ResultNode, Tree, Variant};
pub use marksc_parser::{
    parse_document, parse_document_with, ErrorKind, ParserError, ParserOptions, Position,
    Violation,
};

/// Reads and parses the page at `path` with the default options.
pub fn load_document<P: AsRef<Path>>(path: P) -> anyhow::Result<Tree> {
    load_document_with(path, &ParserOptions::default())
}

pub fn load_document_with<P: AsRef<Path>>(
    path: P,
    options: &ParserOptions,
) -> anyhow::Result<Tree> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let tree = parse_document_with(&input, options)
        .with_context(|| format!("could not parse {}", path.display()))?;
    Ok(tree)
}

/// Reads parser options from a YAML file.
pub fn load_options<P: AsRef<Path>>(path: P) -> anyhow::Result<ParserOptions> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    ParserOptions::from_yaml(&input).with_context(|| format!("invalid options in {}", path.display()))
}

/// Nested JSON form of the tree for renderers running in another process.
pub fn to_json(tree: &Tree) -> anyhow::Result<String> {
    serde_json::to_string_pretty(tree).context("could not serialize the document tree")
}
