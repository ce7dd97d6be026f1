//! Single-pass parser turning MarkSC source text into a [`marksc_base::node::Tree`].
//!
//! The scanner alternates between line-start and in-line rules and keeps the path to the node
//! receiving input on a [`NodeStack`]. Any construct the grammar does not allow aborts the parse
//! with a [`ParserError`] carrying the position of the offending input.

pub mod cursor;
pub mod error;
pub mod options;
pub mod parser;
pub mod rules;
pub mod stack;

pub use error::{ErrorKind, ParserError, Position, Violation};
pub use options::ParserOptions;
pub use parser::{parse_document, parse_document_with};
pub use stack::NodeStack;
