//! The document tree produced by the MarkSC parser.
//!
//! Every element of a page is a [`node::Node`] stored in a [`node::Tree`] arena. Renderers locate
//! the parts they care about with [`node::Tree::find_any`] and [`node::Tree::filter`], or walk the
//! whole tree with a [`node::visitor::NodeVisitor`].

pub mod node;
