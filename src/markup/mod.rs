//! Markup front-end: JSX tag lexer, parser, and slotmap-backed node tree.

pub mod lexer;
pub mod node;
pub mod parser;
pub mod tree;

pub use node::{Element, NodeData, NodeId};
pub use parser::parse;
pub use tree::Dom;

/// Errors from markup parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkupError {
    #[error("no markup element found")]
    NoElement,
    #[error("element <{tag}> opened at byte {offset} is never closed")]
    Unclosed { tag: String, offset: usize },
    #[error("closing tag at byte {offset} does not match: expected </{expected}>, found </{found}>")]
    Mismatched {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("unexpected input at byte {offset}")]
    Unexpected { offset: usize },
    #[error("unterminated expression starting at byte {offset}")]
    UnterminatedExpression { offset: usize },
}
