//! CMake concrete syntax trees.
//!
//! The tree is a rowan green tree: immutable, cheap to clone and share
//! across threads. A [`SyntaxNode`] is a cursor into one such tree; a new
//! parse always produces a new tree.

pub mod ast;
mod kind;
pub mod lexer;
mod parser;

pub use kind::{CMakeLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodePtr, SyntaxToken};
pub use parser::{Parse, ParseError, parse};
