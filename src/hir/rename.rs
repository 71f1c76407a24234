//! Reading and replacing definition names.
//!
//! Renaming never touches the original tree. The name token is swapped in
//! the green tree, which yields a new root; the definition is then matched
//! again against that root.

use std::fmt;

use rowan::{GreenToken, NodeOrToken};
use smol_str::SmolStr;

use super::definition::{Definition, match_definition};
use crate::syntax::lexer::tokenize;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Why a replacement name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNameReason {
    Empty,
    Whitespace,
    Parenthesis,
    Quote,
    /// Does not lex as a single unquoted argument, e.g. `#x`.
    NotABareWord,
}

impl fmt::Display for InvalidNameReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvalidNameReason::Empty => "name is empty",
            InvalidNameReason::Whitespace => "name contains whitespace",
            InvalidNameReason::Parenthesis => "name contains a parenthesis",
            InvalidNameReason::Quote => "name contains a quote character",
            InvalidNameReason::NotABareWord => "name is not a bare word",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid definition name {name:?}: {reason}")]
pub struct InvalidNameError {
    pub name: String,
    pub reason: InvalidNameReason,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
    /// The definition's name token could not be found in its own tree.
    #[error("definition `{0}` does not match its tree")]
    Detached(SmolStr),
    /// The file changed after the definition was taken from it.
    #[error("definition `{0}` was taken from an outdated version of its file")]
    Stale(SmolStr),
}

/// The definition's name. Never empty.
pub fn get_name(def: &Definition) -> &str {
    def.name()
}

/// The name token inside [`Definition::root`].
pub fn name_token(def: &Definition) -> Option<SyntaxToken> {
    def.root()
        .covering_element(def.name_range())
        .into_token()
        .filter(|t| t.text_range() == def.name_range())
}

/// Check that `name` can stand as a bare argument without changing the
/// shape of the tree around it.
pub fn validate_name(name: &str) -> Result<(), InvalidNameError> {
    let reason = if name.is_empty() {
        Some(InvalidNameReason::Empty)
    } else if name.chars().any(char::is_whitespace) {
        Some(InvalidNameReason::Whitespace)
    } else if name.contains(['(', ')']) {
        Some(InvalidNameReason::Parenthesis)
    } else if name.contains(['"', '\'']) {
        Some(InvalidNameReason::Quote)
    } else {
        match tokenize(name).as_slice() {
            [token] if token.kind == SyntaxKind::UNQUOTED_ARG && token.text == name => None,
            _ => Some(InvalidNameReason::NotABareWord),
        }
    };

    match reason {
        Some(reason) => Err(InvalidNameError {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// A copy of `def` over a new tree where the name token reads `new_name`.
pub fn set_name(def: &Definition, new_name: &str) -> Result<Definition, RenameError> {
    validate_name(new_name)?;

    let detached = || RenameError::Detached(def.name.clone());
    let token = name_token(def).ok_or_else(detached)?;

    // The name may be quoted, so swap the child of the enclosing ARGUMENT
    // rather than the token itself: the token kind changes.
    let argument = token
        .parent()
        .filter(|node| node.kind() == SyntaxKind::ARGUMENT)
        .ok_or_else(detached)?;
    let replacement = GreenToken::new(SyntaxKind::UNQUOTED_ARG.into(), new_name);
    let new_argument = argument
        .green()
        .replace_child(token.index(), NodeOrToken::Token(replacement));
    let root = SyntaxNode::new_root(argument.replace_with(new_argument));

    let start = def.range().start();
    let renamed = root
        .children()
        .find(|node| node.text_range().start() == start)
        .and_then(|node| match_definition(def.file(), &node))
        .filter(|renamed| renamed.name() == new_name)
        .ok_or_else(detached)?;

    tracing::debug!(from = def.name(), to = new_name, file = %def.file(), "renamed definition");
    Ok(renamed)
}
