//! Node and token kinds of the CMake concrete syntax tree.

/// Every kind of token and node a CMake tree can contain.
///
/// Tokens come first, composite nodes after `FILE`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Trivia
    WHITESPACE = 0,
    NEWLINE,
    COMMENT,

    // Tokens
    L_PAREN,
    R_PAREN,
    IDENT,
    UNQUOTED_ARG,
    QUOTED_ARG,
    ERROR,

    // Composite
    FILE,
    FILE_ELEMENT,
    BLOCK,
    COMPOUND_EXPR,
    BLOCK_BODY,
    BLOCK_END,
    COMMAND_EXPR,
    COMMAND_NAME,
    ARGUMENTS,
    ARGUMENT,
    PAREN_GROUP,
}

use SyntaxKind::*;

const ALL: [SyntaxKind; 20] = [
    WHITESPACE,
    NEWLINE,
    COMMENT,
    L_PAREN,
    R_PAREN,
    IDENT,
    UNQUOTED_ARG,
    QUOTED_ARG,
    ERROR,
    FILE,
    FILE_ELEMENT,
    BLOCK,
    COMPOUND_EXPR,
    BLOCK_BODY,
    BLOCK_END,
    COMMAND_EXPR,
    COMMAND_NAME,
    ARGUMENTS,
    ARGUMENT,
    PAREN_GROUP,
];

impl SyntaxKind {
    /// Whitespace, newlines and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | COMMENT)
    }

    fn from_raw(raw: u16) -> Self {
        // Raw kinds only ever come from trees built by this crate.
        ALL.get(raw as usize).copied().unwrap_or(ERROR)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Marker type tying rowan trees to [`SyntaxKind`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CMakeLanguage {}

impl rowan::Language for CMakeLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<CMakeLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CMakeLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CMakeLanguage>;
pub type SyntaxNodePtr = rowan::ast::SyntaxNodePtr<CMakeLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn test_kind_raw_roundtrip_covers_every_kind() {
        for kind in ALL {
            assert_eq!(CMakeLanguage::kind_from_raw(kind.into()), kind);
        }
        assert_eq!(ALL.len(), PAREN_GROUP as usize + 1);
    }

    #[test]
    fn test_unknown_raw_kind_is_error() {
        assert_eq!(CMakeLanguage::kind_from_raw(rowan::SyntaxKind(999)), ERROR);
    }
}
