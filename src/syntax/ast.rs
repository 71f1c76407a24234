//! Typed wrappers over untyped syntax nodes.
//!
//! Each wrapper accepts exactly one [`SyntaxKind`]; `cast` returns `None`
//! for anything else. Accessors return `None` when the parser had to
//! recover and the expected child is missing.

use rowan::ast::AstNode;

use super::kind::{CMakeLanguage, SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            type Language = CMakeLanguage;

            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// The root of a file.
    SourceFile => FILE
);
ast_node!(
    /// One top-level (or block body) statement.
    FileElement => FILE_ELEMENT
);
ast_node!(Block => BLOCK);
ast_node!(
    /// The head of a block, e.g. `function(foo a b)`.
    CompoundExpr => COMPOUND_EXPR
);
ast_node!(BlockBody => BLOCK_BODY);
ast_node!(BlockEnd => BLOCK_END);
ast_node!(CommandExpr => COMMAND_EXPR);
ast_node!(Argument => ARGUMENT);

/// What a [`FileElement`] holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Block(Block),
    Command(CommandExpr),
}

fn child<N: AstNode<Language = CMakeLanguage>>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

impl SourceFile {
    pub fn elements(&self) -> impl Iterator<Item = FileElement> + '_ {
        self.0.children().filter_map(FileElement::cast)
    }
}

impl FileElement {
    /// The statement this element wraps, classified by its first child.
    pub fn statement(&self) -> Option<Statement> {
        let first = self.0.first_child()?;
        match first.kind() {
            SyntaxKind::BLOCK => Some(Statement::Block(Block(first))),
            SyntaxKind::COMMAND_EXPR => Some(Statement::Command(CommandExpr(first))),
            _ => None,
        }
    }
}

impl Block {
    pub fn head(&self) -> Option<CompoundExpr> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<BlockBody> {
        child(&self.0)
    }

    pub fn end(&self) -> Option<BlockEnd> {
        child(&self.0)
    }
}

impl CompoundExpr {
    pub fn command(&self) -> Option<CommandExpr> {
        child(&self.0)
    }
}

impl BlockBody {
    pub fn elements(&self) -> impl Iterator<Item = FileElement> + '_ {
        self.0.children().filter_map(FileElement::cast)
    }
}

impl BlockEnd {
    pub fn command(&self) -> Option<CommandExpr> {
        child(&self.0)
    }
}

impl CommandExpr {
    /// The `IDENT` token naming the command.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::COMMAND_NAME)?
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
    }

    /// Arguments at the outermost parenthesis level, in order.
    pub fn arguments(&self) -> impl Iterator<Item = Argument> + use<> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARGUMENTS)
            .into_iter()
            .flat_map(|args| args.children())
            .filter_map(Argument::cast)
    }

    /// The first argument, unless the argument list opens with a nested
    /// `( ... )` group or is empty.
    pub fn first_argument(&self) -> Option<Argument> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARGUMENTS)?
            .first_child()
            .and_then(Argument::cast)
    }

    pub fn has_closing_paren(&self) -> bool {
        self.0
            .children_with_tokens()
            .any(|e| e.kind() == SyntaxKind::R_PAREN)
    }
}

impl Argument {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}
