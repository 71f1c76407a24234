//! Definition matching: recognizing `function`/`macro` blocks.
//!
//! Only direct children of the file root are considered:
//!
//! ```text
//! FILE
//! └─ FILE_ELEMENT              <- candidate
//!    └─ BLOCK
//!       └─ COMPOUND_EXPR
//!          └─ COMMAND_EXPR     function(name args...)
//! ```
//!
//! A definition nested inside another block's body is not a match.

use std::fmt;
use std::hash::{Hash, Hasher};

use rowan::GreenNode;
use rowan::ast::AstNode;
use smol_str::SmolStr;

use crate::base::{FileId, TextRange};
use crate::syntax::ast::{FileElement, Statement};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxNodePtr};

/// What kind of block a definition opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKind {
    Function,
    Macro,
    /// Never produced by [`match_definition`]; reserved for definitions
    /// that should be surfaced without a known classification.
    Unknown,
}

impl DefinitionKind {
    /// Classify a block-opening command name. CMake command names are
    /// case-insensitive.
    pub fn from_command(command: &str) -> Option<Self> {
        if command.eq_ignore_ascii_case("function") {
            Some(Self::Function)
        } else if command.eq_ignore_ascii_case("macro") {
            Some(Self::Macro)
        } else {
            None
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            DefinitionKind::Function => "function",
            DefinitionKind::Macro => "macro",
            DefinitionKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// A named `function` or `macro` definition found in a file.
///
/// The definition keeps the green tree it was found in, so it is
/// `Send + Sync` and can outlive the cursor it was matched from.
#[derive(Clone)]
pub struct Definition {
    pub(crate) name: SmolStr,
    pub(crate) kind: DefinitionKind,
    pub(crate) file: FileId,
    pub(crate) anchor: SyntaxNodePtr,
    pub(crate) label: String,
    pub(crate) name_range: TextRange,
    pub(crate) root: GreenNode,
}

impl Definition {
    /// Never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Verbatim text of the block head, e.g. `function(foo a b)`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Range of the whole matched top-level element.
    pub fn range(&self) -> TextRange {
        self.anchor.text_range()
    }

    /// Range of the name token.
    pub fn name_range(&self) -> TextRange {
        self.name_range
    }

    /// The root of the tree this definition was matched in.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.root.clone())
    }

    /// The green tree this definition was matched in.
    pub fn green(&self) -> &GreenNode {
        &self.root
    }

    /// The matched top-level node, in a fresh cursor over [`Self::root`].
    pub fn anchor(&self) -> Option<SyntaxNode> {
        self.anchor.try_to_node(&self.root())
    }
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
            && self.anchor == other.anchor
            && self.name == other.name
            && self.kind == other.kind
    }
}

impl Eq for Definition {}

impl Hash for Definition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.hash(state);
        self.anchor.hash(state);
        self.name.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("file", &self.file)
            .field("range", &self.range())
            .finish()
    }
}

/// Match one top-level node against the definition pattern.
///
/// Returns `None` for anything that is not a direct child of the file root
/// opening a `function` or `macro` block whose first argument is a plain
/// word or string.
pub fn match_definition(file: FileId, node: &SyntaxNode) -> Option<Definition> {
    let root = node.parent().filter(|p| p.kind() == SyntaxKind::FILE)?;

    let Statement::Block(block) = FileElement::cast(node.clone())?.statement()? else {
        return None;
    };
    let head = block.head()?.command()?;
    if !head.has_closing_paren() {
        return None;
    }
    let kind = DefinitionKind::from_command(head.name_token()?.text())?;

    let name_token = head.first_argument()?.token()?;
    if name_token.text().is_empty() {
        return None;
    }

    Some(Definition {
        name: SmolStr::new(name_token.text()),
        kind,
        file,
        anchor: SyntaxNodePtr::new(node),
        label: head.syntax().text().to_string(),
        name_range: name_token.text_range(),
        root: root.green().into_owned(),
    })
}

/// All definitions among the top-level nodes of `root`, in source order.
pub fn file_definitions(file: FileId, root: &SyntaxNode) -> Vec<Definition> {
    let definitions: Vec<_> = root
        .children()
        .filter_map(|node| match_definition(file, &node))
        .collect();
    tracing::trace!(%file, count = definitions.len(), "extracted definitions");
    definitions
}
