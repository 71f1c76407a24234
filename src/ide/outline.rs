//! Outline: the navigable summary of one file.
//!
//! The root node stands for the file; its children are the file's
//! top-level definitions in source order. Definitions have no children
//! today, but the field is always present so nested entries can be added
//! without changing the shape.

use crate::base::{FileId, LineCol, LineIndex, TextRange};
use crate::hir::{Definition, match_definition};
use crate::syntax::SyntaxNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutlineKind {
    File,
    Definition,
}

/// One entry of an outline tree.
#[derive(Clone, Debug)]
pub struct OutlineNode {
    /// File name for the root, verbatim block head for definitions.
    pub label: String,
    pub kind: OutlineKind,
    /// The node this entry navigates to.
    pub anchor: SyntaxNode,
    pub range: TextRange,
    /// Start of `range`.
    pub location: LineCol,
    /// Set for [`OutlineKind::Definition`] entries.
    pub definition: Option<Definition>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// This node and all of its descendants, depth first.
    pub fn descendants(&self) -> Vec<&OutlineNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }
}

/// Structural equality: anchors compare by kind and range, not identity.
impl PartialEq for OutlineNode {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.kind == other.kind
            && self.anchor.kind() == other.anchor.kind()
            && self.range == other.range
            && self.location == other.location
            && self.definition == other.definition
            && self.children == other.children
    }
}

impl Eq for OutlineNode {}

/// Build the outline of the file rooted at `root`.
pub fn build_outline(file: FileId, display_name: &str, root: &SyntaxNode) -> OutlineNode {
    let line_index = LineIndex::new(&root.text().to_string());

    let children = root
        .children()
        .filter_map(|node| {
            let definition = match_definition(file, &node)?;
            let range = node.text_range();
            Some(OutlineNode {
                label: definition.label().to_owned(),
                kind: OutlineKind::Definition,
                anchor: node,
                range,
                location: line_index.line_col(range.start()),
                definition: Some(definition),
                children: Vec::new(),
            })
        })
        .collect();

    OutlineNode {
        label: display_name.to_owned(),
        kind: OutlineKind::File,
        anchor: root.clone(),
        range: root.text_range(),
        location: LineCol::default(),
        definition: None,
        children,
    }
}
