//! Error-tolerant parser producing rowan green trees.
//!
//! Every input parses. Problems are recorded as [`ParseError`]s and the
//! offending tokens stay in the tree, so the tree text always equals the
//! input text.

use rowan::{GreenNode, GreenNodeBuilder};

use super::kind::{SyntaxKind, SyntaxNode};
use super::lexer::{self, Token};
use crate::base::{TextRange, TextSize};

use SyntaxKind::*;

/// Commands that open a block, with the command that closes it.
const BLOCK_OPENERS: &[(&str, &str)] = &[
    ("function", "endfunction"),
    ("macro", "endmacro"),
    ("if", "endif"),
    ("foreach", "endforeach"),
    ("while", "endwhile"),
];

/// A recoverable syntax problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// The result of parsing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// A fresh cursor over the tree. Each call creates a new root.
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse CMake source text.
pub fn parse(text: &str) -> Parse {
    let mut parser = Parser::new(lexer::tokenize(text));
    parser.file();
    parser.finish()
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    offset: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    /// Closing commands of the blocks currently open, innermost last.
    open_blocks: Vec<&'static str>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            pos: 0,
            offset: TextSize::from(0),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            open_blocks: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn current(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn bump(&mut self) {
        if let Some(kind) = self.current() {
            self.bump_as(kind);
        }
    }

    fn bump_as(&mut self, kind: SyntaxKind) {
        let Some(token) = self.tokens.get(self.pos) else {
            return;
        };
        self.builder.token(kind.into(), token.text);
        self.offset += TextSize::of(token.text);
        self.pos += 1;
    }

    fn error(&mut self, message: impl Into<String>) {
        let len = self
            .tokens
            .get(self.pos)
            .map(|t| TextSize::of(t.text))
            .unwrap_or_default();
        self.errors.push(ParseError {
            message: message.into(),
            range: TextRange::at(self.offset, len),
        });
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn end(&mut self) {
        self.builder.finish_node();
    }

    /// Lowercased command name if the cursor sits on `name (`.
    fn command_at_cursor(&self) -> Option<String> {
        let token = self.tokens.get(self.pos)?;
        if token.kind != UNQUOTED_ARG || !lexer::is_identifier(token.text) {
            return None;
        }
        let next = self.tokens[self.pos + 1..]
            .iter()
            .find(|t| t.kind != WHITESPACE)?;
        (next.kind == L_PAREN).then(|| token.text.to_ascii_lowercase())
    }

    fn file(&mut self) {
        self.start(FILE);
        self.elements();
        self.end();
    }

    /// Parse elements until end of input or the closing command of the
    /// innermost open block. Returns true if that closing command was found.
    fn elements(&mut self) -> bool {
        loop {
            let Some(kind) = self.current() else {
                return false;
            };
            if kind.is_trivia() {
                self.bump();
                continue;
            }

            let Some(name) = self.command_at_cursor() else {
                self.error("expected a command invocation");
                self.bump_as(ERROR);
                continue;
            };

            if self.open_blocks.last() == Some(&name.as_str()) {
                return true;
            }
            if self.open_blocks.iter().any(|end| *end == name) {
                // Closes an outer block; the inner one was never closed.
                return false;
            }

            self.start(FILE_ELEMENT);
            match BLOCK_OPENERS.iter().find(|(open, _)| *open == name) {
                Some(&(opener, closer)) => self.block(opener, closer),
                None => {
                    if BLOCK_OPENERS.iter().any(|(_, close)| *close == name) {
                        self.error(format!("`{name}` without a matching opening command"));
                    }
                    self.command_expr();
                }
            }
            self.end();
        }
    }

    fn block(&mut self, opener: &str, closer: &'static str) {
        self.start(BLOCK);

        self.start(COMPOUND_EXPR);
        self.command_expr();
        self.end();

        self.start(BLOCK_BODY);
        self.open_blocks.push(closer);
        let closed = self.elements();
        self.open_blocks.pop();
        self.end();

        if closed {
            self.start(BLOCK_END);
            self.command_expr();
            self.end();
        } else {
            self.error(format!("unterminated `{opener}` block, expected `{closer}()`"));
        }

        self.end();
    }

    /// `name ( args )`; the caller has checked the `name (` prefix.
    fn command_expr(&mut self) {
        self.start(COMMAND_EXPR);

        self.start(COMMAND_NAME);
        self.bump_as(IDENT);
        self.end();

        while self.current() == Some(WHITESPACE) {
            self.bump();
        }
        self.bump(); // L_PAREN

        self.start(ARGUMENTS);
        self.arguments();
        self.end();

        if self.current() == Some(R_PAREN) {
            self.bump();
        } else {
            self.error("missing `)`");
        }

        self.end();
    }

    fn arguments(&mut self) {
        while let Some(kind) = self.current() {
            match kind {
                R_PAREN => return,
                L_PAREN => {
                    self.start(PAREN_GROUP);
                    self.bump();
                    self.arguments();
                    if self.current() == Some(R_PAREN) {
                        self.bump();
                    } else {
                        self.error("missing `)`");
                    }
                    self.end();
                }
                UNQUOTED_ARG | QUOTED_ARG => {
                    self.start(ARGUMENT);
                    self.bump();
                    self.end();
                }
                _ => self.bump(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of_top_level(text: &str) -> Vec<SyntaxKind> {
        parse(text)
            .syntax_node()
            .children()
            .filter_map(|n| n.first_child())
            .map(|n| n.kind())
            .collect()
    }

    #[test]
    fn test_parse_is_lossless() {
        let text = "cmake_minimum_required(VERSION 3.20)\n\
                    # comment\n\
                    function(foo a b)\n  message(STATUS \"${a}\")\nendfunction()\n";
        let parse = parse(text);
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        assert_eq!(parse.syntax_node().text().to_string(), text);
    }

    #[test]
    fn test_blocks_and_commands() {
        let text = "project(x)\nmacro(m)\nendmacro()\nif(A)\nelse()\nendif()\n";
        assert_eq!(kinds_of_top_level(text), vec![COMMAND_EXPR, BLOCK, BLOCK]);
    }

    #[test]
    fn test_block_shape() {
        let root = parse("function(foo a)\n  bar()\nendfunction()").syntax_node();
        let block = root.first_child().and_then(|e| e.first_child()).unwrap();
        let children: Vec<_> = block.children().map(|n| n.kind()).collect();
        assert_eq!(children, vec![COMPOUND_EXPR, BLOCK_BODY, BLOCK_END]);

        let head = block.first_child().unwrap();
        assert_eq!(head.text().to_string(), "function(foo a)");
    }

    #[test]
    fn test_end_command_is_case_insensitive() {
        let parse = parse("FUNCTION(foo)\nENDFUNCTION()\n");
        assert!(!parse.has_errors());
    }

    #[test]
    fn test_unterminated_block_runs_to_eof() {
        let parse = parse("function(foo)\n  message(hi)\n");
        assert_eq!(parse.errors().len(), 1);
        assert!(parse.errors()[0].message.contains("unterminated"));
        assert_eq!(kinds_of_top_level("function(foo)\n  message(hi)\n"), vec![BLOCK]);
    }

    #[test]
    fn test_outer_closer_closes_inner_block() {
        let text = "function(f)\n  if(x)\nendfunction()\nproject(p)\n";
        let parse = parse(text);
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(kinds_of_top_level(text), vec![BLOCK, COMMAND_EXPR]);
    }

    #[test]
    fn test_nested_parens_in_arguments() {
        let root = parse("if((A OR B) AND C)\nendif()").syntax_node();
        let args = root
            .descendants()
            .find(|n| n.kind() == ARGUMENTS)
            .unwrap();
        let kinds: Vec<_> = args.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![PAREN_GROUP, ARGUMENT, ARGUMENT]);
    }

    #[test]
    fn test_stray_tokens_are_errors() {
        let text = "oops\n)\nproject(x)";
        let parse = parse(text);
        assert_eq!(parse.errors().len(), 2);
        assert_eq!(parse.syntax_node().text().to_string(), text);
    }
}
