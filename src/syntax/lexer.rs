//! Tokenizer for CMake source text.
//!
//! The lexer is lossless: concatenating the text of every token gives back
//! the input. Anything it does not understand becomes an `ERROR` token.

use logos::Logos;

use super::kind::SyntaxKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[token("#", lex_comment)]
    Comment,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    Quoted,

    #[regex(r#"([^ \t\r\n()#"\\]|\\.)([^ \t\r\n()"\\]|\\.)*"#)]
    Unquoted,
}

/// Extends a `#` match over a line comment or a `#[[ ... ]]` bracket comment.
fn lex_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    let rest = lex.remainder();
    let len = bracket_len(rest).unwrap_or_else(|| rest.find(['\r', '\n']).unwrap_or(rest.len()));
    lex.bump(len);
    true
}

/// Length of a bracket body `[=*[ ... ]=*]` at the start of `rest`.
/// An unterminated bracket runs to the end of the input.
fn bracket_len(rest: &str) -> Option<usize> {
    let after_open = rest.strip_prefix('[')?;
    let level = after_open.bytes().take_while(|&b| b == b'=').count();
    let body = after_open[level..].strip_prefix('[')?;

    let close = format!("]{}]", "=".repeat(level));
    let open_len = level + 2;
    Some(match body.find(&close) {
        Some(end) => open_len + end + close.len(),
        None => rest.len(),
    })
}

/// A token with its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Split `text` into tokens. Command names come out as `UNQUOTED_ARG`;
/// the parser decides which words are identifiers.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    RawToken::lexer(text)
        .spanned()
        .map(|(token, span)| {
            let kind = match token {
                Ok(RawToken::Whitespace) => SyntaxKind::WHITESPACE,
                Ok(RawToken::Newline) => SyntaxKind::NEWLINE,
                Ok(RawToken::Comment) => SyntaxKind::COMMENT,
                Ok(RawToken::LParen) => SyntaxKind::L_PAREN,
                Ok(RawToken::RParen) => SyntaxKind::R_PAREN,
                Ok(RawToken::Quoted) => SyntaxKind::QUOTED_ARG,
                Ok(RawToken::Unquoted) => SyntaxKind::UNQUOTED_ARG,
                Err(()) => SyntaxKind::ERROR,
            };
            Token {
                kind,
                text: &text[span],
            }
        })
        .collect()
}

/// True if `word` is usable as a command name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
