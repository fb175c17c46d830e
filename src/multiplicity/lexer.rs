//! Logos-based lexer for multiplicity bounds.
//!
//! The bound notation is tiny (`*`, `N`, `N..M`, `N..*`, optionally wrapped
//! in `[ ]`), but tokenising it up front keeps the parser a plain
//! recursive-descent over tokens, the same split the SysML parser uses.

use logos::Logos;

/// A token with its kind and source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    #[token("..")]
    DotDot,

    #[token("*")]
    Star,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

/// Tokenise `input`, failing on the first slice that is not a token.
///
/// The error carries the offending text and its byte offset.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>, (String, usize)> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();
    while let Some(next) = lexer.next() {
        let text = lexer.slice();
        let offset = lexer.span().start;
        match next {
            Ok(kind) => tokens.push(Token { kind, text, offset }),
            Err(()) => return Err((text.to_string(), offset)),
        }
    }
    Ok(tokens)
}
