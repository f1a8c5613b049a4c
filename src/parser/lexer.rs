use logos::Logos;
use std::ops::Range;

/// Tokens of a textual type specification
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TypeToken {
    #[token("extends")]
    Extends,
    #[token("super")]
    Super,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("<")]
    Lt,
    // `>>` is never a single token here; nested argument lists close one at a time
    #[token(">")]
    Gt,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("?")]
    Question,
}

/// Tokens of the static text of an attribute value
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum TextToken {
    #[token("@{")]
    Open,
    #[token("@")]
    At,
    #[regex(r"[^@]+")]
    Text,
}

/// Tokens inside an `@{...}` expression; the lexer is morphed from [`TextToken`]
/// after `@{` and back after the closing brace
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum ExprToken {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    /// Quoted literal; braces inside do not count towards nesting
    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,
    #[token("\"")]
    Quote,
    #[regex(r#"[^{}"]+"#)]
    Text,
}

/// Token with its byte range in the lexed input
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalToken<'a, T> {
    pub token: T,
    pub lexeme: &'a str,
    pub span: Range<usize>,
}

impl<'a, T: PartialEq> LexicalToken<'a, T> {
    pub fn is(&self, token: &T) -> bool {
        &self.token == token
    }
}

/// Lex a type spec; fails with the byte offset of the first unrecognized character
pub fn tokenize_type(source: &str) -> Result<Vec<LexicalToken<'_, TypeToken>>, usize> {
    tokenize::<TypeToken>(source)
}

fn tokenize<'a, T>(source: &'a str) -> Result<Vec<LexicalToken<'a, T>>, usize>
where
    T: Logos<'a, Source = str> + Copy,
    T::Extras: Default,
{
    let mut lexer = T::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(LexicalToken {
                token,
                lexeme: lexer.slice(),
                span: lexer.span(),
            }),
            Err(_) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}
