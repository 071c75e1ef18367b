//! logos-based lexer for the inside of a JSX tag.
//!
//! Text content and `{...}` expressions are not regular, so the parser scans
//! those by hand and only uses this lexer between `<` and `>`.

use logos::Logos;

/// Token inside a JSX opening or closing tag.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum TagToken {
    /// `/>`
    #[token("/>")]
    SelfClose,

    /// `>`
    #[token(">")]
    Close,

    /// `/` (start of a closing tag name after `<`)
    #[token("/")]
    Slash,

    /// `=`
    #[token("=")]
    Equals,

    /// `{` (start of an expression or spread attribute)
    #[token("{")]
    BraceOpen,

    /// Tag or attribute name: `div`, `data-id`, `Foo.Bar`, `xlink:href`.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$.:-]*")]
    Name,

    /// Quoted attribute value.
    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Str,
}

/// Strip the surrounding quotes from a [`TagToken::Str`] slice.
pub fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
