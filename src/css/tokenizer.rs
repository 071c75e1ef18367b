//! logos-based selector tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `.card-title` as [`Token::Class`] beats `.` alone)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Only selectors are tokenized; declaration values stay raw strings and are
//! interpreted by the value translators.

use logos::Logos;

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Class selector: `.title`, `.frame-12`, `.card_2`.
    #[regex(r"\.[A-Za-z0-9_-]+")]
    Class,

    /// ID selector: `#main`.
    #[regex(r"#[A-Za-z_-][A-Za-z0-9_-]*")]
    Id,

    /// Pseudo-element: `::before`, `::placeholder`.
    #[regex(r"::[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoElement,

    /// Pseudo-class: `:hover`, `:first-child`.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Attribute selector: `[type="text"]`.
    #[regex(r"\[[^\]]*\]")]
    Attribute,

    /// Parenthesized argument of a functional pseudo-class: `(2n+1)`.
    #[regex(r"\([^)]*\)")]
    Arguments,

    /// Type selector or keyword: `div`, `span`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `&` parent reference (only left over when a rule was not flattened).
    #[token("&")]
    Parent,

    /// `,`
    #[token(",")]
    Comma,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `+`
    #[token("+")]
    Plus,

    /// `~`
    #[token("~")]
    Tilde,
}

/// Tokenize a selector string into `(Token, text)` pairs.
///
/// Characters that fail to lex are skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

/// All class names in a selector, in source order, without the leading dot.
pub fn class_names(selector: &str) -> Vec<String> {
    tokenize(selector)
        .into_iter()
        .filter(|(token, _)| *token == Token::Class)
        .map(|(_, text)| text[1..].to_string())
        .collect()
}

/// The last class name in a selector, which keys the rule in the style table.
///
/// `.card .title:hover` → `title`; `div > span` → `None`.
pub fn last_class_name(selector: &str) -> Option<String> {
    class_names(selector).pop()
}
