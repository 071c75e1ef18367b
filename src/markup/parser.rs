//! Recursive descent JSX parser.
//!
//! Locates the first JSX element in a component source file and parses it
//! into a [`Dom`]. Tag interiors go through the logos lexer in
//! [`crate::markup::lexer`]; text, `{...}` expressions and the surrounding
//! JavaScript are scanned by hand.

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::lexer::{unquote, TagToken};
use crate::markup::node::{Element, NodeData, NodeId};
use crate::markup::tree::Dom;
use crate::markup::MarkupError;

/// `styles.card` or `s.card` member access inside a class expression.
static MEMBER_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w$.])[A-Za-z_$][\w$]*\.([A-Za-z_$][\w$]*)").expect("valid member regex")
});

/// `styles['card-title']` computed access inside a class expression.
static INDEX_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[A-Za-z_$][\w$]*\[\s*['"]([^'"]+)['"]\s*\]"#).expect("valid index regex")
});

/// Parse the first JSX element found in `source`.
///
/// A top-level fragment (`<>...</>`) is looked through: its first element
/// becomes the root.
pub fn parse(source: &str) -> Result<Dom, MarkupError> {
    let start = find_markup_start(source).ok_or(MarkupError::NoElement)?;
    let mut parser = Parser {
        src: source,
        pos: start,
        dom: Dom::new(),
    };
    let root = match parser.parse_markup()? {
        Parsed::Element(id) => id,
        Parsed::Fragment(children) => children
            .into_iter()
            .find(|&id| parser.dom.element(id).is_some())
            .ok_or(MarkupError::NoElement)?,
    };
    parser.dom.set_root(root);
    Ok(parser.dom)
}

enum Parsed {
    Element(NodeId),
    Fragment(Vec<NodeId>),
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    dom: Dom,
}

impl<'s> Parser<'s> {
    /// Parse an element or fragment starting at `<`.
    fn parse_markup(&mut self) -> Result<Parsed, MarkupError> {
        let open_at = self.pos;
        self.pos += 1;

        let (token, name) = self.next_token()?;
        let name = match token {
            TagToken::Close => {
                let children = self.parse_children(None, open_at)?;
                return Ok(Parsed::Fragment(children));
            }
            TagToken::Name => name,
            _ => return Err(MarkupError::Unexpected { offset: open_at }),
        };

        let mut element = Element::new(normalize_tag(name));
        loop {
            let token_at = self.pos;
            let (token, text) = self.next_token()?;
            match token {
                TagToken::SelfClose => {
                    let id = self.dom.insert(NodeData::Element(element));
                    return Ok(Parsed::Element(id));
                }
                TagToken::Close => break,
                TagToken::Name => {
                    let attr = text.to_string();
                    if let Some(value) = self.parse_attribute_value(&attr)? {
                        element.attributes.insert(attr, value);
                    }
                }
                TagToken::BraceOpen => {
                    // Spread attribute: `{...props}`.
                    self.pos = scan_braces(self.src, self.pos - 1)?;
                }
                _ => return Err(MarkupError::Unexpected { offset: token_at }),
            }
        }

        let id = self.dom.insert(NodeData::Element(element));
        for child in self.parse_children(Some(name), open_at)? {
            self.dom.append(id, child);
        }
        Ok(Parsed::Element(id))
    }

    /// Parse `="..."`, `={...}` or nothing after an attribute name.
    ///
    /// Returns `None` for expression values that carry no static string.
    fn parse_attribute_value(&mut self, attr: &str) -> Result<Option<String>, MarkupError> {
        let checkpoint = self.pos;
        let Ok((TagToken::Equals, _)) = self.next_token() else {
            // Bare attribute such as `disabled`.
            self.pos = checkpoint;
            return Ok(Some("true".to_string()));
        };
        let value_at = self.pos;
        let (token, text) = self.next_token()?;
        match token {
            TagToken::Str => Ok(Some(decode_entities(unquote(text)))),
            TagToken::BraceOpen => {
                let start = self.pos - 1;
                let end = scan_braces(self.src, start)?;
                self.pos = end;
                let expr = &self.src[start + 1..end - 1];
                if attr == "className" || attr == "class" {
                    Ok(class_expression(expr))
                } else {
                    Ok(string_expression(expr))
                }
            }
            _ => Err(MarkupError::Unexpected { offset: value_at }),
        }
    }

    /// Parse children until the closing tag for `tag` (`None` for a
    /// fragment).
    fn parse_children(
        &mut self,
        tag: Option<&'s str>,
        open_at: usize,
    ) -> Result<Vec<NodeId>, MarkupError> {
        let mut children = Vec::new();
        loop {
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                return Err(MarkupError::Unclosed {
                    tag: tag.unwrap_or("").to_string(),
                    offset: open_at,
                });
            }

            if rest.starts_with("</") {
                let close_at = self.pos;
                self.pos += 2;
                let (token, text) = self.next_token()?;
                let found = match token {
                    TagToken::Close => None,
                    TagToken::Name => {
                        let (after, _) = self.next_token()?;
                        if after != TagToken::Close {
                            return Err(MarkupError::Unexpected { offset: self.pos });
                        }
                        Some(text)
                    }
                    _ => return Err(MarkupError::Unexpected { offset: close_at }),
                };
                if found != tag {
                    return Err(MarkupError::Mismatched {
                        expected: tag.unwrap_or("").to_string(),
                        found: found.unwrap_or("").to_string(),
                        offset: close_at,
                    });
                }
                return Ok(children);
            }

            if rest.starts_with('<') {
                match self.parse_markup()? {
                    Parsed::Element(id) => children.push(id),
                    Parsed::Fragment(ids) => children.extend(ids),
                }
                continue;
            }

            if rest.starts_with('{') {
                let start = self.pos;
                let end = scan_braces(self.src, start)?;
                self.pos = end;
                if let Some(text) = string_expression(&self.src[start + 1..end - 1]) {
                    if !text.trim().is_empty() {
                        children.push(self.dom.insert(NodeData::Text(text)));
                    }
                }
                continue;
            }

            let stop = rest.find(['<', '{']).unwrap_or(rest.len());
            let text = jsx_text(&rest[..stop]);
            self.pos += stop;
            if !text.is_empty() {
                children.push(self.dom.insert(NodeData::Text(text)));
            }
        }
    }

    /// Lex one tag token at the current position and advance past it.
    fn next_token(&mut self) -> Result<(TagToken, &'s str), MarkupError> {
        let src: &'s str = self.src;
        let rest = &src[self.pos..];
        let mut lexer = TagToken::lexer(rest);
        let Some(result) = lexer.next() else {
            return Err(MarkupError::Unclosed {
                tag: String::new(),
                offset: self.pos,
            });
        };
        let span = lexer.span();
        let offset = self.pos + span.start;
        let token = result.map_err(|_| MarkupError::Unexpected { offset })?;
        self.pos += span.end;
        Ok((token, &rest[span]))
    }
}

/// Lowercase a tag name; member expressions (`Icons.Home`) become `div`.
fn normalize_tag(name: &str) -> String {
    if name.contains('.') {
        "div".to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Apply JSX text whitespace rules: text on a single line is kept as is;
/// multi-line text has each line trimmed, blank lines dropped and the rest
/// joined with single spaces. Whitespace-only text yields an empty string.
fn jsx_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let joined = if raw.contains('\n') {
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        raw.to_string()
    };
    decode_entities(&joined)
}

/// Decode the HTML entities JSX text commonly contains.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// The static string of a `{"..."}`, `{'...'}` or `` {`...`} `` expression.
fn string_expression(expr: &str) -> Option<String> {
    let expr = expr.trim();
    let quote = expr.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || expr.len() < 2 || !expr.ends_with(quote) {
        return None;
    }
    let body = &expr[1..expr.len() - 1];
    if quote == '`' && body.contains("${") {
        return None;
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Some(out)
}

/// Class names referenced by a `className={...}` expression.
///
/// `styles.card` → `card`; `` `${styles.a} ${styles.b}` `` → `a b`; a plain
/// string literal is taken verbatim.
fn class_expression(expr: &str) -> Option<String> {
    if let Some(literal) = string_expression(expr) {
        return Some(literal);
    }
    let mut names: Vec<String> = Vec::new();
    let mut hits: Vec<(usize, String)> = MEMBER_CLASS
        .captures_iter(expr)
        .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str().to_string())))
        .chain(
            INDEX_CLASS
                .captures_iter(expr)
                .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str().to_string()))),
        )
        .collect();
    hits.sort_by_key(|(at, _)| *at);
    for (_, name) in hits {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    (!names.is_empty()).then(|| names.join(" "))
}

/// Index just past the `}` matching the `{` at `start`. Quoted strings and
/// comments inside the expression are skipped.
fn scan_braces(src: &str, start: usize) -> Result<usize, MarkupError> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            b'"' | b'\'' | b'`' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line(bytes, i),
            _ => {}
        }
        i += 1;
    }
    Err(MarkupError::UnterminatedExpression { offset: start })
}

/// Index of the closing quote of the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Index of the `/` ending the block comment starting at `start`.
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Index of the newline ending the line comment starting at `start`.
fn skip_line(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

/// Byte offset of the first `<` that opens JSX: followed by a letter or `>`
/// and preceded by an expression position (`(`, `=`, `return`, `=>`, ...).
/// Strings and comments in the surrounding JavaScript are skipped.
fn find_markup_start(src: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line(bytes, i),
            b'<' => {
                let opens = bytes
                    .get(i + 1)
                    .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'>');
                if opens && in_expression_position(&src[..i]) {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn in_expression_position(before: &str) -> bool {
    let trimmed = before.trim_end();
    let Some(last) = trimmed.chars().last() else {
        return true;
    };
    if "(=,?:{[&|>".contains(last) {
        return true;
    }
    trimmed
        .strip_suffix("return")
        .is_some_and(|head| !head.ends_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root_element(dom: &Dom) -> &Element {
        dom.root().and_then(|r| dom.element(r)).unwrap()
    }

    // ── Locating markup ──────────────────────────────────────────────

    #[test]
    fn finds_markup_after_return() {
        let src = r#"
import styles from './index.module.scss';
// a < b is not markup
export default function Home() {
  const x = 1 < 2;
  return (
    <div className={styles.root}>hi</div>
  );
}
"#;
        let dom = parse(src).unwrap();
        let root = root_element(&dom);
        assert_eq!(root.tag, "div");
        assert_eq!(root.class_attr(), Some("root"));
    }

    #[test]
    fn no_markup_is_an_error() {
        assert_eq!(parse("const a = 1;").unwrap_err(), MarkupError::NoElement);
    }

    #[test]
    fn top_level_fragment_uses_first_element() {
        let dom = parse("export default () => <><span>a</span><div /></>;").unwrap();
        assert_eq!(root_element(&dom).tag, "span");
    }

    // ── Attributes ───────────────────────────────────────────────────

    #[test]
    fn attribute_forms() {
        let dom = parse(
            r#"const a = <input type="date" placeholder='YYYY/MM/DD' label={"Birth"} disabled onChange={() => {}} {...rest} />"#,
        )
        .unwrap();
        let el = root_element(&dom);
        assert_eq!(el.tag, "input");
        assert_eq!(el.attr("type"), Some("date"));
        assert_eq!(el.attr("placeholder"), Some("YYYY/MM/DD"));
        assert_eq!(el.attr("label"), Some("Birth"));
        assert_eq!(el.attr("disabled"), Some("true"));
        assert_eq!(el.attr("onChange"), None);
    }

    #[test]
    fn class_expressions() {
        assert_eq!(class_expression("styles.card"), Some("card".into()));
        assert_eq!(class_expression("styles['card-title']"), Some("card-title".into()));
        assert_eq!(
            class_expression("`${styles.a} ${styles.b}`"),
            Some("a b".into())
        );
        assert_eq!(class_expression("'plain'"), Some("plain".into()));
        assert_eq!(class_expression("cond"), None);
    }

    // ── Children ─────────────────────────────────────────────────────

    #[test]
    fn children_text_and_expressions() {
        let dom = parse(
            "const a = (\n  <p>\n    Hello &amp;\n    world\n    {' again'}\n    {/* note */}\n    <br />\n  </p>\n);",
        )
        .unwrap();
        let root = dom.root().unwrap();
        let kids = dom.children(root);
        assert_eq!(kids.len(), 3);
        assert_eq!(dom.get(kids[0]).and_then(NodeData::as_text), Some("Hello & world"));
        assert_eq!(dom.get(kids[1]).and_then(NodeData::as_text), Some(" again"));
        assert!(dom.element(kids[2]).is_some_and(|e| e.is("br")));
    }

    #[test]
    fn member_tags_become_div() {
        let dom = parse("const a = <Foo.Bar><Img /></Foo.Bar>;").unwrap();
        assert_eq!(root_element(&dom).tag, "div");
        let child = dom.children(dom.root().unwrap())[0];
        assert_eq!(dom.element(child).map(|e| e.tag.as_str()), Some("img"));
    }

    #[test]
    fn nested_fragments_are_flattened() {
        let dom = parse("const a = <div><>a<b /></></div>;").unwrap();
        assert_eq!(dom.children(dom.root().unwrap()).len(), 2);
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn mismatched_close_is_reported() {
        let err = parse("const a = <div><span></div></span>;").unwrap_err();
        assert!(matches!(err, MarkupError::Mismatched { ref expected, ref found, .. }
            if expected == "span" && found == "div"));
    }

    #[test]
    fn unclosed_element_is_reported() {
        let err = parse("const a = <div><span>text").unwrap_err();
        assert!(matches!(err, MarkupError::Unclosed { ref tag, .. } if tag == "span"));
    }

    #[test]
    fn decode_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42; & done"), "AB & done");
    }
}
