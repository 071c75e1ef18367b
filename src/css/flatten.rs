//! Nested stylesheet flattener.
//!
//! Handles the SCSS-module subset produced by design exporters: nested rules,
//! `&` parent references, comma selector lists, block and line comments, and
//! declarations whose value spans several lines. It never fails; anything it
//! does not understand is skipped, and blocks left open at the end of the
//! input are closed.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::css::model::{Declaration, FlatRule};

static PROPERTY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_-][a-zA-Z0-9_-]*$").expect("valid property regex"));

/// One open block on the selector stack.
#[derive(Debug)]
struct Frame {
    selectors: Vec<String>,
    declarations: Vec<Declaration>,
}

/// A declaration whose value has not reached its `;` yet.
#[derive(Debug)]
struct PendingDeclaration {
    property: String,
    value: String,
}

/// Flatten nested stylesheet text into flat rules, one per resolved selector.
///
/// Rules are emitted when their block closes, so an inner rule precedes the
/// remainder of its parent when the parent has declarations after it.
pub fn flatten(source: &str) -> Vec<FlatRule> {
    let mut flattener = Flattener::new();
    for raw_line in source.replace("\r\n", "\n").split('\n') {
        let Some(line) = flattener.strip_comments(raw_line) else {
            continue;
        };
        for segment in split_segments(&line) {
            flattener.feed(segment.trim());
        }
    }
    flattener.finish()
}

struct Flattener {
    stack: Vec<Frame>,
    in_block_comment: bool,
    pending: Option<PendingDeclaration>,
    rules: Vec<FlatRule>,
}

impl Flattener {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                selectors: vec![String::new()],
                declarations: Vec::new(),
            }],
            in_block_comment: false,
            pending: None,
            rules: Vec::new(),
        }
    }

    /// Remove `/* */` comments (tracking state across lines) and `//`
    /// comments outside quotes. Returns `None` when nothing is left.
    fn strip_comments(&mut self, raw: &str) -> Option<String> {
        let mut line = raw.to_string();
        if self.in_block_comment {
            let end = line.find("*/")?;
            self.in_block_comment = false;
            line = line[end + 2..].to_string();
        }
        while let Some(start) = line.find("/*") {
            match line[start + 2..].find("*/") {
                Some(rel_end) => {
                    let end = start + 2 + rel_end + 2;
                    line.replace_range(start..end, "");
                }
                None => {
                    self.in_block_comment = true;
                    line.truncate(start);
                    break;
                }
            }
        }
        let line = strip_line_comment(&line).trim().to_string();
        (!line.is_empty()).then_some(line)
    }

    fn feed(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        if let Some(mut pending) = self.pending.take() {
            if line == "}" {
                // The last declaration of a block may omit its `;`.
                let decl = Declaration::new(pending.property, &pending.value);
                self.top().declarations.push(decl);
                self.close_block();
                return;
            }
            pending.value = format!("{} {}", pending.value, line).trim().to_string();
            match terminator_index(&pending.value) {
                Some(end) => {
                    let decl = Declaration::new(pending.property, &pending.value[..=end]);
                    self.top().declarations.push(decl);
                }
                None => self.pending = Some(pending),
            }
            return;
        }

        if let Some(selector) = line.strip_suffix('{') {
            self.open_block(selector.trim());
            return;
        }
        if line == "}" {
            self.close_block();
            return;
        }

        if let Some(colon) = line.find(':') {
            let property = line[..colon].trim();
            let value = line[colon + 1..].trim();
            if property.is_empty() || !PROPERTY_NAME.is_match(property) {
                debug!(line, "skipping unrecognized stylesheet line");
                return;
            }
            match terminator_index(value) {
                Some(end) => {
                    let decl = Declaration::new(property, &value[..=end]);
                    self.top().declarations.push(decl);
                }
                None => {
                    self.pending = Some(PendingDeclaration {
                        property: property.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open_block(&mut self, selector: &str) {
        let parents = self
            .stack
            .last()
            .map(|frame| frame.selectors.clone())
            .unwrap_or_else(|| vec![String::new()]);
        let selectors = combine_selectors(&parents, selector);
        self.stack.push(Frame {
            selectors,
            declarations: Vec::new(),
        });
    }

    fn close_block(&mut self) {
        self.pending = None;
        // The synthetic root frame is never popped.
        if self.stack.len() <= 1 {
            return;
        }
        self.flush_top();
        self.stack.pop();
    }

    /// Emit the top frame's declarations once per resolved selector.
    fn flush_top(&mut self) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        if frame.declarations.is_empty() {
            return;
        }
        let declarations = std::mem::take(&mut frame.declarations);
        for selector in frame.selectors.iter().filter(|s| !s.is_empty()) {
            self.rules.push(FlatRule {
                selector: selector.clone(),
                declarations: declarations.clone(),
            });
        }
    }

    fn finish(mut self) -> Vec<FlatRule> {
        if self.stack.len() > 1 {
            debug!(
                open_blocks = self.stack.len() - 1,
                "closing unbalanced stylesheet blocks at end of input"
            );
        }
        while self.stack.len() > 1 {
            self.flush_top();
            self.stack.pop();
        }
        self.rules
    }
}

/// Byte index of the `;` ending a declaration value, skipping any inside
/// quotes or parentheses.
fn terminator_index(value: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '(' if !in_single && !in_double => depth += 1,
            ')' if !in_single && !in_double => depth = depth.saturating_sub(1),
            ';' if !in_single && !in_double && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split a comma-separated selector list.
fn split_selectors(selector: &str) -> Vec<&str> {
    selector
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Combine every parent selector in scope with every selector of a nested
/// block. `&` is replaced by the parent; otherwise the child becomes a
/// descendant of the parent.
pub fn combine_selectors(parents: &[String], current: &str) -> Vec<String> {
    let current = split_selectors(current);
    if current.is_empty() {
        return parents.to_vec();
    }
    let mut out = Vec::with_capacity(parents.len() * current.len());
    for parent in parents {
        for child in &current {
            if parent.is_empty() {
                out.push((*child).to_string());
            } else if child.contains('&') {
                out.push(child.replace('&', parent));
            } else {
                out.push(format!("{parent} {child}"));
            }
        }
    }
    out
}

/// Cut a `//` comment that starts outside single or double quotes.
///
/// `url(http://host/a.png)` survives because `//` inside it is preceded by
/// `:`, which is checked explicitly; quoted URLs survive via quote tracking.
fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match bytes[i] {
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            b'/' if !in_single && !in_double && bytes[i + 1] == b'/' => {
                let after_scheme = i > 0 && bytes[i - 1] == b':';
                if !after_scheme {
                    return &line[..i];
                }
            }
            _ => {}
        }
        i += 1;
    }
    line
}

/// Split one comment-free line into logical segments so that `{`, `}` and
/// `;` each end a segment, except inside quotes or parentheses.
///
/// `.a { color: red; }` → [`.a {`, `color: red;`, `}`].
fn split_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;

    for ch in line.chars() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            _ => {}
        }
        let quoted = in_single || in_double;
        if quoted {
            current.push(ch);
            continue;
        }
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '{' if depth == 0 && !current.trim_end().ends_with('#') => {
                current.push(ch);
                segments.push(std::mem::take(&mut current));
            }
            '}' if depth == 0 => {
                if !current.trim().is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                current.clear();
                segments.push("}".to_string());
            }
            ';' if depth == 0 => {
                current.push(ch);
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        segments.push(current);
    }
    segments
}
