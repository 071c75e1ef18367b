//! Dart source rendering for [`Expr`] trees.
//!
//! Output follows `dart format` conventions closely enough to be readable
//! before a formatter runs: an expression stays on one line when it fits,
//! otherwise each argument goes on its own line with a trailing comma.

use crate::geometry::Extent;
use crate::widget::expr::{Call, Expr};

/// Target line width.
pub const LINE_WIDTH: usize = 80;

const INDENT: usize = 2;

/// Render `expr` starting at `indent` spaces, assuming the current line
/// already holds `column` characters.
pub fn render_expr(expr: &Expr, indent: usize, column: usize) -> String {
    let flat = render_flat(expr);
    if column + flat.chars().count() <= LINE_WIDTH || !is_breakable(expr) {
        return flat;
    }
    match expr {
        Expr::Call(call) => render_call_broken(call, indent),
        Expr::List(items) => render_list_broken(items, indent),
        _ => flat,
    }
}

/// Render on a single line.
pub fn render_flat(expr: &Expr) -> String {
    match expr {
        Expr::Call(call) => {
            let args: Vec<String> = call
                .positional
                .iter()
                .map(render_flat)
                .chain(
                    call.named
                        .iter()
                        .map(|(name, value)| format!("{name}: {}", render_flat(value))),
                )
                .collect();
            format!("{}({})", call.callee, args.join(", "))
        }
        Expr::List(items) => {
            let items: Vec<String> = items.iter().map(render_flat).collect();
            format!("[{}]", items.join(", "))
        }
        Expr::Str(text) => dart_string(text),
        Expr::Num(v) => format_number(*v),
        Expr::Bool(v) => v.to_string(),
        Expr::Ident(path) => path.clone(),
        Expr::Extent(Extent::Fixed(v)) => format_number(*v),
        Expr::Extent(Extent::Available) => "Get.width".to_string(),
    }
}

fn is_breakable(expr: &Expr) -> bool {
    match expr {
        Expr::Call(call) => !call.is_empty(),
        Expr::List(items) => !items.is_empty(),
        _ => false,
    }
}

fn render_call_broken(call: &Call, indent: usize) -> String {
    let inner = indent + INDENT;
    let pad = " ".repeat(inner);
    let mut out = format!("{}(\n", call.callee);
    for arg in &call.positional {
        out.push_str(&pad);
        out.push_str(&render_expr(arg, inner, inner));
        out.push_str(",\n");
    }
    for (name, value) in &call.named {
        out.push_str(&pad);
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&render_expr(value, inner, inner + name.len() + 2));
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
    out
}

fn render_list_broken(items: &[Expr], indent: usize) -> String {
    let inner = indent + INDENT;
    let pad = " ".repeat(inner);
    let mut out = String::from("[\n");
    for item in items {
        out.push_str(&pad);
        out.push_str(&render_expr(item, inner, inner));
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(']');
    out
}

/// Format a number the shortest way that round-trips: `24.0` → `24`,
/// `1.5` → `1.5`. Negative zero prints as `0`.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Quote `text` as a single-quoted Dart string literal.
pub fn dart_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}
