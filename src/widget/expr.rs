//! Widget expression tree.
//!
//! The synthesizer builds every Flutter widget, decoration and literal as an
//! [`Expr`]. Decisions that depend on what was already built (is this an input
//! field? does the document use SVG?) inspect the tree structurally instead of
//! looking at rendered text.

use crate::geometry::Extent;

// ---------------------------------------------------------------------------
// Expr
// ---------------------------------------------------------------------------

/// A Dart expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constructor or function call: `Container(child: ...)`.
    Call(Call),
    /// List literal: `[a, b]`.
    List(Vec<Expr>),
    /// String literal, escaped on render.
    Str(String),
    /// Numeric literal.
    Num(f64),
    /// Boolean literal.
    Bool(bool),
    /// Verbatim Dart path such as `Alignment.topLeft` or `AppAssets.icHome`.
    Ident(String),
    /// A width that is either fixed or the host viewport's width.
    Extent(Extent),
}

impl Expr {
    /// Shorthand for [`Expr::Ident`].
    pub fn ident(path: impl Into<String>) -> Self {
        Expr::Ident(path.into())
    }

    /// Shorthand for [`Expr::Str`].
    pub fn str(text: impl Into<String>) -> Self {
        Expr::Str(text.into())
    }

    /// The callee name if this is a call.
    pub fn callee(&self) -> Option<&str> {
        match self {
            Expr::Call(call) => Some(call.callee.as_str()),
            _ => None,
        }
    }

    /// Whether this is a call to `callee`.
    pub fn is_call(&self, callee: &str) -> bool {
        self.callee() == Some(callee)
    }

    /// The call payload, if any.
    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// A named argument of a call.
    pub fn named_arg(&self, name: &str) -> Option<&Expr> {
        self.as_call().and_then(|call| call.get(name))
    }

    /// Visit this expression and all nested expressions, depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Call(call) => {
                for arg in &call.positional {
                    arg.walk(visit);
                }
                for (_, arg) in &call.named {
                    arg.walk(visit);
                }
            }
            Expr::List(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Whether any nested expression satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&Expr) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |e| {
            if !found && pred(e) {
                found = true;
            }
        });
        found
    }

    /// Whether any nested call has `callee`.
    pub fn uses_callee(&self, callee: &str) -> bool {
        self.any(|e| e.is_call(callee))
    }

    /// Whether any nested identifier starts with `prefix`.
    pub fn uses_ident_prefix(&self, prefix: &str) -> bool {
        self.any(|e| matches!(e, Expr::Ident(path) if path.starts_with(prefix)))
    }

    /// Replace every numeric extent equal to `width` with
    /// [`Extent::Available`].
    pub fn mark_available_width(&mut self, width: f64) {
        match self {
            Expr::Extent(Extent::Fixed(w)) if *w == width => {
                *self = Expr::Extent(Extent::Available);
            }
            Expr::Call(call) => {
                for arg in &mut call.positional {
                    arg.mark_available_width(width);
                }
                for (_, arg) in &mut call.named {
                    arg.mark_available_width(width);
                }
            }
            Expr::List(items) => {
                for item in items {
                    item.mark_available_width(width);
                }
            }
            _ => {}
        }
    }
}

impl From<Call> for Expr {
    fn from(call: Call) -> Self {
        Expr::Call(call)
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Num(v)
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Bool(v)
    }
}

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// A call with positional arguments first, then named arguments in insertion
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: String,
    pub positional: Vec<Expr>,
    pub named: Vec<(String, Expr)>,
}

impl Call {
    /// Start building a call to `callee`.
    pub fn new(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Expr>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument.
    pub fn named(mut self, name: &str, value: impl Into<Expr>) -> Self {
        self.named.push((name.to_string(), value.into()));
        self
    }

    /// Append a named argument when present.
    pub fn named_opt(self, name: &str, value: Option<impl Into<Expr>>) -> Self {
        match value {
            Some(v) => self.named(name, v),
            None => self,
        }
    }

    /// Append `child:`.
    pub fn child(self, child: impl Into<Expr>) -> Self {
        self.named("child", child)
    }

    /// Append `children: [...]`.
    pub fn children(self, children: Vec<Expr>) -> Self {
        self.named("children", Expr::List(children))
    }

    /// Look up a named argument.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.named
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether the call has no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Finish building.
    pub fn build(self) -> Expr {
        Expr::Call(self)
    }
}

/// Convenience: a call with no arguments, e.g. `SizedBox.shrink()`.
pub fn call0(callee: &str) -> Expr {
    Expr::Call(Call::new(callee))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expr {
        Call::new("Container")
            .named("width", Expr::Extent(Extent::Fixed(375.0)))
            .child(
                Call::new("Row")
                    .children(vec![
                        Call::new("SvgPicture.asset")
                            .arg(Expr::ident("AppAssets.icHome"))
                            .build(),
                        Expr::str("x"),
                    ])
                    .build(),
            )
            .build()
    }

    #[test]
    fn builder_keeps_argument_order() {
        let call = Call::new("Text")
            .arg(Expr::str("hi"))
            .named("a", 1.0)
            .named_opt("b", None::<Expr>)
            .named("c", true);
        assert_eq!(call.positional.len(), 1);
        let keys: Vec<_> = call.named.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn structural_queries() {
        let expr = sample();
        assert!(expr.is_call("Container"));
        assert!(expr.uses_callee("SvgPicture.asset"));
        assert!(!expr.uses_callee("Image.asset"));
        assert!(expr.uses_ident_prefix("AppAssets."));
        assert!(expr.named_arg("child").is_some_and(|c| c.is_call("Row")));
    }

    #[test]
    fn mark_available_width_only_touches_matching_extents() {
        let mut expr = Call::new("Row")
            .named("a", Expr::Extent(Extent::Fixed(375.0)))
            .named("b", Expr::Extent(Extent::Fixed(10.0)))
            .named("c", Expr::Num(375.0))
            .build();
        expr.mark_available_width(375.0);
        assert_eq!(
            expr.named_arg("a"),
            Some(&Expr::Extent(Extent::Available))
        );
        assert_eq!(expr.named_arg("b"), Some(&Expr::Extent(Extent::Fixed(10.0))));
        // Plain numbers are not widths.
        assert_eq!(expr.named_arg("c"), Some(&Expr::Num(375.0)));
    }
}
