//! Style table: class name → merged property map.
//!
//! Compiles stylesheet text into a flat lookup keyed by the last class token
//! of each selector. Declarations for the same class merge, with later values
//! overriding earlier ones.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::css::flatten::flatten;
use crate::css::model::{FlatRule, PropertyMap};
use crate::css::tokenizer::last_class_name;

/// An external stylesheet compiler (e.g. a full SCSS implementation).
///
/// When it yields flat CSS, that output is walked instead of the raw source.
/// Any error falls back to the built-in flattener.
pub trait Preprocessor {
    /// Compile `source` (read from `origin`) to flat CSS.
    fn compile(&self, source: &str, origin: &Path) -> Result<String, Box<dyn std::error::Error>>;
}

/// Flat class → properties table.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    classes: HashMap<String, PropertyMap>,
}

impl StyleTable {
    /// Parse stylesheet text with the built-in flattener.
    pub fn parse(source: &str) -> Self {
        Self::from_rules(flatten(source))
    }

    /// Parse stylesheet text, preferring `preprocessor` output when it
    /// succeeds.
    pub fn compile(source: &str, origin: &Path, preprocessor: Option<&dyn Preprocessor>) -> Self {
        if let Some(pre) = preprocessor {
            match pre.compile(source, origin) {
                Ok(css) => return Self::parse(&css),
                Err(err) => {
                    debug!(
                        origin = %origin.display(),
                        error = %err,
                        "stylesheet preprocessor failed, using built-in flattener"
                    );
                }
            }
        }
        Self::parse(source)
    }

    /// Build a table from already-flat rules.
    pub fn from_rules(rules: impl IntoIterator<Item = FlatRule>) -> Self {
        let mut table = Self::default();
        for rule in rules {
            let Some(class) = last_class_name(&rule.selector) else {
                continue;
            };
            let entry = table.classes.entry(class).or_default();
            for decl in rule.declarations {
                entry.insert(decl.property, decl.value);
            }
        }
        table
    }

    /// Properties for `class`, if any rule targets it.
    pub fn get(&self, class: &str) -> Option<&PropertyMap> {
        self.classes.get(class)
    }

    /// Whether any rule targets `class`.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Number of distinct classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the table has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Pick the class key for a (possibly multi-token) `className` attribute:
    /// the first token present in the table, else the first token.
    pub fn select_class<'a>(&self, class_attr: &'a str) -> Option<&'a str> {
        let mut tokens = class_attr.split_whitespace();
        let first = tokens.next()?;
        if self.contains(first) {
            return Some(first);
        }
        tokens.find(|t| self.contains(t)).or(Some(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Upper;

    impl Preprocessor for Upper {
        fn compile(&self, _source: &str, _origin: &Path) -> Result<String, Box<dyn std::error::Error>> {
            Ok(".fromPre { width: 1px; }".to_string())
        }
    }

    struct Failing;

    impl Preprocessor for Failing {
        fn compile(&self, _source: &str, _origin: &Path) -> Result<String, Box<dyn std::error::Error>> {
            Err("no compiler".into())
        }
    }

    #[test]
    fn keys_by_last_class_and_merges() {
        let table = StyleTable::parse(
            ".a { color: red; width: 1px; }\n.root .a { color: blue; }\n.b:hover { height: 2px; }",
        );
        let a = table.get("a").unwrap();
        assert_eq!(a.get("color").map(String::as_str), Some("blue"));
        assert_eq!(a.get("width").map(String::as_str), Some("1px"));
        assert!(table.contains("b"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn nested_rules_key_on_innermost_class() {
        let table = StyleTable::parse(".card {\n  .title {\n    font-size: 14px;\n  }\n}");
        assert!(table.get("title").is_some());
        assert!(table.get("card").is_none());
    }

    #[test]
    fn selectors_without_class_are_ignored() {
        let table = StyleTable::parse("div { margin: 0; }\n* { box-sizing: border-box; }");
        assert!(table.is_empty());
    }

    #[test]
    fn preprocessor_output_wins() {
        let table = StyleTable::compile(".raw { width: 3px; }", Path::new("a.scss"), Some(&Upper));
        assert!(table.contains("fromPre"));
        assert!(!table.contains("raw"));
    }

    #[test]
    fn failing_preprocessor_falls_back() {
        let table = StyleTable::compile(".raw { width: 3px; }", Path::new("a.scss"), Some(&Failing));
        assert!(table.contains("raw"));
    }

    #[test]
    fn select_class_prefers_known_token() {
        let table = StyleTable::parse(".known { width: 1px; }");
        assert_eq!(table.select_class("unknown known"), Some("known"));
        assert_eq!(table.select_class("x y"), Some("x"));
        assert_eq!(table.select_class("  "), None);
    }
}
