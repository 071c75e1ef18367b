//! Flat stylesheet model: FlatRule, Declaration, PropertyMap.

use std::collections::BTreeMap;

/// Property name → raw value string for one class.
pub type PropertyMap = BTreeMap<String, String>;

/// A single property declaration with its raw value (trailing `;` removed).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    /// Create a new declaration, trimming the value and any trailing `;`.
    pub fn new(property: impl Into<String>, value: &str) -> Self {
        let value = value.trim();
        let value = value.strip_suffix(';').unwrap_or(value).trim_end();
        Self {
            property: property.into(),
            value: value.to_string(),
        }
    }
}

/// A rule without nesting: one resolved selector and its declarations in
/// source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}
