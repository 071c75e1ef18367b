//! Semantic override classification.
//!
//! Design exports draw form controls as plain boxes. The classifier looks at
//! tag names, class names and child structure to recognize checkboxes, radio
//! groups, buttons and text inputs. Rules are tried in table order; the first
//! one whose builder produces a widget wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::StyleTable;
use crate::markup::{Dom, Element, NodeId};
use crate::values::Vocabulary;

static BUTTON_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[-_])button([0-9]|$|[-_])").expect("valid button regex"));

static RADIO_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^radio\d*$").expect("valid radio regex"));

static RADIO_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[-_])radio\d*($|[-_])").expect("valid radio token regex"));

/// Tags that are never treated as generic containers.
const NON_CONTAINER_TAGS: &[&str] = &["img", "span", "p", "button", "input", "textarea", "br"];

/// A recognized form control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverrideKind {
    Checkbox,
    RadioGroup,
    Button,
    Input,
}

/// Read-only view of the node being classified.
pub struct NodeView<'a> {
    pub dom: &'a Dom,
    pub id: NodeId,
    pub element: &'a Element,
    pub styles: &'a StyleTable,
    pub vocab: &'a Vocabulary,
}

impl<'a> NodeView<'a> {
    pub fn class_attr(&self) -> Option<&'a str> {
        self.element.class_attr()
    }

    pub fn is_container(&self) -> bool {
        !NON_CONTAINER_TAGS.contains(&self.element.tag.as_str())
    }

    /// Whether any class token satisfies `pred` (tokens are lowercased).
    pub fn has_class(&self, pred: impl Fn(&str) -> bool) -> bool {
        element_has_class(self.element, pred)
    }
}

/// Whether any lowercased class token of `element` satisfies `pred`.
pub fn element_has_class(element: &Element, pred: impl Fn(&str) -> bool) -> bool {
    element
        .class_attr()
        .is_some_and(|attr| attr.split_whitespace().any(|t| pred(&t.to_lowercase())))
}

struct OverrideRule {
    kind: OverrideKind,
    applies: fn(&NodeView<'_>) -> bool,
}

const OVERRIDE_RULES: &[OverrideRule] = &[
    OverrideRule {
        kind: OverrideKind::Checkbox,
        applies: checkbox_candidate,
    },
    OverrideRule {
        kind: OverrideKind::RadioGroup,
        applies: radio_group_candidate,
    },
    OverrideRule {
        kind: OverrideKind::Button,
        applies: button_candidate,
    },
    OverrideRule {
        kind: OverrideKind::Input,
        applies: input_candidate,
    },
];

/// Override kinds whose structural predicate matches, in priority order.
pub fn candidates(view: &NodeView<'_>) -> Vec<OverrideKind> {
    OVERRIDE_RULES
        .iter()
        .filter(|rule| (rule.applies)(view))
        .map(|rule| rule.kind)
        .collect()
}

// ---------------------------------------------------------------------------
// Class vocabulary
// ---------------------------------------------------------------------------

pub fn is_input_class(token: &str) -> bool {
    ["textfield", "input", "textarea", "formfield", "form_field"]
        .iter()
        .any(|k| token.contains(k))
}

pub fn is_button_class(token: &str) -> bool {
    token.contains("nextbutton")
        || BUTTON_TOKEN.is_match(token)
        || token.ends_with("btn")
        || token.contains("btn_")
}

pub fn is_checkbox_class(token: &str) -> bool {
    token.contains("checkbox") || token.contains("check_box")
}

pub fn is_unchecked_checkbox_class(token: &str) -> bool {
    token.contains("checkbox2") || token.contains("uncheck")
}

pub fn is_radio_class(token: &str) -> bool {
    RADIO_EXACT.is_match(token)
        || RADIO_TOKEN.is_match(token)
        || ["radiobutton", "radio_button", "radio-option", "radiooption"]
            .iter()
            .any(|k| token.contains(k))
}

/// `radio2`/`radio3` variants and `checked` (but not `unchecked`) classes
/// mark the selected option.
pub fn is_selected_radio_class(token: &str) -> bool {
    token == "radio2" || token == "radio3" || (token.contains("checked") && !token.contains("unchecked"))
}

// ---------------------------------------------------------------------------
// Structural predicates
// ---------------------------------------------------------------------------

fn checkbox_candidate(view: &NodeView<'_>) -> bool {
    if !view.is_container() {
        return false;
    }
    let children = view.dom.element_children(view.id);
    (2..=3).contains(&children.len())
        && children.iter().any(|&c| {
            view.dom
                .element(c)
                .is_some_and(|e| element_has_class(e, is_checkbox_class))
        })
}

/// The first radio class token in the subtree of `id`, self included, as
/// written in the markup.
pub fn find_radio_class(dom: &Dom, id: NodeId) -> Option<String> {
    dom.descendants(id).into_iter().find_map(|n| {
        dom.element(n)?
            .class_attr()?
            .split_whitespace()
            .find(|t| is_radio_class(&t.to_lowercase()))
            .map(str::to_string)
    })
}

fn radio_group_candidate(view: &NodeView<'_>) -> bool {
    if !view.is_container() {
        return false;
    }
    let children = view.dom.element_children(view.id);
    children.len() >= 2 && children.iter().all(|&c| find_radio_class(view.dom, c).is_some())
}

fn button_candidate(view: &NodeView<'_>) -> bool {
    view.element.is("button") || (view.is_container() && view.has_class(is_button_class))
}

fn input_candidate(view: &NodeView<'_>) -> bool {
    view.element.is("input")
        || view.element.is("textarea")
        || (view.is_container() && view.has_class(is_input_class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    fn kinds(markup: &str) -> Vec<OverrideKind> {
        let dom = parse(markup).unwrap();
        let root = dom.root().unwrap();
        let styles = StyleTable::default();
        let vocab = Vocabulary::default();
        let view = NodeView {
            dom: &dom,
            id: root,
            element: dom.element(root).unwrap(),
            styles: &styles,
            vocab: &vocab,
        };
        candidates(&view)
    }

    // ── Class vocabulary ─────────────────────────────────────────────

    #[test]
    fn button_classes() {
        assert!(is_button_class("nextbutton"));
        assert!(is_button_class("primary-button"));
        assert!(is_button_class("button2"));
        assert!(is_button_class("submitbtn"));
        assert!(is_button_class("btn_ok"));
        assert!(!is_button_class("buttons"));
        assert!(!is_button_class("buttonbar"));
    }

    #[test]
    fn radio_classes() {
        assert!(is_radio_class("radio"));
        assert!(is_radio_class("radio3"));
        assert!(is_radio_class("option-radio"));
        assert!(is_radio_class("radiobutton1"));
        assert!(!is_radio_class("radios"));
        assert!(is_selected_radio_class("radio2"));
        assert!(is_selected_radio_class("radio-checked"));
        assert!(!is_selected_radio_class("radio-unchecked"));
        assert!(!is_selected_radio_class("radio1"));
    }

    #[test]
    fn checkbox_classes() {
        assert!(is_checkbox_class("agreecheckbox"));
        assert!(is_unchecked_checkbox_class("checkbox2"));
        assert!(is_unchecked_checkbox_class("checkbox-unchecked"));
        assert!(!is_unchecked_checkbox_class("checkbox"));
    }

    // ── Table order ──────────────────────────────────────────────────

    #[test]
    fn checkbox_structure() {
        let k = kinds(r#"<div><div className="checkbox" /><span>Agree</span></div>"#);
        assert_eq!(k, vec![OverrideKind::Checkbox]);
    }

    #[test]
    fn radio_group_structure() {
        let k = kinds(
            r#"<div><div><i className="radio2" /><span>A</span></div><div><i className="radio" /><span>B</span></div></div>"#,
        );
        assert_eq!(k, vec![OverrideKind::RadioGroup]);
    }

    #[test]
    fn input_class_container_and_tags() {
        assert_eq!(kinds(r#"<div className="nameInput"><span>Name</span></div>"#), vec![OverrideKind::Input]);
        assert_eq!(kinds(r#"<textarea placeholder="x" />"#), vec![OverrideKind::Input]);
        assert_eq!(kinds(r#"<button>Go</button>"#), vec![OverrideKind::Button]);
        assert!(kinds(r#"<span className="input">x</span>"#).is_empty());
    }
}
