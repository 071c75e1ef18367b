//! Builders for recognized form controls.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::classify::{
    element_has_class, find_radio_class, is_checkbox_class, is_selected_radio_class,
    is_unchecked_checkbox_class, NodeView, OverrideKind,
};
use super::date::{looks_like_date_field, DateSeed};
use crate::markup::{Dom, Element, NodeData};
use crate::values::border::border_color;
use crate::values::Color;
use crate::widget::{Call, Expr};

static NUMERIC_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d[\d\s./:-]*$").expect("valid numeric hint regex"));

static DATE_FORMAT_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(yyyy|yy|mm|dd)").expect("valid format hint regex"));

/// Label used for textareas that carry no text at all.
const DEFAULT_TEXTAREA_LABEL: &str = "内容";

/// A semantic widget replacing a node's generic synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Semantic {
    pub widget: Expr,
    /// Leaf widgets skip box finalization entirely.
    pub leaf: bool,
}

impl Semantic {
    fn boxed(widget: Expr) -> Self {
        Self { widget, leaf: false }
    }
}

/// Run the builder for `kind`. `None` when the node does not have what the
/// control needs (usually a label).
pub fn build(kind: OverrideKind, view: &NodeView<'_>) -> Option<Semantic> {
    let semantic = match kind {
        OverrideKind::Checkbox => checkbox(view),
        OverrideKind::RadioGroup => radio_group(view),
        OverrideKind::Button => button(view),
        OverrideKind::Input => input(view),
    };
    if let Some(s) = &semantic {
        debug!(kind = ?kind, widget = s.widget.callee().unwrap_or_default(), "semantic override");
    }
    semantic
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Text that looks like a placeholder or value rather than a label:
/// numbers, date formats, or long sentences.
pub fn is_hint_like(text: &str) -> bool {
    let raw = text.trim();
    if raw.is_empty() {
        return false;
    }
    NUMERIC_HINT.is_match(raw)
        || DATE_FORMAT_HINT.is_match(raw)
        || raw.contains("YYYY")
        || raw.contains("MM")
        || raw.contains("DD")
        || raw.chars().count() >= 24
}

/// Label and hint from the texts inside an input: the label is the first
/// text that is not hint-like (else the first text), the hint the first
/// other text.
pub fn derive_label_hint(texts: &[String]) -> (Option<String>, Option<String>) {
    let Some(first) = texts.first() else {
        return (None, None);
    };
    let label = texts.iter().find(|t| !is_hint_like(t)).unwrap_or(first);
    let hint = texts.iter().find(|t| *t != label).cloned();
    (Some(label.clone()), hint)
}

fn first_text(dom: &Dom, view: &NodeView<'_>) -> Option<String> {
    dom.unique_texts(view.id).into_iter().next()
}

fn class_border_color(view: &NodeView<'_>, element: &Element) -> Option<Color> {
    let class = view.styles.select_class(element.class_attr()?)?;
    border_color(view.styles.get(class)?, view.vocab)
}

fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element.attr(name).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

fn checkbox(view: &NodeView<'_>) -> Option<Semantic> {
    let dom = view.dom;
    let checkbox = dom
        .element_children(view.id)
        .into_iter()
        .filter_map(|c| dom.element(c))
        .find(|e| element_has_class(e, is_checkbox_class))?;
    let title = first_text(dom, view)?;
    let checked = !element_has_class(checkbox, is_unchecked_checkbox_class);
    let widget = Call::new("_GeneratedCheckbox")
        .named("title", Expr::str(title))
        .named("initialChecked", checked)
        .named_opt(
            "borderColor",
            class_border_color(view, checkbox).map(|c| c.to_expr()),
        )
        .build();
    Some(Semantic::boxed(widget))
}

// ---------------------------------------------------------------------------
// Radio group
// ---------------------------------------------------------------------------

struct RadioOption {
    label: String,
    selected: bool,
    border_color: Option<Color>,
}

fn radio_group(view: &NodeView<'_>) -> Option<Semantic> {
    let dom = view.dom;
    let options = dom
        .element_children(view.id)
        .into_iter()
        .map(|child| {
            let class = find_radio_class(dom, child)?;
            let label = dom.unique_texts(child).into_iter().next()?;
            let border_color = view
                .styles
                .get(&class)
                .and_then(|props| border_color(props, view.vocab));
            Some(RadioOption {
                label,
                selected: is_selected_radio_class(&class.to_lowercase()),
                border_color,
            })
        })
        .collect::<Option<Vec<_>>>()?;
    if options.len() < 2 {
        return None;
    }
    let selected = options.iter().find(|o| o.selected).unwrap_or(&options[0]);
    let inactive = options
        .iter()
        .find(|o| !o.selected && o.border_color.is_some())
        .and_then(|o| o.border_color.as_ref());
    let option_exprs = options
        .iter()
        .map(|o| radio_option(&o.label))
        .collect();
    let widget = Call::new("_GeneratedRadioGroup")
        .named("initialValue", Expr::str(selected.label.clone()))
        .named("options", Expr::List(option_exprs))
        .named_opt("activeColor", selected.border_color.as_ref().map(Color::to_expr))
        .named_opt("inactiveColor", inactive.map(Color::to_expr))
        .build();
    Some(Semantic::boxed(widget))
}

fn radio_option(label: &str) -> Expr {
    Call::new("AppRadioOption")
        .named("value", Expr::str(label))
        .named("label", Expr::str(label))
        .build()
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// `RippleButton` with a transparent background and no padding.
pub fn ripple_button(title: &str) -> Expr {
    Call::new("RippleButton")
        .named("title", Expr::str(title))
        .named("backgroundColor", Expr::ident("Colors.transparent"))
        .named("minWidth", 0.0)
        .named("padding", Expr::ident("EdgeInsets.zero"))
        .named("onTap", Expr::ident("() {}"))
        .build()
}

fn button(view: &NodeView<'_>) -> Option<Semantic> {
    let dom = view.dom;
    if view.element.is("button") {
        let title = dom
            .children(view.id)
            .iter()
            .find_map(|&c| match dom.get(c)? {
                NodeData::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                NodeData::Element(_) => Some(dom.texts(c).into_iter().next().unwrap_or_default()),
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Button".to_string());
        return Some(Semantic {
            widget: ripple_button(&title),
            leaf: true,
        });
    }
    let title = first_text(dom, view)?;
    Some(Semantic::boxed(ripple_button(&title)))
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn input(view: &NodeView<'_>) -> Option<Semantic> {
    let element = view.element;
    let class = view.class_attr();
    let input_type = attr(element, "type").unwrap_or_default().to_ascii_lowercase();
    let is_textarea = element.is("textarea");

    if input_type == "radio" {
        let label = attr(element, "label")
            .or_else(|| attr(element, "value"))
            .or(class)
            .unwrap_or("Option");
        let widget = Call::new("_GeneratedRadioGroup")
            .named("initialValue", Expr::str(label))
            .named("options", Expr::List(vec![radio_option(label)]))
            .build();
        return Some(Semantic::boxed(widget));
    }

    let texts = view.dom.unique_texts(view.id);
    let (derived_label, derived_hint) = derive_label_hint(&texts);
    let label = match attr(element, "label") {
        Some(label) => Some(label.to_string()),
        None if is_textarea => Some(
            derived_label
                .or_else(|| class.map(str::to_string))
                .unwrap_or_else(|| DEFAULT_TEXTAREA_LABEL.to_string()),
        ),
        None => derived_label,
    };
    let hint = attr(element, "placeholder")
        .or_else(|| attr(element, "value"))
        .map(str::to_string)
        .or(derived_hint);

    let is_date = !is_textarea
        && looks_like_date_field(class, &input_type, label.as_deref(), hint.as_deref());
    let widget = if is_date {
        let seed = hint.as_deref().and_then(DateSeed::from_hint);
        Call::new("_GeneratedDateTimeField")
            .named_opt("label", label.map(Expr::str))
            .named_opt("hint", hint.map(Expr::str))
            .named_opt("initialDate", seed.map(|s| s.to_expr()))
            .build()
    } else {
        Call::new("AppInput")
            .named_opt("label", label.map(Expr::str))
            .named_opt("hint", hint.map(Expr::str))
            .named_opt("maxLines", is_textarea.then_some(4.0))
            .build()
    };
    Some(Semantic::boxed(widget))
}

/// Whether a widget paints its own field background.
pub fn owns_input_background(widget: &Expr) -> bool {
    widget.is_call("AppInput") || widget.is_call("_GeneratedDateTimeField")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::StyleTable;
    use crate::markup::parse;
    use crate::synth::classify::candidates;
    use crate::values::Vocabulary;
    use crate::widget::dart::render_flat;

    fn semantic(markup: &str, css: &str) -> Option<Semantic> {
        let dom = parse(markup).unwrap();
        let root = dom.root().unwrap();
        let styles = StyleTable::parse(css);
        let vocab = Vocabulary::default();
        let view = NodeView {
            dom: &dom,
            id: root,
            element: dom.element(root).unwrap(),
            styles: &styles,
            vocab: &vocab,
        };
        candidates(&view).into_iter().find_map(|k| build(k, &view))
    }

    fn rendered(markup: &str) -> String {
        render_flat(&semantic(markup, "").unwrap().widget)
    }

    // ── Labels ───────────────────────────────────────────────────────

    #[test]
    fn hint_like_texts() {
        assert!(is_hint_like("090-1234-5678"));
        assert!(is_hint_like("yyyy/mm/dd"));
        assert!(is_hint_like("2024 YYYY"));
        assert!(is_hint_like("これはとても長い説明文でプレースホルダーとして表示されるテキストです"));
        assert!(!is_hint_like("電話番号"));
    }

    #[test]
    fn label_skips_hint_like_texts() {
        let texts = vec!["090-0000-0000".to_string(), "電話番号".to_string()];
        assert_eq!(
            derive_label_hint(&texts),
            (Some("電話番号".to_string()), Some("090-0000-0000".to_string()))
        );
        assert_eq!(derive_label_hint(&[]), (None, None));
    }

    // ── Controls ─────────────────────────────────────────────────────

    #[test]
    fn text_input_from_container() {
        assert_eq!(
            rendered(r#"<div className="nameInput"><span>お名前</span><span>山田 太郎</span></div>"#),
            "AppInput(label: 'お名前', hint: '山田 太郎')"
        );
    }

    #[test]
    fn textarea_defaults() {
        assert_eq!(
            rendered(r#"<textarea />"#),
            "AppInput(label: '内容', maxLines: 4)"
        );
        assert_eq!(
            rendered(r#"<textarea placeholder="ご意見" label="備考" />"#),
            "AppInput(label: '備考', hint: 'ご意見', maxLines: 4)"
        );
    }

    #[test]
    fn date_input_is_seeded() {
        assert_eq!(
            rendered(r#"<div className="birthdayInput"><span>生年月日</span><span>1990/01/02</span></div>"#),
            "_GeneratedDateTimeField(label: '生年月日', hint: '1990/01/02', initialDate: DateTime(1990, 1, 2))"
        );
        assert_eq!(
            rendered(r#"<input type="date" />"#),
            "_GeneratedDateTimeField()"
        );
    }

    #[test]
    fn radio_input_degrades_to_single_option() {
        assert_eq!(
            rendered(r#"<input type="radio" value="yes" />"#),
            "_GeneratedRadioGroup(initialValue: 'yes', options: [AppRadioOption(value: 'yes', label: 'yes')])"
        );
    }

    #[test]
    fn checkbox_with_border() {
        let s = semantic(
            r#"<div><div className="checkbox2" /><p>同意する</p></div>"#,
            ".checkbox2 { border: 1px solid #000; }",
        )
        .unwrap();
        assert_eq!(
            render_flat(&s.widget),
            "_GeneratedCheckbox(title: '同意する', initialChecked: false, borderColor: AppColors.fromHex('#ff000000'))"
        );
    }

    #[test]
    fn radio_group_colors() {
        let s = semantic(
            r#"<div><div><i className="radio1" /><span>A</span></div><div><i className="radio2" /><span>B</span></div></div>"#,
            ".radio1 { border: 1px solid #ccc; } .radio2 { border: 2px solid #f00; }",
        )
        .unwrap();
        assert_eq!(
            render_flat(&s.widget),
            "_GeneratedRadioGroup(initialValue: 'B', options: [AppRadioOption(value: 'A', label: 'A'), AppRadioOption(value: 'B', label: 'B')], activeColor: AppColors.fromHex('#ffff0000'), inactiveColor: AppColors.fromHex('#ffcccccc'))"
        );
    }

    #[test]
    fn buttons() {
        let tag = semantic(r#"<button><span>送信</span></button>"#, "").unwrap();
        assert!(tag.leaf);
        assert_eq!(
            render_flat(&tag.widget),
            "RippleButton(title: '送信', backgroundColor: Colors.transparent, minWidth: 0, padding: EdgeInsets.zero, onTap: () {})"
        );
        assert!(render_flat(&semantic("<button />", "").unwrap().widget).contains("title: 'Button'"));

        let class = semantic(r#"<div className="nextButton"><span>次へ</span></div>"#, "").unwrap();
        assert!(!class.leaf);
        // Without a label the class alone is not enough.
        assert!(semantic(r#"<div className="nextButton" />"#, "").is_none());
    }
}
